//! Persistence for API keys and the site announcement.
//!
//! Handlers and services only see the [`KeyStore`] and [`NewsStore`]
//! traits. Production wires in the PostgreSQL implementations; tests and
//! local runs can use the in-memory ones.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::api_key::ApiKeyRecord;

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryKeyStore, InMemoryNewsStore};
pub use postgres::{PgKeyStore, PgNewsStore};

/// Storage contract for `user_id -> api_key` records.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// True iff any record holds exactly this key.
    async fn key_exists(&self, api_key: &str) -> Result<bool, AppError>;

    async fn find_by_user(&self, user_id: &str) -> Result<Option<ApiKeyRecord>, AppError>;

    async fn find_user_by_key(&self, api_key: &str) -> Result<Option<String>, AppError>;

    /// Store `candidate_key` for `user_id` unless the user already has a key.
    ///
    /// Must be atomic: concurrent callers for the same user all get back the
    /// one stored record. The boolean is true only for the caller whose
    /// insert landed.
    async fn insert_if_absent(
        &self,
        user_id: &str,
        candidate_key: &str,
    ) -> Result<(ApiKeyRecord, bool), AppError>;

    /// Returns whether a row was removed.
    async fn delete_by_user(&self, user_id: &str) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Storage contract for the single announcement slot.
#[async_trait]
pub trait NewsStore: Send + Sync {
    async fn current(&self) -> Result<Option<String>, AppError>;

    async fn upsert(&self, content: &str) -> Result<(), AppError>;

    async fn clear(&self) -> Result<(), AppError>;
}
