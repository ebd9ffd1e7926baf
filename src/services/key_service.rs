//! API key provisioning logic.
//!
//! This service handles:
//! - Input validation for user ids and keys
//! - Minting new high-entropy keys
//! - Generate-or-return-existing semantics
//! - Revocation
//!
//! Atomicity lives in the store (`KeyStore::insert_if_absent`); this layer
//! never does check-then-insert.

use crate::error::AppError;
use crate::models::api_key::ApiKeyRecord;
use crate::store::KeyStore;

const MAX_USER_ID_LEN: usize = 128;

/// Generate a key for `user_id`, or return the one it already has.
///
/// # Returns
///
/// The stored record and `created`, which is false when the user was
/// already provisioned. Re-requesting a key is not an error.
///
/// # Errors
///
/// - `InvalidInput`: `user_id` is empty, too long, or has control characters
/// - `StoreUnavailable` / `Database`: store failure; nothing was persisted
pub async fn generate(store: &dyn KeyStore, user_id: &str) -> Result<(ApiKeyRecord, bool), AppError> {
    let user_id = validate_user_id(user_id)?;

    let candidate = generate_api_key();
    let (record, created) = store.insert_if_absent(user_id, &candidate).await?;

    tracing::info!(user_id, created, "API key requested");

    Ok((record, created))
}

pub async fn lookup_by_user(store: &dyn KeyStore, user_id: &str) -> Result<ApiKeyRecord, AppError> {
    let user_id = validate_user_id(user_id)?;

    store
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No API key for user {user_id}")))
}

pub async fn lookup_user_by_key(store: &dyn KeyStore, api_key: &str) -> Result<String, AppError> {
    let api_key = validate_api_key(api_key)?;

    store
        .find_user_by_key(api_key)
        .await?
        .ok_or_else(|| AppError::NotFound("No user for that API key".to_string()))
}

/// Delete the key for `user_id`. Returns `false` when there was none.
pub async fn revoke(store: &dyn KeyStore, user_id: &str) -> Result<bool, AppError> {
    let user_id = validate_user_id(user_id)?;

    let deleted = store.delete_by_user(user_id).await?;
    tracing::info!(user_id, deleted, "API key revoked");

    Ok(deleted)
}

/// Generate a cryptographically secure API key.
///
/// # Output
///
/// 64 hex characters (32 random bytes)
pub fn generate_api_key() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

fn validate_user_id(user_id: &str) -> Result<&str, AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("user_id is required".to_string()));
    }
    if user_id.trim() != user_id {
        return Err(AppError::InvalidInput(
            "user_id must not have leading or trailing whitespace".to_string(),
        ));
    }
    if user_id.chars().count() > MAX_USER_ID_LEN {
        return Err(AppError::InvalidInput(format!(
            "user_id exceeds {MAX_USER_ID_LEN} characters"
        )));
    }
    if user_id.chars().any(char::is_control) {
        return Err(AppError::InvalidInput(
            "user_id must not contain control characters".to_string(),
        ));
    }

    Ok(user_id)
}

fn validate_api_key(api_key: &str) -> Result<&str, AppError> {
    if api_key.trim().is_empty() {
        return Err(AppError::InvalidInput("api_key is required".to_string()));
    }
    // Keys are matched exactly, the same way the user-key gate matches them.
    if api_key.trim() != api_key {
        return Err(AppError::InvalidInput(
            "api_key must not have leading or trailing whitespace".to_string(),
        ));
    }

    Ok(api_key)
}
