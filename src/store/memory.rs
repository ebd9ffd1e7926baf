//! In-memory stores for tests and database-less local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::AppError;
use crate::models::api_key::ApiKeyRecord;

use super::{KeyStore, NewsStore};

fn poisoned() -> AppError {
    AppError::StoreUnavailable("in-memory store lock poisoned".to_string())
}

/// Keys held in a map keyed by `user_id`.
#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    records: RwLock<HashMap<String, ApiKeyRecord>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn key_exists(&self, api_key: &str) -> Result<bool, AppError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.values().any(|r| r.api_key == api_key))
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<ApiKeyRecord>, AppError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(user_id).cloned())
    }

    async fn find_user_by_key(&self, api_key: &str) -> Result<Option<String>, AppError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .values()
            .find(|r| r.api_key == api_key)
            .map(|r| r.user_id.clone()))
    }

    async fn insert_if_absent(
        &self,
        user_id: &str,
        candidate_key: &str,
    ) -> Result<(ApiKeyRecord, bool), AppError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;

        if let Some(existing) = records.get(user_id) {
            return Ok((existing.clone(), false));
        }

        if records.values().any(|r| r.api_key == candidate_key) {
            return Err(AppError::StoreUnavailable(
                "api_key uniqueness violated".to_string(),
            ));
        }

        let record = ApiKeyRecord {
            user_id: user_id.to_string(),
            api_key: candidate_key.to_string(),
            created_at: Utc::now(),
        };
        records.insert(user_id.to_string(), record.clone());

        Ok((record, true))
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<bool, AppError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        Ok(records.remove(user_id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryNewsStore {
    content: RwLock<Option<String>>,
}

impl InMemoryNewsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NewsStore for InMemoryNewsStore {
    async fn current(&self) -> Result<Option<String>, AppError> {
        Ok(self.content.read().map_err(|_| poisoned())?.clone())
    }

    async fn upsert(&self, content: &str) -> Result<(), AppError> {
        *self.content.write().map_err(|_| poisoned())? = Some(content.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        *self.content.write().map_err(|_| poisoned())? = None;
        Ok(())
    }
}
