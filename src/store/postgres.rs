//! PostgreSQL-backed stores.
//!
//! Every query runs under a timeout; an elapsed timeout becomes
//! `AppError::StoreUnavailable` rather than a hung request.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::api_key::ApiKeyRecord;

use super::{KeyStore, NewsStore};

/// A concurrent revoke can delete the row between our conflicting insert
/// and the re-select. Retry a few times before giving up.
const INSERT_ATTEMPTS: usize = 3;

async fn bounded<T, F>(timeout: Duration, operation: &str, query: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, query).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::StoreUnavailable(format!(
            "{operation} timed out after {}s",
            timeout.as_secs()
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct PgKeyStore {
    pool: DbPool,
    timeout: Duration,
}

impl PgKeyStore {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl KeyStore for PgKeyStore {
    async fn key_exists(&self, api_key: &str) -> Result<bool, AppError> {
        bounded(
            self.timeout,
            "key lookup",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM api_keys WHERE api_key = $1)")
                .bind(api_key)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<ApiKeyRecord>, AppError> {
        bounded(
            self.timeout,
            "user lookup",
            sqlx::query_as::<_, ApiKeyRecord>(
                "SELECT user_id, api_key, created_at FROM api_keys WHERE user_id = $1",
            )
            .bind(user_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find_user_by_key(&self, api_key: &str) -> Result<Option<String>, AppError> {
        bounded(
            self.timeout,
            "reverse key lookup",
            sqlx::query_scalar::<_, String>("SELECT user_id FROM api_keys WHERE api_key = $1")
                .bind(api_key)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert_if_absent(
        &self,
        user_id: &str,
        candidate_key: &str,
    ) -> Result<(ApiKeyRecord, bool), AppError> {
        for _ in 0..INSERT_ATTEMPTS {
            // ON CONFLICT makes the insert itself the uniqueness check, so two
            // concurrent callers can never both create a key for one user.
            let inserted = bounded(
                self.timeout,
                "key insert",
                sqlx::query_as::<_, ApiKeyRecord>(
                    r#"
                    INSERT INTO api_keys (user_id, api_key)
                    VALUES ($1, $2)
                    ON CONFLICT (user_id) DO NOTHING
                    RETURNING user_id, api_key, created_at
                    "#,
                )
                .bind(user_id)
                .bind(candidate_key)
                .fetch_optional(&self.pool),
            )
            .await?;

            if let Some(record) = inserted {
                return Ok((record, true));
            }

            if let Some(existing) = self.find_by_user(user_id).await? {
                return Ok((existing, false));
            }

            tracing::debug!(user_id, "key row vanished between insert and select, retrying");
        }

        Err(AppError::StoreUnavailable(
            "key insert did not converge under concurrent revocation".to_string(),
        ))
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<bool, AppError> {
        let result = bounded(
            self.timeout,
            "key delete",
            sqlx::query("DELETE FROM api_keys WHERE user_id = $1")
                .bind(user_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        bounded(
            self.timeout,
            "ping",
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PgNewsStore {
    pool: DbPool,
    timeout: Duration,
}

impl PgNewsStore {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl NewsStore for PgNewsStore {
    async fn current(&self) -> Result<Option<String>, AppError> {
        bounded(
            self.timeout,
            "news read",
            sqlx::query_scalar::<_, String>("SELECT content FROM site_news WHERE id = 1")
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn upsert(&self, content: &str) -> Result<(), AppError> {
        bounded(
            self.timeout,
            "news write",
            sqlx::query(
                r#"
                INSERT INTO site_news (id, content, updated_at)
                VALUES (1, $1, NOW())
                ON CONFLICT (id) DO UPDATE
                SET content = EXCLUDED.content,
                    updated_at = NOW()
                "#,
            )
            .bind(content)
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        bounded(
            self.timeout,
            "news clear",
            sqlx::query("DELETE FROM site_news WHERE id = 1").execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}
