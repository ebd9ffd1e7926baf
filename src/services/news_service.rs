//! Site announcement logic.

use crate::error::AppError;
use crate::store::NewsStore;

/// Longest announcement accepted, in characters.
pub const MAX_NEWS_CHARS: usize = 4000;

pub async fn get_current(store: &dyn NewsStore) -> Result<Option<String>, AppError> {
    store.current().await
}

/// Replace the announcement.
///
/// Content is trimmed first. Empty content deletes the slot instead of
/// storing an empty string. Returns what is now stored.
pub async fn set_current(store: &dyn NewsStore, content: &str) -> Result<Option<String>, AppError> {
    let content = content.trim();

    if content.is_empty() {
        store.clear().await?;
        tracing::info!("announcement cleared");
        return Ok(None);
    }

    if content.chars().count() > MAX_NEWS_CHARS {
        return Err(AppError::InvalidInput(format!(
            "content exceeds {MAX_NEWS_CHARS} characters"
        )));
    }

    store.upsert(content).await?;
    tracing::info!(chars = content.chars().count(), "announcement updated");

    Ok(Some(content.to_string()))
}
