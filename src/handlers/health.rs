//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{app::AppState, error::AppError};

/// Health check response.
///
/// Returns service status, store connectivity, and uptime.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,

    /// Overall service status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// When this process started serving
    pub started_at: DateTime<Utc>,

    /// Whole seconds since `started_at`
    pub uptime_secs: i64,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Arguments
///
/// * `state` - shared application state; its key store is pinged
///
/// # Checks
///
/// - Key store connectivity (`KeyStore::ping`, bounded by the store timeout)
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "success": true,
///   "status": "healthy",
///   "database": "connected",
///   "started_at": "2025-12-21T18:00:00Z",
///   "uptime_secs": 3600,
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns `StoreUnavailable` (500, standard error envelope) if the store
/// cannot be reached or does not answer within the store timeout.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state.keys.ping().await?;

    let now = Utc::now();
    Ok(Json(HealthResponse {
        success: true,
        status: "healthy".to_string(),
        database: "connected".to_string(),
        started_at: state.started_at,
        uptime_secs: (now - state.started_at).num_seconds(),
        timestamp: now,
    }))
}
