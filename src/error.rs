//! Error types and HTTP error response handling.
//!
//! Every failure is resolved into the same JSON envelope:
//!
//! ```json
//! { "success": false, "error": "Human-readable message", "code": "machine_code" }
//! ```
//!
//! `success: false` is always paired with a non-2xx status code.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed field. Returns HTTP 400.
    #[error("{0}")]
    InvalidInput(String),

    /// Missing, empty, or wrong credential. Returns HTTP 403.
    ///
    /// The message is the same for every cause so callers cannot probe
    /// which part of the credential check failed.
    #[error("Forbidden")]
    Forbidden,

    /// No such user, key, or route. Returns HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Hash algorithm outside the supported set. Returns HTTP 400.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Store timed out or could not complete the operation. Returns HTTP 500.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Any sqlx::Error from database operations. Returns HTTP 500.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::UnsupportedAlgorithm(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Forbidden => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            AppError::StoreUnavailable(_) | AppError::Database(_) => "store_unavailable",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// Store and database details are logged, never returned to the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::StoreUnavailable(_) | AppError::Database(_) => {
                tracing::error!(error = %self, "store operation failed");
                "Store unavailable, try again later".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": message,
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}
