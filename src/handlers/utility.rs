//! Small self-contained utility routes.
//!
//! - POST /custom - public greeting echo
//! - POST /api/v1/hash - text digest, requires a user API key

use axum::Json;
use serde_json::Value;

use crate::{
    error::AppError,
    extract::AppJson,
    models::utility::{HashRequest, HashResponse, MessageResponse},
    services::hashing::HashAlgorithm,
};

/// Answers "Hello!" only when `say_hello` is exactly `true`.
///
/// ```json
/// { "say_hello": true }
/// ```
pub async fn custom(AppJson(payload): AppJson<Value>) -> Json<MessageResponse> {
    let message = if payload.get("say_hello") == Some(&Value::Bool(true)) {
        "Hello!"
    } else {
        "..."
    };

    Json(MessageResponse {
        success: true,
        message: message.to_string(),
    })
}

/// Digest `text` with the requested algorithm.
///
/// # Request Body
///
/// ```json
/// { "key": "9f2c...", "text": "hello", "algorithm": "sha256" }
/// ```
///
/// # Errors
///
/// - `InvalidInput`: `text` or `algorithm` missing
/// - `UnsupportedAlgorithm`: anything other than sha256, sha512, md5
pub async fn hash_text(
    AppJson(request): AppJson<HashRequest>,
) -> Result<Json<HashResponse>, AppError> {
    let text = request
        .text
        .ok_or_else(|| AppError::InvalidInput("text is required".to_string()))?;
    let algorithm: HashAlgorithm = request
        .algorithm
        .ok_or_else(|| AppError::InvalidInput("algorithm is required".to_string()))?
        .parse()?;

    Ok(Json(HashResponse {
        success: true,
        algorithm: algorithm.as_str().to_string(),
        digest: algorithm.digest_hex(text.as_bytes()),
    }))
}
