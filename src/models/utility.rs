//! Payloads for the public and key-gated utility routes.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/v1/hash`.
///
/// The caller's API key may also travel in this body as `key`; the
/// user-key middleware reads it before the handler runs.
///
/// ```json
/// { "key": "3f9a...", "text": "hello", "algorithm": "sha256" }
/// ```
#[derive(Debug, Deserialize)]
pub struct HashRequest {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub algorithm: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HashResponse {
    pub success: bool,
    pub algorithm: String,
    pub digest: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
