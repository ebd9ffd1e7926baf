//! API key model and the admin request/response types built on it.
//!
//! Each external user (e.g. a chat-platform account id) owns at most one
//! key. Keys are never edited in place; an admin revokes and regenerates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table with columns:
/// - `user_id`: external identity, primary key
/// - `api_key`: opaque token, unique across all rows
/// - `created_at`: when the key was issued
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ApiKeyRecord {
    pub user_id: String,

    /// 64 lowercase hex characters (32 random bytes)
    pub api_key: String,

    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/admin/keys`.
///
/// ```json
/// { "user_id": "123456789012345678" }
/// ```
#[derive(Debug, Deserialize)]
pub struct GenerateKeyRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Query string for `GET /api/admin/keys/lookup`.
#[derive(Debug, Deserialize)]
pub struct LookupByKeyQuery {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Response body for key generation.
///
/// `created` is false when the user already had a key; the existing key is
/// returned in that case.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateKeyResponse {
    pub success: bool,
    pub user_id: String,
    pub api_key: String,
    pub created: bool,
}

/// Response body for key lookups, in either direction.
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyLookupResponse {
    pub success: bool,
    pub user_id: String,
    pub api_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevokeKeyResponse {
    pub success: bool,
    pub deleted: bool,
}

impl From<ApiKeyRecord> for KeyLookupResponse {
    fn from(record: ApiKeyRecord) -> Self {
        Self {
            success: true,
            user_id: record.user_id,
            api_key: record.api_key,
        }
    }
}
