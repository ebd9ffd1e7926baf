//! Site announcement types.

use serde::{Deserialize, Serialize};

/// Request body for `PUT /api/admin/news`.
///
/// Empty or whitespace-only content clears the announcement.
#[derive(Debug, Deserialize)]
pub struct SetNewsRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// Current announcement. `content` is `null` when there is none.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewsResponse {
    pub success: bool,
    pub content: Option<String>,
}
