//! Data models and API request/response types.

/// API key record and admin key payloads
pub mod api_key;
/// Announcement payloads
pub mod news;
/// Utility route payloads
pub mod utility;
