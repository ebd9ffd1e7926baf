//! HTTP request handlers (route handlers).
//!
//! Each handler extracts its inputs, delegates to a service, and returns a
//! JSON envelope or an `AppError`.

/// Admin key management endpoints
pub mod admin;
pub mod health;
/// Announcement endpoints
pub mod news;
pub mod utility;
