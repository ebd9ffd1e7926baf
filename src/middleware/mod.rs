//! HTTP middleware components.
//!
//! Middleware run before route handlers and can short-circuit requests
//! that fail authorization.

/// Admin-secret and per-user API key gates
pub mod auth;
