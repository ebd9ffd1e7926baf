//! Business logic services.
//!
//! Services contain the core rules separated from HTTP handlers: input
//! validation, key minting, and the announcement trimming rules.

pub mod hashing;
pub mod key_service;
pub mod news_service;
