//! Utility API - API-key provisioning, admin control, and small utility
//! routes served over HTTP.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, behind the `KeyStore` / `NewsStore` traits
//! - **Authentication**: admin shared secret (`X-API-KEY`) or per-user API key
//! - **Format**: JSON envelopes with a `success` flag

pub mod app;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
