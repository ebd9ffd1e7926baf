//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating a PostgreSQL connection pool bounded by the store timeout
//! - Running the `api_keys` / `site_news` migrations at startup

use std::time::Duration;

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
///
/// Shared by both Postgres stores.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `acquire_timeout` - how long a request may wait for a free connection
///
/// # Configuration
///
/// - Maximum connections: 5
/// - An unreachable database fails requests after `acquire_timeout`
///   instead of hanging them
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - The server cannot be reached within `acquire_timeout`
/// - Database authentication fails
pub async fn create_pool(database_url: &str, acquire_timeout: Duration) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Applied migrations are tracked in `_sqlx_migrations`, so each runs once.
///
/// # Arguments
///
/// * `pool` - Database connection pool
///
/// # Errors
///
/// Returns an error if:
/// - A migration file cannot be read or has already been applied with
///   different contents
/// - The database rejects a migration statement
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
