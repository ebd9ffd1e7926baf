//! Utility API - server entry point.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build shared state and the HTTP router
//! 5. Start server on configured port

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use utility_api::{
    app::{AppState, build_router},
    config, db,
    middleware::auth::AdminSecrets,
    store::{PgKeyStore, PgNewsStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    let secrets = AdminSecrets::new(config.admin_secrets());
    if secrets.is_empty() {
        tracing::warn!("ADMIN_SECRETS is empty; admin routes will reject every request");
    }
    tracing::info!(admin_secrets = secrets.len(), "Configuration loaded");

    let timeout = config.db_timeout();
    let pool = db::create_pool(&config.database_url, timeout).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let state = AppState::new(
        secrets,
        Arc::new(PgKeyStore::new(pool.clone(), timeout)),
        Arc::new(PgNewsStore::new(pool, timeout)),
    );
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
