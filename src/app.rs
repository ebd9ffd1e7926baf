//! Shared application state and HTTP router assembly.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use tower_http::trace::TraceLayer;

use crate::{
    error::AppError,
    handlers,
    middleware::auth::{AdminSecrets, admin_auth_middleware, user_key_middleware},
    store::{KeyStore, NewsStore},
};

/// State shared by every handler.
///
/// Built once at startup and cloned cheaply per request. Nothing in it is
/// mutated after construction; the stores own their own synchronization.
#[derive(Clone)]
pub struct AppState {
    pub secrets: Arc<AdminSecrets>,
    pub keys: Arc<dyn KeyStore>,
    pub news: Arc<dyn NewsStore>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(secrets: AdminSecrets, keys: Arc<dyn KeyStore>, news: Arc<dyn NewsStore>) -> Self {
        Self {
            secrets: Arc::new(secrets),
            keys,
            news,
            started_at: Utc::now(),
        }
    }
}

/// Build the complete router.
///
/// - `/api/admin/*` requires the admin secret in `X-API-KEY`
/// - `/api/v1/*` requires a per-user API key
/// - `/health`, `/custom` and `GET /api/news` are public
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/admin/keys", post(handlers::admin::generate_key))
        .route(
            "/api/admin/keys/lookup",
            get(handlers::admin::get_user_by_key),
        )
        .route(
            "/api/admin/keys/{user_id}",
            get(handlers::admin::get_key_by_user).delete(handlers::admin::revoke_key),
        )
        .route("/api/admin/news", put(handlers::news::set_news))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    let user_key_routes = Router::new()
        .route("/api/v1/hash", post(handlers::utility::hash_text))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            user_key_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/custom", post(handlers::utility::custom))
        .route("/api/news", get(handlers::news::get_news))
        .merge(admin_routes)
        .merge(user_key_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}
