//! Site announcement handlers.

use axum::{Json, extract::State};

use crate::{
    app::AppState,
    error::AppError,
    extract::AppJson,
    models::news::{NewsResponse, SetNewsRequest},
    services::news_service,
};

/// `GET /api/news` - public.
///
/// ```json
/// { "success": true, "content": "**Maintenance** tonight at 22:00 UTC" }
/// ```
pub async fn get_news(State(state): State<AppState>) -> Result<Json<NewsResponse>, AppError> {
    let content = news_service::get_current(state.news.as_ref()).await?;

    Ok(Json(NewsResponse {
        success: true,
        content,
    }))
}

/// `PUT /api/admin/news` - admin only.
///
/// A missing, empty, or whitespace-only `content` clears the announcement.
pub async fn set_news(
    State(state): State<AppState>,
    AppJson(request): AppJson<SetNewsRequest>,
) -> Result<Json<NewsResponse>, AppError> {
    let content = request.content.unwrap_or_default();
    let stored = news_service::set_current(state.news.as_ref(), &content).await?;

    Ok(Json(NewsResponse {
        success: true,
        content: stored,
    }))
}
