//! Admin key-management HTTP handlers.
//!
//! All routes here sit behind the admin middleware:
//! - POST /api/admin/keys - Generate (or return existing) key for a user
//! - GET /api/admin/keys/{user_id} - Get a user's key
//! - GET /api/admin/keys/lookup?api_key= - Get the user owning a key
//! - DELETE /api/admin/keys/{user_id} - Revoke a user's key

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    app::AppState,
    error::AppError,
    extract::AppJson,
    models::api_key::{
        GenerateKeyRequest, GenerateKeyResponse, KeyLookupResponse, LookupByKeyQuery,
        RevokeKeyResponse,
    },
    services::key_service,
};

/// Generate a key for a user.
///
/// # Request Body
///
/// ```json
/// { "user_id": "123456789012345678" }
/// ```
///
/// # Response
///
/// - **201 Created**: a new key was issued
/// - **200 OK**: the user already had a key; it is returned with `created: false`
/// - **400**: missing or invalid `user_id`
/// - **403**: bad admin secret
///
/// ```json
/// { "success": true, "user_id": "1234", "api_key": "9f2c...", "created": true }
/// ```
pub async fn generate_key(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateKeyRequest>,
) -> Result<(StatusCode, Json<GenerateKeyResponse>), AppError> {
    let user_id = request.user_id.unwrap_or_default();
    let (record, created) = key_service::generate(state.keys.as_ref(), &user_id).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(GenerateKeyResponse {
            success: true,
            user_id: record.user_id,
            api_key: record.api_key,
            created,
        }),
    ))
}

/// Get the key issued to a user. 404 if the user was never provisioned.
pub async fn get_key_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<KeyLookupResponse>, AppError> {
    let record = key_service::lookup_by_user(state.keys.as_ref(), &user_id).await?;

    Ok(Json(record.into()))
}

/// Reverse lookup: which user owns this key.
pub async fn get_user_by_key(
    State(state): State<AppState>,
    Query(query): Query<LookupByKeyQuery>,
) -> Result<Json<KeyLookupResponse>, AppError> {
    let api_key = query.api_key.unwrap_or_default();
    let user_id = key_service::lookup_user_by_key(state.keys.as_ref(), &api_key).await?;

    Ok(Json(KeyLookupResponse {
        success: true,
        user_id,
        api_key,
    }))
}

/// Revoke a user's key.
///
/// Revoking a user with no key is not an error: `{ "success": true, "deleted": false }`.
pub async fn revoke_key(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<RevokeKeyResponse>, AppError> {
    let deleted = key_service::revoke(state.keys.as_ref(), &user_id).await?;

    Ok(Json(RevokeKeyResponse {
        success: true,
        deleted,
    }))
}
