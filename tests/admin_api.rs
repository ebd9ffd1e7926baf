//! End-to-end router tests against in-memory stores.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use utility_api::{
    app::{AppState, build_router},
    error::AppError,
    middleware::auth::AdminSecrets,
    models::api_key::ApiKeyRecord,
    store::{InMemoryKeyStore, InMemoryNewsStore, KeyStore},
};

const SECRET: &str = "s3cr3t";

fn setup() -> (Router, Arc<InMemoryKeyStore>) {
    let keys = Arc::new(InMemoryKeyStore::new());
    let state = AppState::new(
        AdminSecrets::new([SECRET]),
        keys.clone(),
        Arc::new(InMemoryNewsStore::new()),
    );
    (build_router(state), keys)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    secret: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(secret) = secret {
        builder = builder.header("X-API-KEY", secret);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_key_lifecycle_scenario() {
    let (app, _) = setup();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/admin/keys",
        Some(SECRET),
        Some(json!({ "user_id": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["created"], true);
    assert_eq!(body["user_id"], "u1");
    let key = body["api_key"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/admin/keys",
        Some(SECRET),
        Some(json!({ "user_id": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["created"], false);
    assert_eq!(body["api_key"], key.as_str());

    let (status, body) = call(&app, Method::GET, "/api/admin/keys/u1", Some(SECRET), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api_key"], key.as_str());

    let uri = format!("/api/admin/keys/lookup?api_key={key}");
    let (status, body) = call(&app, Method::GET, &uri, Some(SECRET), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "u1");

    let (status, body) = call(&app, Method::DELETE, "/api/admin/keys/u1", Some(SECRET), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "deleted": true }));

    let (status, body) = call(&app, Method::GET, "/api/admin/keys/u1", Some(SECRET), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    // The revoked key no longer opens metered routes.
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/hash",
        None,
        Some(json!({ "key": key, "text": "abc", "algorithm": "sha256" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_revoke_unknown_user() {
    let (app, keys) = setup();

    let (status, body) = call(&app, Method::DELETE, "/api/admin/keys/ghost", Some(SECRET), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "deleted": false }));
    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_admin_routes_reject_bad_secrets_uniformly() {
    let (app, keys) = setup();

    for secret in [None, Some(""), Some("wrong"), Some("S3CR3T")] {
        for body in [Some(json!({ "user_id": "u1" })), Some(json!("garbage")), None] {
            let (status, response) =
                call(&app, Method::POST, "/api/admin/keys", secret, body).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "secret {secret:?}");
            assert_eq!(response["success"], false);
            assert_eq!(response["error"], "Forbidden");
        }
    }

    let (status, _) = call(&app, Method::GET, "/api/admin/keys/u1", Some("wrong"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app, Method::DELETE, "/api/admin/keys/u1", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/admin/news",
        Some("wrong"),
        Some(json!({ "content": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_user_key_is_not_an_admin_secret() {
    let (app, keys) = setup();
    let (record, _) = keys.insert_if_absent("u1", "user-key").await.unwrap();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/admin/keys",
        Some(record.api_key.as_str()),
        Some(json!({ "user_id": "u2" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/hash",
        None,
        Some(json!({ "key": SECRET, "text": "abc", "algorithm": "md5" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_generate_validation() {
    let (app, keys) = setup();

    for body in [json!({}), json!({ "user_id": "   " })] {
        let (status, response) =
            call(&app, Method::POST, "/api/admin/keys", Some(SECRET), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["success"], false);
        assert_eq!(response["code"], "invalid_input");
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/admin/keys")
        .header("X-API-KEY", SECRET)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_lookup_unknown_key() {
    let (app, _) = setup();

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/admin/keys/lookup?api_key=nope",
        Some(SECRET),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, _) = call(&app, Method::GET, "/api/admin/keys/lookup", Some(SECRET), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_generate_over_http() {
    let (app, keys) = setup();

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                call(
                    &app,
                    Method::POST,
                    "/api/admin/keys",
                    Some(SECRET),
                    Some(json!({ "user_id": "race" })),
                )
                .await
            })
        })
        .collect();

    let mut seen = Vec::new();
    let mut created = 0;
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert!(status.is_success());
        if body["created"] == true {
            created += 1;
        }
        seen.push(body["api_key"].as_str().unwrap().to_string());
    }

    assert_eq!(created, 1);
    assert!(seen.iter().all(|k| k == &seen[0]));
    assert_eq!(keys.len(), 1);
}

#[tokio::test]
async fn test_news_round_trip() {
    let (app, _) = setup();

    let (status, body) = call(&app, Method::GET, "/api/news", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "content": null }));

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/admin/news",
        Some(SECRET),
        Some(json!({ "content": "  hello  " })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "hello");

    let (_, body) = call(&app, Method::GET, "/api/news", None, None).await;
    assert_eq!(body["content"], "hello");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/admin/news",
        Some(SECRET),
        Some(json!({ "content": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], Value::Null);

    let (_, body) = call(&app, Method::GET, "/api/news", None, None).await;
    assert_eq!(body["content"], Value::Null);
}

#[tokio::test]
async fn test_hash_route_accepts_key_in_query_or_body() {
    let (app, keys) = setup();
    keys.insert_if_absent("u1", "good-key").await.unwrap();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/hash?key=good-key",
        None,
        Some(json!({ "text": "abc", "algorithm": "SHA256" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["algorithm"], "sha256");
    assert_eq!(
        body["digest"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/hash",
        None,
        Some(json!({ "key": "good-key", "text": "abc", "algorithm": "md5" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["digest"], "900150983cd24fb0d6963f7d28e17f72");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/hash",
        None,
        Some(json!({ "key": "good-key", "text": "abc", "algorithm": "sha1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "unsupported_algorithm");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/hash",
        None,
        Some(json!({ "text": "abc", "algorithm": "md5" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_public_routes() {
    let (app, _) = setup();

    let (status, body) = call(
        &app,
        Method::POST,
        "/custom",
        None,
        Some(json!({ "say_hello": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello!");

    let (_, body) = call(
        &app,
        Method::POST,
        "/custom",
        None,
        Some(json!({ "say_hello": "yes" })),
    )
    .await;
    assert_eq!(body["message"], "...");

    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = call(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_oversized_body_with_wrong_query_key_is_forbidden() {
    let (app, keys) = setup();
    keys.insert_if_absent("u1", "good-key").await.unwrap();

    let oversized = format!(r#"{{"text":"{}","algorithm":"md5"}}"#, "a".repeat(2 * 1024 * 1024));

    for uri in ["/api/v1/hash?key=wrong", "/api/v1/hash"] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(oversized.clone()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "forbidden");
    }
}

#[tokio::test]
async fn test_padded_ids_and_keys_are_rejected() {
    let (app, keys) = setup();
    keys.insert_if_absent("u1", "good-key").await.unwrap();

    let (status, body) = call(&app, Method::DELETE, "/api/admin/keys/%20u1", Some(SECRET), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
    assert!(keys.find_by_user("u1").await.unwrap().is_some());

    let (status, _) = call(
        &app,
        Method::GET,
        "/api/admin/keys/lookup?api_key=%20good-key",
        Some(SECRET),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The gate matches exactly too, so both sides agree on padded keys.
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/hash?key=%20good-key",
        None,
        Some(json!({ "text": "abc", "algorithm": "md5" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

/// A key store whose backend is unreachable.
struct UnreachableKeyStore;

fn unreachable_store() -> AppError {
    AppError::StoreUnavailable("connection refused".to_string())
}

#[async_trait]
impl KeyStore for UnreachableKeyStore {
    async fn key_exists(&self, _api_key: &str) -> Result<bool, AppError> {
        Err(unreachable_store())
    }

    async fn find_by_user(&self, _user_id: &str) -> Result<Option<ApiKeyRecord>, AppError> {
        Err(unreachable_store())
    }

    async fn find_user_by_key(&self, _api_key: &str) -> Result<Option<String>, AppError> {
        Err(unreachable_store())
    }

    async fn insert_if_absent(
        &self,
        _user_id: &str,
        _candidate_key: &str,
    ) -> Result<(ApiKeyRecord, bool), AppError> {
        Err(unreachable_store())
    }

    async fn delete_by_user(&self, _user_id: &str) -> Result<bool, AppError> {
        Err(unreachable_store())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unreachable_store())
    }
}

#[tokio::test]
async fn test_store_outage_never_authorizes() {
    let state = AppState::new(
        AdminSecrets::new([SECRET]),
        Arc::new(UnreachableKeyStore),
        Arc::new(InMemoryNewsStore::new()),
    );
    let app = build_router(state);

    for uri in ["/api/v1/hash?key=k", "/api/v1/hash"] {
        let (status, body) = call(
            &app,
            Method::POST,
            uri,
            None,
            Some(json!({ "key": "k", "text": "abc", "algorithm": "md5" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "store_unavailable");
        assert!(body.get("digest").is_none());
    }

    // Requests without a key are refused before the store is consulted.
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/v1/hash",
        None,
        Some(json!({ "text": "abc", "algorithm": "md5" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "store_unavailable");

    let (status, body) = call(&app, Method::GET, "/api/admin/keys/u1", Some(SECRET), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "store_unavailable");
}
