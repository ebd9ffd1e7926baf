//! Authorization gate.
//!
//! Two credential kinds exist and are never interchangeable:
//! - the admin shared secret, sent in the `X-API-KEY` header
//! - a per-user API key, sent as the `key` query parameter or as a
//!   top-level `key` field in a JSON body
//!
//! Both checks answer `Forbidden` for missing, empty, and wrong credentials
//! alike.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::{app::AppState, error::AppError, store::KeyStore};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the admin shared secret.
pub const ADMIN_HEADER: &str = "X-API-KEY";

/// Largest body the user-key middleware will buffer while looking for `key`.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Outcome of a credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Forbidden,
}

/// The configured admin secrets, fixed at startup.
///
/// Secrets are held only as HMAC tags under a per-process random key, and a
/// candidate is checked against every tag with a constant-time comparison,
/// so neither timing nor early exit reveals which secrets exist.
pub struct AdminSecrets {
    mac_key: [u8; 32],
    tags: Vec<Vec<u8>>,
}

impl AdminSecrets {
    pub fn new<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mac_key: [u8; 32] = rand::random();
        let tags = secrets
            .into_iter()
            .filter(|s| !s.as_ref().is_empty())
            .map(|s| tag(&mac_key, s.as_ref()))
            .collect();

        Self { mac_key, tags }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn matches(&self, candidate: &str) -> bool {
        let mac = keyed_mac(&self.mac_key, candidate);

        // No early return: every configured secret is checked.
        self.tags
            .iter()
            .fold(false, |found, tag| mac.clone().verify_slice(tag).is_ok() | found)
    }
}

impl std::fmt::Debug for AdminSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSecrets")
            .field("count", &self.tags.len())
            .finish_non_exhaustive()
    }
}

fn keyed_mac(key: &[u8], message: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC key length is valid");
    mac.update(message.as_bytes());
    mac
}

fn tag(key: &[u8], message: &str) -> Vec<u8> {
    keyed_mac(key, message).finalize().into_bytes().to_vec()
}

/// Admin check: `Authorized` iff `provided` exactly equals a configured secret.
pub fn require_admin(secrets: &AdminSecrets, provided: Option<&str>) -> Authorization {
    match provided {
        Some(candidate) if !candidate.is_empty() && secrets.matches(candidate) => {
            Authorization::Authorized
        }
        _ => Authorization::Forbidden,
    }
}

/// Per-user check: `Authorized` iff the key exists in the store.
///
/// Every call is a fresh store lookup. A store failure is returned as an
/// error, never treated as authorized.
pub async fn require_user_key(
    store: &dyn KeyStore,
    provided: Option<&str>,
) -> Result<Authorization, AppError> {
    let Some(candidate) = provided.filter(|k| !k.is_empty()) else {
        return Ok(Authorization::Forbidden);
    };

    if store.key_exists(candidate).await? {
        Ok(Authorization::Authorized)
    } else {
        Ok(Authorization::Forbidden)
    }
}

/// Admin middleware for the `/api/admin` routes.
///
/// Runs before any body extraction, so the answer for a bad secret does not
/// depend on the request body.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(ADMIN_HEADER)
        .and_then(|h| h.to_str().ok());

    match require_admin(&state.secrets, provided) {
        Authorization::Authorized => Ok(next.run(request).await),
        Authorization::Forbidden => {
            tracing::warn!(path = %request.uri().path(), "admin authorization failed");
            Err(AppError::Forbidden)
        }
    }
}

#[derive(Deserialize)]
struct KeyField {
    #[serde(default)]
    key: Option<String>,
}

/// User-key middleware for the metered utility routes.
///
/// # Flow
///
/// 1. Look for `key` in the query string
/// 2. Otherwise buffer the body and look for a top-level JSON `key` field
/// 3. Check the key against the store
/// 4. Pass the request on with its body intact, or reject with 403
///
/// A body that cannot be buffered (over 1 MiB, or a broken stream) counts
/// as a missing key, so the caller still sees the plain 403.
pub async fn user_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();

    let (provided, body) = match key_from_query(parts.uri.query()) {
        Some(key) => (Some(key), body),
        None => match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => (key_from_json(&bytes), Body::from(bytes)),
            Err(_) => (None, Body::empty()),
        },
    };

    match require_user_key(state.keys.as_ref(), provided.as_deref()).await? {
        Authorization::Authorized => {
            let request = Request::from_parts(parts, body);
            Ok(next.run(request).await)
        }
        Authorization::Forbidden => {
            tracing::warn!(path = %parts.uri.path(), "user key authorization failed");
            Err(AppError::Forbidden)
        }
    }
}

fn key_from_query(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(name, _)| name == "key")
        .map(|(_, value)| value.into_owned())
}

fn key_from_json(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<KeyField>(body).ok()?.key
}
