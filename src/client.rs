//! HTTP client for the admin routes.
//!
//! Used by the `keyctl` binary and by anything else that provisions keys on
//! behalf of end users (a chat bot's "get my key" command, for instance).
//! Each call is one short request with an explicit timeout.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::middleware::auth::ADMIN_HEADER;
use crate::models::api_key::{GenerateKeyResponse, KeyLookupResponse, RevokeKeyResponse};
use crate::models::news::NewsResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a failure envelope.
    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ControlClient {
    http: reqwest::Client,
    base_url: Url,
    admin_secret: String,
}

impl ControlClient {
    pub fn new(base_url: &str, admin_secret: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            admin_secret: admin_secret.into(),
        })
    }

    pub async fn generate_key(&self, user_id: &str) -> Result<GenerateKeyResponse, ClientError> {
        let url = self.endpoint(&["api", "admin", "keys"])?;
        self.send(Method::POST, url, Some(json!({ "user_id": user_id })))
            .await
    }

    pub async fn get_key(&self, user_id: &str) -> Result<KeyLookupResponse, ClientError> {
        let url = self.user_url(user_id)?;
        self.send(Method::GET, url, None).await
    }

    pub async fn get_user(&self, api_key: &str) -> Result<KeyLookupResponse, ClientError> {
        let mut url = self.endpoint(&["api", "admin", "keys", "lookup"])?;
        url.query_pairs_mut().append_pair("api_key", api_key);
        self.send(Method::GET, url, None).await
    }

    pub async fn revoke_key(&self, user_id: &str) -> Result<RevokeKeyResponse, ClientError> {
        let url = self.user_url(user_id)?;
        self.send(Method::DELETE, url, None).await
    }

    pub async fn get_news(&self) -> Result<NewsResponse, ClientError> {
        let url = self.endpoint(&["api", "news"])?;
        self.send(Method::GET, url, None).await
    }

    pub async fn set_news(&self, content: &str) -> Result<NewsResponse, ClientError> {
        let url = self.endpoint(&["api", "admin", "news"])?;
        self.send(Method::PUT, url, Some(json!({ "content": content })))
            .await
    }

    fn user_url(&self, user_id: &str) -> Result<Url, ClientError> {
        // The id is percent-encoded as a single path segment.
        self.endpoint(&["api", "admin", "keys", user_id])
    }

    /// Append `segments` to the base URL's path.
    ///
    /// A path prefix on the base URL (`https://host/utility/`) is kept,
    /// with or without its trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let mut request = self
            .http
            .request(method, url)
            .header(ADMIN_HEADER, &self.admin_secret);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| status.to_string());
            return Err(ClientError::Api { status, message });
        }

        Ok(response.json::<T>().await?)
    }
}
