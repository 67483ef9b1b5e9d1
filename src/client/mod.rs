use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{AppConfig, ApiConfig};
use crate::cookie::TokenSource;
use crate::error::FetchError;

pub const SESSIONS_PATH: &str = "cfssessions";
pub const SESSION_PATH: &str = "cfssession";
pub const AUTHENTICATE_PATH: &str = "authenticate";

/// One configuration session as returned by the service.
///
/// The shape belongs to the remote service; the client passes it through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSession(pub Value);

impl ConfigSession {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ConfigSession {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Client for the CFS session endpoints.
///
/// Every call issues exactly one request; there is no retry and no response caching.
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Clone)]
pub struct CfsSessionClient {
    http: reqwest::Client,
    base_url: Url,
    attach_bearer: bool,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl fmt::Debug for CfsSessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CfsSessionClient")
            .field("base_url", &self.base_url.as_str())
            .field("attach_bearer", &self.attach_bearer)
            .field("has_token_source", &self.tokens.is_some())
            .finish()
    }
}

impl CfsSessionClient {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let base_url = parse_base_url(&config.api.base_url)?;
        let http = build_http_client(&config.api)?;

        Ok(Self {
            http,
            base_url,
            attach_bearer: config.auth.attach_bearer,
            tokens: None,
        })
    }

    /// Client for `base_url` with every other setting at its default.
    pub fn for_base_url(base_url: &str) -> Result<Self, FetchError> {
        let mut config = AppConfig::default();
        config.api.base_url = base_url.to_string();
        Self::new(&config)
    }

    /// Where bearer tokens come from. Consulted on every request.
    pub fn with_token_source<T>(mut self, source: T) -> Self
    where
        T: TokenSource + 'static,
    {
        self.tokens = Some(Arc::new(source));
        self
    }

    pub fn with_bearer(mut self, attach: bool) -> Self {
        self.attach_bearer = attach;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `{base}/cfssessions` and decode the session list.
    pub async fn fetch_sessions(&self) -> Result<Vec<ConfigSession>, FetchError> {
        let url = self.endpoint(&[SESSIONS_PATH]);
        self.get_json(url).await
    }

    /// Same as [`fetch_sessions`](Self::fetch_sessions), abandoning the request once `cancel` fires.
    pub async fn fetch_sessions_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<ConfigSession>, FetchError> {
        let url = self.endpoint(&[SESSIONS_PATH]);
        let label = url.to_string();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(url = %label, "request cancelled");
                Err(FetchError::Cancelled { url: label })
            }
            result = self.get_json(url) => result,
        }
    }

    /// GET `{base}/cfssession/{name}`.
    pub async fn fetch_session(&self, name: &str) -> Result<Value, FetchError> {
        let url = self.endpoint(&[SESSION_PATH, name]);
        self.get_json(url).await
    }

    /// Exchange basic credentials for a bearer token via `{base}/authenticate`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, FetchError> {
        let url = self.endpoint(&[AUTHENTICATE_PATH]);
        tracing::debug!(url = %url, username, "GET");

        let request = self.http.get(url.clone()).basic_auth(username, Some(password));
        let response = self.send(request, &url).await?;

        let body = response
            .text()
            .await
            .map_err(|source| unreachable_error(&url, source))?;

        Ok(body.trim().to_string())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        tracing::debug!(url = %url, "GET");

        let request = self.authorize(self.http.get(url.clone()));
        let response = self.send(request, &url).await?;

        let body = response
            .bytes()
            .await
            .map_err(|source| unreachable_error(&url, source))?;

        serde_json::from_slice(&body).map_err(|source| {
            tracing::error!(url = %url, error = %source, "response body is not valid json");
            FetchError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }

    /// Send the request and accept only a 200 response.
    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|source| unreachable_error(url, source))?;

        let status = response.status();
        if status != StatusCode::OK {
            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            tracing::warn!(url = %url, status = status.as_u16(), "request failed: {}", status_text);

            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                status_text,
            });
        }

        Ok(response)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if !self.attach_bearer {
            return request;
        }

        match self.tokens.as_ref().and_then(|source| source.token()) {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => {
                tracing::debug!("no auth token available, sending request without credentials");
                request
            }
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Base urls are checked for `cannot_be_a_base` at construction
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|source| FetchError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(FetchError::UnsupportedUrl(raw.to_string()));
    }

    Ok(url)
}

fn build_http_client(api: &ApiConfig) -> Result<reqwest::Client, FetchError> {
    let mut builder = reqwest::Client::builder().user_agent(api.user_agent.as_str());

    if let Some(secs) = api.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build().map_err(FetchError::ClientBuild)
}

fn unreachable_error(url: &Url, source: reqwest::Error) -> FetchError {
    tracing::error!(url = %url, error = %source, "request did not complete");
    FetchError::Unreachable {
        url: url.to_string(),
        source,
    }
}
