// Authenticated fetch wrapper with refresh-and-retry and error bus publication

use crate::error::{ClientError, Result};
use crate::error_bus::ErrorBus;
use crate::refresh::RefreshCoordinator;
use crate::token_store::TokenStore;
use crate::types::User;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_BACKEND_ORIGIN: &str = "http://localhost:8000";
const DEFAULT_KEEP_ALIVE_SECS: u64 = 300;
const DEFAULT_MAX_ERROR_BODY_CHARS: usize = 200;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin prepended to every request path. Points at the same-origin
    /// proxy in front of the backend.
    pub base_url: String,

    /// Backend origin the proxy forwards to; named in not-found diagnostics
    pub backend_origin: String,

    /// Period of the health keep-alive ping
    /// Default: 300 seconds
    pub keep_alive_interval: Duration,

    /// Raw error bodies are cut to this many characters
    /// Default: 200
    pub max_error_body_chars: usize,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, backend_origin: impl Into<String>) -> Self {
        Self {
            base_url: trim_origin(base_url.into()),
            backend_origin: trim_origin(backend_origin.into()),
            keep_alive_interval: Duration::from_secs(DEFAULT_KEEP_ALIVE_SECS),
            max_error_body_chars: DEFAULT_MAX_ERROR_BODY_CHARS,
        }
    }

    /// Read `CINEMA_BASE_URL`, `CINEMA_API_URL` and `CINEMA_KEEP_ALIVE_SECS`
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("CINEMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let backend_origin =
            std::env::var("CINEMA_API_URL").unwrap_or_else(|_| DEFAULT_BACKEND_ORIGIN.to_string());

        let mut config = Self::new(base_url, backend_origin);

        if let Ok(raw) = std::env::var("CINEMA_KEEP_ALIVE_SECS") {
            let secs: u64 = raw.parse().map_err(|e| {
                ClientError::Configuration(format!("Invalid CINEMA_KEEP_ALIVE_SECS '{raw}': {e}"))
            })?;
            config.keep_alive_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_BACKEND_ORIGIN)
    }
}

fn trim_origin(origin: String) -> String {
    origin.trim_end_matches('/').to_string()
}

/// Whether a 401 may be recovered by refreshing the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Refresh once and retry the request once
    #[default]
    RefreshOnce,
    /// Report the 401 as is
    Never,
}

/// Request payload
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    /// Pre-serialized JSON text
    Raw(String),
    /// Binary or multipart payload; the content type is left to the caller's headers
    Binary(Vec<u8>),
}

/// Method, headers and body of one logical request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        Ok(self.with_body(RequestBody::Json(serde_json::to_value(body)?)))
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

/// Where a request stands when it stops
enum Stage {
    /// First attempt answered
    Sent,
    /// Answered after a successful refresh
    Retried,
    /// Refresh failed; carries the refresh error
    RefreshFailed(ClientError),
}

struct Inner {
    config: ClientConfig,
    http_client: Client,
    token_store: TokenStore,
    current_user: Arc<RwLock<Option<User>>>,
    error_bus: ErrorBus,
    refresh: RefreshCoordinator,
}

/// API client with bearer auth, single-flight refresh and error publication
///
/// Cheap to clone; clones share the token, the refresh handle and the bus.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Create a client with its own error bus
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_error_bus(config, ErrorBus::new())
    }

    /// Create a client publishing failures on an existing bus
    pub fn with_error_bus(config: ClientConfig, error_bus: ErrorBus) -> Result<Self> {
        // The cookie store carries the session cookie the refresh endpoint relies on.
        let http_client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let token_store = TokenStore::new();
        let current_user = Arc::new(RwLock::new(None));
        let refresh = RefreshCoordinator::new(
            http_client.clone(),
            &config.base_url,
            token_store.clone(),
            Arc::clone(&current_user),
        );

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                http_client,
                token_store,
                current_user,
                error_bus,
                refresh,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn error_bus(&self) -> &ErrorBus {
        &self.inner.error_bus
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.inner.token_store
    }

    pub fn set_access_token(&self, token: Option<String>) {
        self.inner.token_store.set(token);
    }

    /// Profile of the signed-in user, if known
    pub fn current_user(&self) -> Option<User> {
        self.inner.current_user.read().clone()
    }

    pub(crate) fn set_current_user(&self, user: Option<User>) {
        *self.inner.current_user.write() = user;
    }

    pub fn resolve_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.config.base_url, path)
    }

    /// Refresh the access token now, joining any refresh already in flight
    pub async fn refresh_access_token(&self) -> Result<String> {
        self.inner.refresh.refresh_access_token_once().await
    }

    /// GET `path` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch_json(path, &RequestOptions::get(), RetryPolicy::RefreshOnce)
            .await
    }

    /// POST `body` as JSON to `path` and decode the JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::post().with_json(body)?;
        self.fetch_json(path, &options, RetryPolicy::RefreshOnce)
            .await
    }

    /// Perform one logical request and decode its JSON body
    ///
    /// A decoding failure on a successful response is returned as
    /// [`ClientError::Serialization`] and is not published on the bus.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
        retry: RetryPolicy,
    ) -> Result<T> {
        let response = self.fetch(path, options, retry).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Perform one logical request, returning the successful response
    ///
    /// A 401 under [`RetryPolicy::RefreshOnce`] triggers one coalesced refresh
    /// followed by exactly one retry. Any non-2xx outcome is classified,
    /// published on the error bus once, and returned as an error.
    pub async fn fetch(
        &self,
        path: &str,
        options: &RequestOptions,
        retry: RetryPolicy,
    ) -> Result<Response> {
        let url = self.resolve_url(path);
        let response = self.send_once(&url, options).await?;

        let (response, stage) = match (response.status(), retry) {
            (StatusCode::UNAUTHORIZED, RetryPolicy::RefreshOnce) => {
                debug!(url = %url, "Received 401, refreshing access token");
                match self.inner.refresh.refresh_access_token_once().await {
                    Ok(_) => {
                        debug!(url = %url, "Retrying request with refreshed token");
                        (self.send_once(&url, options).await?, Stage::Retried)
                    }
                    Err(e) => (response, Stage::RefreshFailed(e)),
                }
            }
            _ => (response, Stage::Sent),
        };

        if response.status().is_success() {
            return Ok(response);
        }

        Err(self.fail(&url, response, stage).await)
    }

    /// Issue a request once, with no refresh and no failure classification
    pub(crate) async fn send_unchecked(&self, path: &str, options: &RequestOptions) -> Result<Response> {
        self.send_once(&self.resolve_url(path), options).await
    }

    /// Attach auth and content headers and issue the request
    async fn send_once(&self, url: &str, options: &RequestOptions) -> Result<Response> {
        let mut headers = options.headers.clone();

        if let Some(token) = self.inner.token_store.get() {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                ClientError::Configuration(format!("Access token is not a valid header value: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = self.inner.http_client.request(options.method.clone(), url);
        match &options.body {
            Some(RequestBody::Json(value)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                builder = builder.body(serde_json::to_vec(value)?);
            }
            Some(RequestBody::Raw(text)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                builder = builder.body(text.clone());
            }
            Some(RequestBody::Binary(bytes)) => {
                builder = builder.body(bytes.clone());
            }
            None => {}
        }

        debug!(method = %options.method, url = %url, "Sending request");
        Ok(builder.headers(headers).send().await?)
    }

    /// Classify a terminal failure and publish it on the error bus
    async fn fail(&self, url: &str, response: Response, stage: Stage) -> ClientError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        let error = match stage {
            Stage::RefreshFailed(e) => e,
            _ if status == StatusCode::NOT_FOUND => ClientError::NotFound {
                url: url.to_string(),
                backend_origin: self.inner.config.backend_origin.clone(),
            },
            Stage::Retried if status == StatusCode::UNAUTHORIZED => ClientError::SessionExpired {
                reason: "request rejected after token refresh".to_string(),
            },
            _ => ClientError::Api {
                status,
                message: extract_message(status, &text, self.inner.config.max_error_body_chars),
            },
        };

        let title = failure_title(&error);
        warn!(url = %url, status = %status, title = title, error = %error, "API request failed");
        self.inner.error_bus.dispatch(error.to_string(), title);

        error
    }
}

/// Human-readable message from an error body
///
/// Prefers a `message`, `error` or `details` field of a JSON object, then the
/// raw text cut to `max_chars`.
pub fn extract_message(status: StatusCode, text: &str, max_chars: usize) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(text) {
        for key in ["message", "error", "details"] {
            match fields.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => return s.clone(),
                Some(Value::Array(items)) => {
                    let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                    if !parts.is_empty() {
                        return parts.join("; ");
                    }
                }
                _ => {}
            }
        }
    }

    let body: String = text.trim().chars().take(max_chars).collect();
    if body.is_empty() {
        format!("API error {}", status.as_u16())
    } else {
        format!("API error {}: {}", status.as_u16(), body)
    }
}

/// Modal title for a failure
pub fn failure_title(error: &ClientError) -> &'static str {
    match error {
        ClientError::NotFound { .. } => "Not Found",
        ClientError::SessionExpired { .. } | ClientError::RefreshFailed(_) => "Session Expired",
        ClientError::Api { status, .. } => match status.as_u16() {
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            409 => "Conflict",
            400..=499 => "Request Error",
            500..=599 => "Server Error",
            _ => "Error",
        },
        _ => "Error",
    }
}
