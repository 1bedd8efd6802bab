// src/core/http_client.rs
//! JSON HTTP client for the recruiting backend.
//!
//! Every call rebuilds its headers, attaches the stored bearer token, runs
//! the registered hooks in registration order and sends the request with a
//! per-call timeout. Failures come back as [`ApiError`]; nothing is retried.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::token_store::TokenStore;
use crate::types::response::error_message;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ===== Errors =====

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Status {
        status: StatusCode,
        message: String,
        body: Value,
    },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no authentication token stored")]
    MissingToken,
}

impl ApiError {
    /// Status code returned by the server, if the request got that far
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Response body of a non-2xx answer
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }

    fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

// ===== Request/response shapes seen by hooks =====

/// Fully resolved request, as handed to request hooks
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Successful response, as handed to response hooks
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    /// Fail with [`ApiError::MissingToken`] instead of sending anonymously
    pub require_auth: bool,
}

impl RequestOptions {
    pub fn with_query(query: Vec<(String, String)>) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn require_auth(mut self) -> Self {
        self.require_auth = true;
        self
    }
}

pub type RequestHook = Arc<dyn Fn(RequestConfig) -> RequestConfig + Send + Sync>;
pub type ResponseHook = Arc<dyn Fn(ApiResponse) -> ApiResponse + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(ApiError) -> ApiError + Send + Sync>;

#[derive(Default, Clone)]
struct Hooks {
    request: Vec<RequestHook>,
    response: Vec<ResponseHook>,
    error: Vec<ErrorHook>,
}

// ===== Client =====

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    default_headers: HeaderMap,
    timeout: Duration,
    tokens: Arc<dyn TokenStore>,
    hooks: Hooks,
}

impl HttpClient {
    /// Create a client; the per-call timeout is enforced on each request
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
            timeout,
            tokens,
            hooks: Hooks::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.tokens)
    }

    pub fn set_default_header(&mut self, name: &str, value: &str) -> Result<(), ApiError> {
        let (name, value) = parse_header(name, value)?;
        self.default_headers.insert(name, value);
        Ok(())
    }

    pub fn add_request_hook<F>(&mut self, hook: F)
    where
        F: Fn(RequestConfig) -> RequestConfig + Send + Sync + 'static,
    {
        self.hooks.request.push(Arc::new(hook));
    }

    pub fn add_response_hook<F>(&mut self, hook: F)
    where
        F: Fn(ApiResponse) -> ApiResponse + Send + Sync + 'static,
    {
        self.hooks.response.push(Arc::new(hook));
    }

    pub fn add_error_hook<F>(&mut self, hook: F)
    where
        F: Fn(ApiError) -> ApiError + Send + Sync + 'static,
    {
        self.hooks.error.push(Arc::new(hook));
    }

    pub async fn get<R>(&self, endpoint: &str, options: RequestOptions) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        self.send(Method::GET, endpoint, None::<&Value>, options).await
    }

    pub async fn post<T, R>(&self, endpoint: &str, payload: &T, options: RequestOptions) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Method::POST, endpoint, Some(payload), options).await
    }

    pub async fn put<T, R>(&self, endpoint: &str, payload: &T, options: RequestOptions) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Method::PUT, endpoint, Some(payload), options).await
    }

    pub async fn patch<T, R>(&self, endpoint: &str, payload: &T, options: RequestOptions) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(Method::PATCH, endpoint, Some(payload), options).await
    }

    pub async fn delete<R>(&self, endpoint: &str, options: RequestOptions) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        self.send(Method::DELETE, endpoint, None::<&Value>, options).await
    }

    /// Send a request and deserialize the (hook-transformed) body into `R`
    pub async fn send<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
        options: RequestOptions,
    ) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = match payload.map(serde_json::to_value).transpose() {
            Ok(body) => body,
            Err(e) => return Err(self.apply_error_hooks(ApiError::InvalidRequest(e.to_string()))),
        };

        let value = self.execute(method, endpoint, body, options).await?;
        serde_json::from_value(value).map_err(|e| self.apply_error_hooks(ApiError::Decode(e.to_string())))
    }

    /// Run the full request pipeline and return the raw JSON body
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let config = match self.build_config(method, endpoint, body, options).await {
            Ok(config) => config,
            Err(e) => return Err(self.apply_error_hooks(e)),
        };
        let config = self
            .hooks
            .request
            .iter()
            .fold(config, |config, hook| hook(config));

        let request_id = Uuid::new_v4();
        info!(
            request_id = %request_id,
            method = %config.method,
            url = %config.url,
            "API request"
        );
        let started = Instant::now();

        let result = self.dispatch(&config).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                info!(
                    request_id = %request_id,
                    status = response.status.as_u16(),
                    elapsed_ms,
                    "API response"
                );
                let response = self
                    .hooks
                    .response
                    .iter()
                    .fold(response, |response, hook| hook(response));
                Ok(response.body)
            }
            Err(err) => {
                warn!(
                    request_id = %request_id,
                    url = %config.url,
                    elapsed_ms,
                    "API error: {}",
                    err
                );
                Err(self.apply_error_hooks(err))
            }
        }
    }

    async fn build_config(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<RequestConfig, ApiError> {
        let mut headers = self.default_headers.clone();
        for (name, value) in &options.headers {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }

        let token = match self.tokens.token().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read stored token, sending without it: {}", e);
                None
            }
        };

        match token {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ApiError::InvalidRequest("Stored token is not a valid header value".to_string()))?;
                headers.insert(AUTHORIZATION, value);
            }
            None if options.require_auth => return Err(ApiError::MissingToken),
            None => debug!("No token stored, sending {} {} anonymously", method, endpoint),
        }

        Ok(RequestConfig {
            method,
            url: self.url_for(endpoint),
            headers,
            query: options.query,
            body,
            timeout: options.timeout.unwrap_or(self.timeout),
        })
    }

    async fn dispatch(&self, config: &RequestConfig) -> Result<ApiResponse, ApiError> {
        let mut request = self
            .client
            .request(config.method.clone(), &config.url)
            .headers(config.headers.clone())
            .timeout(config.timeout);

        if !config.query.is_empty() {
            request = request.query(&config.query);
        }
        if let Some(body) = &config.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, config.timeout))?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(e, config.timeout))?;

        if status.is_success() {
            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).map_err(|e| {
                    ApiError::Decode(format!("{} (body: {})", e, truncate(&text, 200)))
                })?
            };
            Ok(ApiResponse {
                status,
                headers,
                body,
            })
        } else {
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            let message = error_message(&body).unwrap_or_else(|| {
                format!(
                    "Request failed with status {}",
                    status.canonical_reason().unwrap_or("unknown")
                )
            });
            Err(ApiError::Status {
                status,
                message,
                body,
            })
        }
    }

    fn apply_error_hooks(&self, err: ApiError) -> ApiError {
        self.hooks.error.iter().fold(err, |err, hook| hook(err))
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ApiError> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ApiError::InvalidRequest(format!("Invalid header name: {}", name)))?;
    let value = HeaderValue::from_str(value)
        .map_err(|_| ApiError::InvalidRequest(format!("Invalid value for header {}", name)))?;
    Ok((name, value))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
