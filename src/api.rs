//! API Client Module
//!
//! Handles HTTP communication with the Smart Ledger backend. Every request
//! carries the current bearer credential; a 401 triggers at most one silent
//! refresh followed by a single replay of the original request.

use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::session::SessionContext;

const REFRESH_PATH: &str = "auth/refresh/";

/// Refresh attempts allowed for one logical request
const MAX_REFRESH_ATTEMPTS: u8 = 1;

/// Invoked when a 401 cannot be recovered by refreshing the session.
pub type UnauthenticatedHandler = Arc<dyn Fn() + Send + Sync>;

/// A replayable request description
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append query parameters, preserving their order
    pub fn with_query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Per-request bookkeeping for the refresh-and-replay policy
#[derive(Debug, Default, Clone, Copy)]
struct RequestContext {
    refresh_attempts: u8,
}

impl RequestContext {
    fn can_refresh(&self) -> bool {
        self.refresh_attempts < MAX_REFRESH_ATTEMPTS
    }

    fn record_refresh(&mut self) {
        self.refresh_attempts += 1;
    }
}

/// API client for the Smart Ledger backend
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    session: SessionContext,
    on_unauthenticated: UnauthenticatedHandler,
}

impl ApiClient {
    /// Create a new API client reading credentials from `session`
    pub fn new(
        config: &AppConfig,
        session: SessionContext,
        on_unauthenticated: UnauthenticatedHandler,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            session,
            on_unauthenticated,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Absolute URL for a backend path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request, applying the refresh-and-replay policy.
    ///
    /// Returns the successful response, or the error of the last attempt.
    pub async fn execute(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        let mut ctx = RequestContext::default();

        loop {
            let response = self.dispatch(&request).await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            let error = ApiError::from_response(response).await;

            if status != StatusCode::UNAUTHORIZED || !ctx.can_refresh() {
                return Err(error);
            }

            let Some(refresh) = self.session.refresh_token() else {
                return Err(error);
            };

            ctx.record_refresh();
            info!(path = %request.path, "Access credential rejected, refreshing");

            // The session may be replaced or cleared while the refresh is in
            // flight; only the session that issued `refresh` is touched.
            match self.refresh_access(&refresh).await {
                Ok(access) => {
                    if !self.session.replace_access_if(&refresh, access) {
                        info!(path = %request.path, "Session changed during refresh, not replaying");
                        return Err(error);
                    }
                }
                Err(e) => {
                    warn!("Session refresh failed: {}", e);
                    if self.session.holds_refresh(&refresh) {
                        (self.on_unauthenticated)();
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Send a request and decode its JSON body (an empty body decodes as `null`)
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let parsed = if bytes.is_empty() {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&bytes)
        };
        parsed.map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::post(path).with_json(body)?).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::put(path).with_json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(path)).await?;
        Ok(())
    }

    /// Fetch a binary payload
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(ApiRequest::get(path)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        let url = self.url(&request.path);
        let mut builder = self.client.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.session.access_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, %url, "Sending request");

        builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Exchange the refresh credential for a new access credential.
    /// This call never carries an `Authorization` header.
    async fn refresh_access(&self, refresh: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        let data = response
            .json::<RefreshResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if data.access.is_empty() {
            return Err(ApiError::Parse("refresh returned an empty access credential".into()));
        }

        info!("Access credential refreshed");
        Ok(data.access)
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {detail}")]
    Status {
        status: u16,
        detail: String,
        body: Option<Value>,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Build a status error from a non-success response
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<Value>(&text).ok();
        let detail = describe_failure(status, body.as_ref(), &text);

        ApiError::Status {
            status: status.as_u16(),
            detail,
            body,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    /// The backend's `detail` field, when the error body carries one
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                body: Some(body), ..
            } => body.get("detail").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Message suitable for a transient notification
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_detail().unwrap_or(fallback).to_string()
    }
}

fn describe_failure(status: StatusCode, body: Option<&Value>, text: &str) -> String {
    if let Some(detail) = body.and_then(|b| b.get("detail")).and_then(Value::as_str) {
        return detail.to_string();
    }

    if let Some(Value::Object(fields)) = body {
        for (field, value) in fields {
            let message = match value {
                Value::String(s) => Some(s.as_str()),
                Value::Array(items) => items.first().and_then(Value::as_str),
                _ => None,
            };
            if let Some(message) = message {
                return format!("{}: {}", field, message);
            }
        }
    }

    let text = text.trim();
    if !text.is_empty() && body.is_none() {
        return text.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
