//! Authenticated JSON client for the REST backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use super::dto::ErrorBody;
use crate::domain::entities::SessionState;
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiPort, ApiRequest, HttpMethod};
use crate::infrastructure::config::ApiConfig;

const USER_AGENT: &str = concat!("lexdesk/", env!("CARGO_PKG_VERSION"));

/// Sends JSON requests with the session's bearer token attached.
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    default_avatar: String,
    session: Arc<SessionState>,
}

impl HttpApiClient {
    /// Creates a client for the configured backend.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(config: &ApiConfig, session: Arc<SessionState>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            default_avatar: config.default_avatar.clone(),
            session,
        })
    }

    /// Configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; relative endpoints are joined to the base URL.
    #[must_use]
    pub fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            return endpoint.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Default headers with caller overrides applied last.
    ///
    /// # Errors
    /// Returns error if an override is not a valid header.
    pub fn build_headers(&self, overrides: &[(String, String)]) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        if let Some(token) = self.session.access_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|e| ApiError::Encode {
                    message: format!("access token is not a valid header value: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        for (name, value) in overrides {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| ApiError::Encode {
                message: format!("invalid header name {name:?}: {e}"),
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| ApiError::Encode {
                message: format!("invalid value for header {name}: {e}"),
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    /// Public URL of an avatar, or the default avatar.
    #[must_use]
    pub fn avatar_url(&self, path: Option<&str>) -> String {
        match path {
            None | Some("") => self.default_avatar.clone(),
            Some(path) => self.resolve_url(path),
        }
    }

    fn map_transport_error(error: &reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::network("request timed out")
        } else if error.is_connect() {
            ApiError::network(format!("failed to connect to server: {error}"))
        } else {
            ApiError::network(error.to_string())
        }
    }
}

const fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl ApiPort for HttpApiClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.resolve_url(&request.endpoint);
        let headers = self.build_headers(&request.headers)?;

        debug!(method = request.method.as_str(), %url, "Sending request");

        let mut builder = self
            .client
            .request(to_method(request.method), &url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(%url, error = %e, "Request failed");
            Self::map_transport_error(&e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!(%url, error = %e, "Failed to read response body");
            Self::map_transport_error(&e)
        })?;

        if !status.is_success() {
            let body = ErrorBody::parse(&bytes);
            let message = body.message_or(|| format!("HTTP {status}"));
            debug!(%url, status = status.as_u16(), %message, "Request returned error status");
            return Err(ApiError::from_status(
                status.as_u16(),
                message,
                body.field_errors(),
            ));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(%url, error = %e, "Failed to parse response");
            ApiError::decode(format!("invalid JSON from {url}: {e}"))
        })
    }
}
