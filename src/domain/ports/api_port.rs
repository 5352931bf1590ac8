//! Port for calls against the Lexdesk REST API.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::ApiError;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A single API call.
///
/// `endpoint` is either relative to the configured base URL or an absolute
/// `http(s)` URL. Extra headers override the defaults on conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path such as `/clients/42`, or an absolute URL.
    pub endpoint: String,
    /// JSON body.
    pub body: Option<Value>,
    /// Extra headers, applied after the defaults.
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Request without body or extra headers.
    #[must_use]
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    /// `POST` request with a JSON body.
    #[must_use]
    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, endpoint).with_body(body)
    }

    /// `PUT` request with a JSON body.
    #[must_use]
    pub fn put(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, endpoint).with_body(body)
    }

    /// `PATCH` request with a JSON body.
    #[must_use]
    pub fn patch(endpoint: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, endpoint).with_body(body)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header that overrides the defaults.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Dispatches API calls and returns the decoded JSON body.
///
/// Implementations propagate transport and HTTP failures as [`ApiError`]
/// without retrying. A successful empty body is returned as `Value::Null`.
#[async_trait]
pub trait ApiPort: Send + Sync {
    /// Performs one request.
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}
