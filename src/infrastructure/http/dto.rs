//! Wire shapes of error responses.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::errors::FieldError;

/// Body of a non-success response.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Primary reason.
    #[serde(default)]
    pub message: Option<String>,
    /// Some handlers report the reason under `error` instead of `message`.
    #[serde(default)]
    pub error: Option<String>,
    /// Validation details, usually a list of field errors.
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ErrorBody {
    /// Parses an error body, tolerating non-JSON payloads.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// First non-blank of `message` and `error`, else the fallback.
    #[must_use]
    pub fn message_or(&self, fallback: impl FnOnce() -> String) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(fallback)
    }

    /// Field errors, empty when absent or not a list.
    #[must_use]
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.errors
            .clone()
            .and_then(|errors| serde_json::from_value(errors).ok())
            .unwrap_or_default()
    }
}
