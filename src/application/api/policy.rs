//! Failure handling for secondary list fetches.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::entities::Page;
use crate::domain::errors::ApiError;

/// What a list call does when the request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the error to the caller.
    Propagate,
    /// Log the error and return an empty page.
    #[default]
    SoftFail,
}

impl FailurePolicy {
    /// Applies the policy to a list result.
    ///
    /// # Errors
    /// Returns the original error under [`FailurePolicy::Propagate`].
    pub fn apply<T>(self, operation: &str, result: Result<Page<T>, ApiError>) -> Result<Page<T>, ApiError> {
        match (self, result) {
            (_, Ok(page)) => Ok(page),
            (Self::Propagate, Err(e)) => Err(e),
            (Self::SoftFail, Err(e)) => {
                warn!(operation, error = %e, "Request failed, returning empty list");
                Ok(Page::empty())
            }
        }
    }
}

/// Per-call-site failure policies for a client's related records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftFailPolicy {
    /// `ClientsApi::cases`.
    #[serde(default)]
    pub client_cases: FailurePolicy,
    /// `ClientsApi::appointments`.
    #[serde(default)]
    pub client_appointments: FailurePolicy,
    /// `ClientsApi::documents`.
    #[serde(default)]
    pub client_documents: FailurePolicy,
}

impl SoftFailPolicy {
    /// Every call site propagates errors.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            client_cases: FailurePolicy::Propagate,
            client_appointments: FailurePolicy::Propagate,
            client_documents: FailurePolicy::Propagate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_fail_returns_empty_page() {
        let result: Result<Page<u8>, ApiError> = Err(ApiError::network("connection reset"));
        let page = FailurePolicy::SoftFail.apply("client cases", result).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_propagate_keeps_error() {
        let result: Result<Page<u8>, ApiError> = Err(ApiError::unauthorized("expired"));
        let outcome = FailurePolicy::Propagate.apply("client cases", result);
        assert!(matches!(outcome, Err(ApiError::Unauthorized { .. })));
    }

    #[test]
    fn test_policy_from_toml() {
        let policy: SoftFailPolicy = toml::from_str("client_documents = \"propagate\"").unwrap();

        assert_eq!(policy.client_cases, FailurePolicy::SoftFail);
        assert_eq!(policy.client_documents, FailurePolicy::Propagate);
    }
}
