//! Decoding of the `{success, data, message, pagination}` response envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::{Page, Pagination};
use crate::domain::errors::ApiError;

/// Standard response wrapper of the Lexdesk API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Missing means success.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Payload.
    pub data: Option<T>,
    /// Human-readable status from the server.
    #[serde(default)]
    pub message: Option<String>,
    /// Present on list responses.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

fn default_success() -> bool {
    true
}

/// Decodes an envelope, turning `success: false` into [`ApiError::Rejected`].
///
/// # Errors
/// Returns error if the body is not an envelope or reports failure.
pub fn decode<T: DeserializeOwned>(body: Value) -> Result<Envelope<T>, ApiError> {
    let envelope: Envelope<T> =
        serde_json::from_value(body).map_err(|e| ApiError::decode(e.to_string()))?;

    if !envelope.success {
        return Err(ApiError::rejected(
            envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string()),
        ));
    }

    Ok(envelope)
}

/// Extracts the required `data` member.
///
/// # Errors
/// Returns error if decoding fails or `data` is missing.
pub fn into_data<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    decode::<T>(body)?
        .data
        .ok_or_else(|| ApiError::decode("response envelope has no data"))
}

/// Normalizes a list response into a [`Page`].
///
/// # Errors
/// Returns error if decoding fails.
pub fn into_page<T: DeserializeOwned>(body: Value) -> Result<Page<T>, ApiError> {
    let envelope = decode::<Vec<T>>(body)?;
    Ok(Page::from_parts(
        envelope.data.unwrap_or_default(),
        envelope.pagination,
    ))
}

/// Checks an envelope whose payload is irrelevant.
///
/// # Errors
/// Returns error if the envelope reports failure.
pub fn into_unit(body: Value) -> Result<(), ApiError> {
    if body.is_null() {
        return Ok(());
    }
    decode::<Value>(body).map(|_| ())
}

/// Serializes a request payload.
///
/// # Errors
/// Returns error if the payload cannot be represented as JSON.
pub fn to_body<T: Serialize>(payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Encode {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_page_unwraps_pagination() {
        let body = json!({
            "success": true,
            "data": [1, 2],
            "pagination": {"total": 12, "page": 2, "limit": 2, "totalPages": 6}
        });

        let page: Page<u32> = into_page(body).unwrap();

        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.total, 12);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 6);
    }

    #[test]
    fn test_into_page_without_data_is_empty() {
        let page: Page<u32> = into_page(json!({"success": true})).unwrap();
        assert_eq!(page, Page::empty());
    }

    #[test]
    fn test_unsuccessful_envelope_is_rejected() {
        let result = into_data::<u32>(json!({"success": false, "message": "Case is locked"}));

        match result {
            Err(ApiError::Rejected { message }) => assert_eq!(message, "Case is locked"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_data_is_decode_error() {
        let result = into_data::<u32>(json!({"success": true}));
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[test]
    fn test_into_unit_accepts_empty_body() {
        assert!(into_unit(Value::Null).is_ok());
        assert!(into_unit(json!({"success": true, "message": "Deleted"})).is_ok());
        assert!(into_unit(json!({"success": false})).is_err());
    }
}
