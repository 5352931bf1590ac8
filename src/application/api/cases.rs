//! Case management endpoints.

use std::sync::Arc;

use super::envelope;
use super::query::{PageRequest, QueryString, path_segment};
use crate::domain::entities::{Case, CaseStatus, CaseUpdate, NewCase, Page};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiPort, ApiRequest};

/// Filters for the case list.
#[derive(Debug, Clone, Default)]
pub struct CaseFilters {
    /// Only cases in this state.
    pub status: Option<CaseStatus>,
    /// Cases of this client.
    pub client_id: Option<String>,
    /// Cases assigned to this lawyer.
    pub lawyer_id: Option<String>,
    /// Title or reference fragment.
    pub search: Option<String>,
    /// Page selection.
    pub page: PageRequest,
}

impl CaseFilters {
    /// Renders the filters as query parameters.
    #[must_use]
    pub fn query(&self) -> QueryString {
        let query = QueryString::new()
            .push_opt("status", self.status.map(CaseStatus::as_str))
            .push_opt("clientId", self.client_id.as_deref())
            .push_opt("lawyerId", self.lawyer_id.as_deref())
            .push_opt("search", self.search.as_deref());
        self.page.append_to(query)
    }
}

/// Case files.
#[derive(Clone)]
pub struct CasesApi {
    api: Arc<dyn ApiPort>,
}

impl CasesApi {
    /// Creates the client over an API port.
    #[must_use]
    pub fn new(api: Arc<dyn ApiPort>) -> Self {
        Self { api }
    }

    /// Lists cases visible to the current user.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list(&self, filters: &CaseFilters) -> Result<Page<Case>, ApiError> {
        let endpoint = filters.query().apply("/cases");
        envelope::into_page(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn get(&self, id: &str) -> Result<Case, ApiError> {
        let endpoint = format!("/cases/{}", path_segment(id));
        envelope::into_data(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn create(&self, case: &NewCase) -> Result<Case, ApiError> {
        let request = ApiRequest::post("/cases", envelope::to_body(case)?);
        envelope::into_data(self.api.send(request).await?)
    }

    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn update(&self, id: &str, update: &CaseUpdate) -> Result<Case, ApiError> {
        let endpoint = format!("/cases/{}", path_segment(id));
        let request = ApiRequest::put(endpoint, envelope::to_body(update)?);
        envelope::into_data(self.api.send(request).await?)
    }

    /// Marks a case as closed.
    ///
    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn close(&self, id: &str) -> Result<Case, ApiError> {
        let endpoint = format!("/cases/{}/close", path_segment(id));
        let request = ApiRequest::patch(endpoint, serde_json::json!({}));
        envelope::into_data(self.api.send(request).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("/cases/{}", path_segment(id));
        envelope::into_unit(self.api.send(ApiRequest::delete(endpoint)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::HttpMethod;
    use crate::domain::ports::mocks::MockApiPort;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let mock = Arc::new(MockApiPort::new().reply(json!({"success": true, "data": []})));
        let cases = CasesApi::new(mock.clone());

        let filters = CaseFilters {
            status: Some(CaseStatus::InProgress),
            client_id: Some("c9".to_string()),
            ..CaseFilters::default()
        };
        let page = cases.list(&filters).await.unwrap();

        assert_eq!(
            mock.last_request().endpoint,
            "/cases?status=IN_PROGRESS&clientId=c9"
        );
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_close_patches_case() {
        let mock = Arc::new(MockApiPort::new().reply(json!({
            "success": true,
            "data": {"id": "k1", "title": "Lease dispute", "status": "CLOSED"}
        })));
        let cases = CasesApi::new(mock.clone());

        let case = cases.close("k1").await.unwrap();

        let request = mock.last_request();
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.endpoint, "/cases/k1/close");
        assert_eq!(case.status, CaseStatus::Closed);
    }

    #[tokio::test]
    async fn test_validation_error_surfaces_unchanged() {
        let mock = Arc::new(MockApiPort::new().fail(ApiError::from_status(
            400,
            "Validation failed",
            vec![crate::domain::errors::FieldError {
                field: "title".to_string(),
                message: "Title is required".to_string(),
            }],
        )));
        let cases = CasesApi::new(mock);

        let result = cases
            .create(&NewCase {
                title: String::new(),
                client_id: "c1".to_string(),
                lawyer_id: None,
                description: None,
                case_type: None,
            })
            .await;

        match result {
            Err(ApiError::Validation { errors, .. }) => assert_eq!(errors[0].field, "title"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
