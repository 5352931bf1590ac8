//! Document metadata endpoints.

use std::sync::Arc;

use super::envelope;
use super::query::{PageRequest, QueryString, path_segment};
use crate::domain::entities::{Document, DocumentUpdate, DownloadLink, Page};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiPort, ApiRequest};

/// Filters for the document list.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilters {
    /// Documents attached to this case.
    pub case_id: Option<String>,
    /// Documents of this client.
    pub client_id: Option<String>,
    /// Category label such as `contract`.
    pub category: Option<String>,
    /// Title fragment.
    pub search: Option<String>,
    /// Page selection.
    pub page: PageRequest,
}

impl DocumentFilters {
    /// Renders the filters as query parameters.
    #[must_use]
    pub fn query(&self) -> QueryString {
        let query = QueryString::new()
            .push_opt("caseId", self.case_id.as_deref())
            .push_opt("clientId", self.client_id.as_deref())
            .push_opt("category", self.category.as_deref())
            .push_opt("search", self.search.as_deref());
        self.page.append_to(query)
    }
}

/// Stored documents and download links.
#[derive(Clone)]
pub struct DocumentsApi {
    api: Arc<dyn ApiPort>,
}

impl DocumentsApi {
    /// Creates the client over an API port.
    #[must_use]
    pub fn new(api: Arc<dyn ApiPort>) -> Self {
        Self { api }
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn list(&self, filters: &DocumentFilters) -> Result<Page<Document>, ApiError> {
        let endpoint = filters.query().apply("/documents");
        envelope::into_page(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn get(&self, id: &str) -> Result<Document, ApiError> {
        let endpoint = format!("/documents/{}", path_segment(id));
        envelope::into_data(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn update(&self, id: &str, update: &DocumentUpdate) -> Result<Document, ApiError> {
        let endpoint = format!("/documents/{}", path_segment(id));
        let request = ApiRequest::put(endpoint, envelope::to_body(update)?);
        envelope::into_data(self.api.send(request).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        envelope::into_unit(
            self.api
                .send(ApiRequest::delete(format!("/documents/{}", path_segment(id))))
                .await?,
        )
    }

    /// Requests a download link for the stored file.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn download_url(&self, id: &str) -> Result<DownloadLink, ApiError> {
        envelope::into_data(
            self.api
                .send(ApiRequest::get(format!("/documents/{}/download", path_segment(id))))
                .await?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockApiPort;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_by_case() {
        let mock = Arc::new(MockApiPort::new().reply(json!({
            "success": true,
            "data": [{"id": 8, "title": "Power of attorney", "fileName": "poa.pdf", "caseId": 3}],
            "pagination": {"total": 1, "page": 1, "limit": 20, "totalPages": 1}
        })));
        let documents = DocumentsApi::new(mock.clone());

        let filters = DocumentFilters {
            case_id: Some("3".to_string()),
            ..DocumentFilters::default()
        };
        let page = documents.list(&filters).await.unwrap();

        assert_eq!(mock.last_request().endpoint, "/documents?caseId=3");
        assert_eq!(page.data[0].case_id.as_deref(), Some("3"));
        assert_eq!(page.limit, 20);
    }

    #[tokio::test]
    async fn test_download_url() {
        let mock = Arc::new(MockApiPort::new().reply(json!({
            "success": true,
            "data": {"url": "https://files.example.test/poa.pdf?sig=abc"}
        })));
        let documents = DocumentsApi::new(mock);

        let link = documents.download_url("8").await.unwrap();

        assert!(link.url.starts_with("https://files.example.test/"));
        assert!(link.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_list_error_propagates() {
        let mock = Arc::new(MockApiPort::new().fail(ApiError::network("timed out")));
        let documents = DocumentsApi::new(mock);

        let result = documents.list(&DocumentFilters::default()).await;

        assert!(matches!(result, Err(ApiError::Network { .. })));
    }
}
