//! Client management endpoints.

use std::sync::Arc;

use tracing::debug;

use super::envelope;
use super::policy::SoftFailPolicy;
use super::query::{PageRequest, QueryString, path_segment};
use crate::domain::entities::{
    Appointment, Case, Client, ClientUpdate, Document, NewClient, Page,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiPort, ApiRequest};

/// Filters for the client list.
#[derive(Debug, Clone, Default)]
pub struct ClientFilters {
    /// Name, email or company fragment.
    pub search: Option<String>,
    /// Active or archived clients.
    pub is_active: Option<bool>,
    /// Clients assigned to this lawyer.
    pub lawyer_id: Option<String>,
    /// Page selection.
    pub page: PageRequest,
}

impl ClientFilters {
    /// Renders the filters as query parameters.
    #[must_use]
    pub fn query(&self) -> QueryString {
        let query = QueryString::new()
            .push_opt("search", self.search.as_deref())
            .push_opt("isActive", self.is_active)
            .push_opt("lawyerId", self.lawyer_id.as_deref());
        self.page.append_to(query)
    }
}

/// Client records and the records attached to a client.
#[derive(Clone)]
pub struct ClientsApi {
    api: Arc<dyn ApiPort>,
    policy: SoftFailPolicy,
}

impl ClientsApi {
    /// Creates the client; `policy` decides how related-list failures surface.
    #[must_use]
    pub fn new(api: Arc<dyn ApiPort>, policy: SoftFailPolicy) -> Self {
        Self { api, policy }
    }

    /// Lists clients.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list(&self, filters: &ClientFilters) -> Result<Page<Client>, ApiError> {
        let endpoint = filters.query().apply("/clients");
        debug!(%endpoint, "Fetching clients");
        envelope::into_page(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// Fetches one client.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get(&self, id: &str) -> Result<Client, ApiError> {
        let endpoint = format!("/clients/{}", path_segment(id));
        envelope::into_data(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// Creates a client.
    ///
    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn create(&self, client: &NewClient) -> Result<Client, ApiError> {
        let request = ApiRequest::post("/clients", envelope::to_body(client)?);
        envelope::into_data(self.api.send(request).await?)
    }

    /// Updates a client.
    ///
    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn update(&self, id: &str, update: &ClientUpdate) -> Result<Client, ApiError> {
        let endpoint = format!("/clients/{}", path_segment(id));
        let request = ApiRequest::put(endpoint, envelope::to_body(update)?);
        envelope::into_data(self.api.send(request).await?)
    }

    /// Deletes a client.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("/clients/{}", path_segment(id));
        envelope::into_unit(self.api.send(ApiRequest::delete(endpoint)).await?)
    }

    /// Cases of a client. Follows `client_cases` on failure.
    ///
    /// # Errors
    /// Returns error only when the policy propagates failures.
    pub async fn cases(&self, id: &str) -> Result<Page<Case>, ApiError> {
        let result = self.related(format!("/clients/{}/cases", path_segment(id))).await;
        self.policy.client_cases.apply("client cases", result)
    }

    /// Appointments of a client. Follows `client_appointments` on failure.
    ///
    /// # Errors
    /// Returns error only when the policy propagates failures.
    pub async fn appointments(&self, id: &str) -> Result<Page<Appointment>, ApiError> {
        let result = self.related(format!("/clients/{}/appointments", path_segment(id))).await;
        self.policy
            .client_appointments
            .apply("client appointments", result)
    }

    /// Documents of a client. Follows `client_documents` on failure.
    ///
    /// # Errors
    /// Returns error only when the policy propagates failures.
    pub async fn documents(&self, id: &str) -> Result<Page<Document>, ApiError> {
        let result = self.related(format!("/clients/{}/documents", path_segment(id))).await;
        self.policy.client_documents.apply("client documents", result)
    }

    async fn related<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: String,
    ) -> Result<Page<T>, ApiError> {
        envelope::into_page(self.api.send(ApiRequest::get(endpoint)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::HttpMethod;
    use crate::domain::ports::mocks::MockApiPort;
    use serde_json::json;

    fn client_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "firstName": "Lucia",
            "lastName": "Mendez",
            "email": "lucia@example.test"
        })
    }

    #[tokio::test]
    async fn test_list_builds_query_and_unwraps_page() {
        let mock = Arc::new(MockApiPort::new().reply(json!({
            "success": true,
            "data": [client_json("c1")],
            "pagination": {"total": 31, "page": 2, "limit": 10, "totalPages": 4}
        })));
        let clients = ClientsApi::new(mock.clone(), SoftFailPolicy::default());

        let filters = ClientFilters {
            search: Some("mendez".to_string()),
            page: PageRequest::new(2, 10),
            ..ClientFilters::default()
        };
        let page = clients.list(&filters).await.unwrap();

        assert_eq!(
            mock.last_request().endpoint,
            "/clients?search=mendez&page=2&limit=10"
        );
        assert_eq!(page.data[0].full_name(), "Lucia Mendez");
        assert_eq!(page.total, 31);
        assert_eq!(page.total_pages, 4);
    }

    #[tokio::test]
    async fn test_create_posts_camel_case_body() {
        let mock = Arc::new(
            MockApiPort::new().reply(json!({"success": true, "data": client_json("c2")})),
        );
        let clients = ClientsApi::new(mock.clone(), SoftFailPolicy::default());

        let created = clients
            .create(&NewClient {
                first_name: "Lucia".to_string(),
                last_name: "Mendez".to_string(),
                email: "lucia@example.test".to_string(),
                phone: None,
                company: Some("Mendez SL".to_string()),
                address: None,
            })
            .await
            .unwrap();

        let request = mock.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.body,
            Some(json!({
                "firstName": "Lucia",
                "lastName": "Mendez",
                "email": "lucia@example.test",
                "company": "Mendez SL"
            }))
        );
        assert_eq!(created.id, "c2");
    }

    #[tokio::test]
    async fn test_related_lists_soft_fail_by_default() {
        let mock = Arc::new(
            MockApiPort::new()
                .fail(ApiError::network("connection refused"))
                .fail(ApiError::from_status(500, "boom", Vec::new()))
                .fail(ApiError::unauthorized("expired")),
        );
        let clients = ClientsApi::new(mock.clone(), SoftFailPolicy::default());

        assert!(clients.cases("c1").await.unwrap().is_empty());
        assert!(clients.appointments("c1").await.unwrap().is_empty());
        assert!(clients.documents("c1").await.unwrap().is_empty());

        let endpoints: Vec<String> = mock.requests().into_iter().map(|r| r.endpoint).collect();
        assert_eq!(
            endpoints,
            [
                "/clients/c1/cases",
                "/clients/c1/appointments",
                "/clients/c1/documents"
            ]
        );
    }

    #[tokio::test]
    async fn test_id_is_encoded_as_one_segment() {
        let mock = Arc::new(MockApiPort::new().reply(json!({"success": true})));
        let clients = ClientsApi::new(mock.clone(), SoftFailPolicy::default());

        clients.delete("c1/../../admin/users?all=1").await.unwrap();

        assert_eq!(
            mock.last_request().endpoint,
            "/clients/c1%2F..%2F..%2Fadmin%2Fusers%3Fall%3D1"
        );
    }

    #[tokio::test]
    async fn test_related_lists_propagate_when_strict() {
        let mock = Arc::new(MockApiPort::new().fail(ApiError::network("connection refused")));
        let clients = ClientsApi::new(mock, SoftFailPolicy::strict());

        let result = clients.documents("c1").await;

        assert!(matches!(result, Err(ApiError::Network { .. })));
    }

    #[tokio::test]
    async fn test_primary_list_always_propagates() {
        let mock = Arc::new(MockApiPort::new().fail(ApiError::network("connection refused")));
        let clients = ClientsApi::new(mock, SoftFailPolicy::default());

        let result = clients.list(&ClientFilters::default()).await;

        assert!(result.is_err());
    }
}
