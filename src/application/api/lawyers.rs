//! Lawyer directory endpoints.

use std::sync::Arc;

use chrono::NaiveDate;

use super::envelope;
use super::query::{PageRequest, QueryString, path_segment};
use crate::domain::entities::{Lawyer, LawyerUpdate, Page, TimeSlot};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiPort, ApiRequest};

/// Filters for the lawyer directory.
#[derive(Debug, Clone, Default)]
pub struct LawyerFilters {
    /// Name fragment.
    pub search: Option<String>,
    /// Practice area.
    pub specialty: Option<String>,
    /// Office city.
    pub city: Option<String>,
    /// Only lawyers verified by an admin.
    pub verified: Option<bool>,
    /// Page selection.
    pub page: PageRequest,
}

impl LawyerFilters {
    /// Renders the filters as query parameters.
    #[must_use]
    pub fn query(&self) -> QueryString {
        let query = QueryString::new()
            .push_opt("search", self.search.as_deref())
            .push_opt("specialty", self.specialty.as_deref())
            .push_opt("city", self.city.as_deref())
            .push_opt("verified", self.verified);
        self.page.append_to(query)
    }
}

/// Lawyer directory and availability.
#[derive(Clone)]
pub struct LawyersApi {
    api: Arc<dyn ApiPort>,
}

impl LawyersApi {
    /// Creates the client over an API port.
    #[must_use]
    pub fn new(api: Arc<dyn ApiPort>) -> Self {
        Self { api }
    }

    /// Searches the lawyer directory.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn list(&self, filters: &LawyerFilters) -> Result<Page<Lawyer>, ApiError> {
        let endpoint = filters.query().apply("/lawyers");
        envelope::into_page(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// Fetches one lawyer profile.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get(&self, id: &str) -> Result<Lawyer, ApiError> {
        let endpoint = format!("/lawyers/{}", path_segment(id));
        envelope::into_data(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// Updates a lawyer profile.
    ///
    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn update(&self, id: &str, update: &LawyerUpdate) -> Result<Lawyer, ApiError> {
        let endpoint = format!("/lawyers/{}", path_segment(id));
        let request = ApiRequest::put(endpoint, envelope::to_body(update)?);
        envelope::into_data(self.api.send(request).await?)
    }

    /// Free and booked slots on a given day.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn availability(&self, id: &str, date: NaiveDate) -> Result<Vec<TimeSlot>, ApiError> {
        let endpoint = QueryString::new()
            .push("date", date.format("%Y-%m-%d"))
            .apply(&format!("/lawyers/{}/availability", path_segment(id)));
        let body = self.api.send(ApiRequest::get(endpoint)).await?;
        Ok(envelope::decode::<Vec<TimeSlot>>(body)?.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockApiPort;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_with_filters() {
        let mock = Arc::new(MockApiPort::new().reply(json!({
            "success": true,
            "data": [{
                "id": 4,
                "firstName": "Marta",
                "lastName": "Gil",
                "email": "marta@firm.test",
                "specialties": ["family", "labor"],
                "isVerified": true
            }]
        })));
        let lawyers = LawyersApi::new(mock.clone());

        let filters = LawyerFilters {
            specialty: Some("family".to_string()),
            city: Some("Valencia".to_string()),
            ..LawyerFilters::default()
        };
        let page = lawyers.list(&filters).await.unwrap();

        assert_eq!(
            mock.last_request().endpoint,
            "/lawyers?specialty=family&city=Valencia"
        );
        assert_eq!(page.data[0].id, "4");
        assert_eq!(page.data[0].specialties, ["family", "labor"]);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_availability_uses_iso_date() {
        let mock = Arc::new(MockApiPort::new().reply(json!({
            "success": true,
            "data": [{"start": "09:00", "end": "10:00", "available": false}]
        })));
        let lawyers = LawyersApi::new(mock.clone());

        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let slots = lawyers.availability("4", date).await.unwrap();

        assert_eq!(
            mock.last_request().endpoint,
            "/lawyers/4/availability?date=2026-03-09"
        );
        assert_eq!(slots.len(), 1);
        assert!(!slots[0].available);
    }
}
