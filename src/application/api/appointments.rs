//! Appointment scheduling endpoints.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use super::envelope;
use super::query::{PageRequest, QueryString, path_segment};
use crate::domain::entities::{Appointment, AppointmentStatus, NewAppointment, Page};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiPort, ApiRequest};

/// Filters for the appointment list.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilters {
    /// Only appointments in this state.
    pub status: Option<AppointmentStatus>,
    /// First day, inclusive.
    pub from: Option<NaiveDate>,
    /// Last day, inclusive.
    pub to: Option<NaiveDate>,
    /// Appointments with this lawyer.
    pub lawyer_id: Option<String>,
    /// Appointments with this client.
    pub client_id: Option<String>,
    /// Page selection.
    pub page: PageRequest,
}

impl AppointmentFilters {
    /// Renders the filters as query parameters.
    #[must_use]
    pub fn query(&self) -> QueryString {
        let query = QueryString::new()
            .push_opt("status", self.status.map(AppointmentStatus::as_str))
            .push_opt("from", self.from.map(|d| d.format("%Y-%m-%d")))
            .push_opt("to", self.to.map(|d| d.format("%Y-%m-%d")))
            .push_opt("lawyerId", self.lawyer_id.as_deref())
            .push_opt("clientId", self.client_id.as_deref());
        self.page.append_to(query)
    }
}

/// Appointment scheduling.
#[derive(Clone)]
pub struct AppointmentsApi {
    api: Arc<dyn ApiPort>,
}

impl AppointmentsApi {
    /// Creates the client over an API port.
    #[must_use]
    pub fn new(api: Arc<dyn ApiPort>) -> Self {
        Self { api }
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn list(&self, filters: &AppointmentFilters) -> Result<Page<Appointment>, ApiError> {
        let endpoint = filters.query().apply("/appointments");
        envelope::into_page(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn get(&self, id: &str) -> Result<Appointment, ApiError> {
        envelope::into_data(
            self.api
                .send(ApiRequest::get(format!("/appointments/{}", path_segment(id))))
                .await?,
        )
    }

    /// Books an appointment.
    ///
    /// # Errors
    /// Returns error if the request fails or the slot is rejected.
    pub async fn create(&self, appointment: &NewAppointment) -> Result<Appointment, ApiError> {
        let request = ApiRequest::post("/appointments", envelope::to_body(appointment)?);
        envelope::into_data(self.api.send(request).await?)
    }

    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, ApiError> {
        let request = ApiRequest::patch(
            format!("/appointments/{}/status", path_segment(id)),
            json!({ "status": status }),
        );
        envelope::into_data(self.api.send(request).await?)
    }

    /// # Errors
    /// Returns error if the request fails or is rejected.
    pub async fn cancel(&self, id: &str, reason: Option<&str>) -> Result<Appointment, ApiError> {
        let body = match reason {
            Some(reason) => json!({ "reason": reason }),
            None => json!({}),
        };
        let request = ApiRequest::patch(format!("/appointments/{}/cancel", path_segment(id)), body);
        envelope::into_data(self.api.send(request).await?)
    }
}
