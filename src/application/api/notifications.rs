//! Server-side notification endpoints.

use std::sync::Arc;

use serde_json::json;

use super::envelope;
use super::query::{PageRequest, QueryString, path_segment};
use crate::domain::entities::{Notification, Page, UnreadCount};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiPort, ApiRequest};

/// Filters for the notification list.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilters {
    /// Skip notifications already read.
    pub unread_only: bool,
    /// Page selection.
    pub page: PageRequest,
}

impl NotificationFilters {
    /// Renders the filters as query parameters.
    #[must_use]
    pub fn query(&self) -> QueryString {
        let query = QueryString::new().push_opt("unread", self.unread_only.then_some(true));
        self.page.append_to(query)
    }
}

/// In-app notifications of the signed-in user.
#[derive(Clone)]
pub struct NotificationsApi {
    api: Arc<dyn ApiPort>,
}

impl NotificationsApi {
    /// Creates the client over an API port.
    #[must_use]
    pub fn new(api: Arc<dyn ApiPort>) -> Self {
        Self { api }
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn list(&self, filters: &NotificationFilters) -> Result<Page<Notification>, ApiError> {
        let endpoint = filters.query().apply("/notifications");
        envelope::into_page(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn mark_read(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("/notifications/{}/read", path_segment(id));
        let request = ApiRequest::patch(endpoint, json!({}));
        envelope::into_unit(self.api.send(request).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        let request = ApiRequest::patch("/notifications/read-all", json!({}));
        envelope::into_unit(self.api.send(request).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        envelope::into_unit(
            self.api
                .send(ApiRequest::delete(format!("/notifications/{}", path_segment(id))))
                .await?,
        )
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn unread_count(&self) -> Result<u64, ApiError> {
        let body = self
            .api
            .send(ApiRequest::get("/notifications/unread-count"))
            .await?;
        envelope::into_data::<UnreadCount>(body).map(|c| c.count)
    }
}
