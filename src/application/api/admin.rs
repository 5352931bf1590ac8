//! Administration endpoints.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::envelope;
use super::query::{PageRequest, QueryString, path_segment};
use crate::domain::entities::{DashboardStats, Page, UserProfile, UserRole};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ApiPort, ApiRequest};

/// Filters for the admin user list.
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    /// Only users with this role.
    pub role: Option<UserRole>,
    /// Active or deactivated accounts.
    pub is_active: Option<bool>,
    /// Name or email fragment.
    pub search: Option<String>,
    /// Page selection.
    pub page: PageRequest,
}

impl UserFilters {
    /// Renders the filters as query parameters.
    #[must_use]
    pub fn query(&self) -> QueryString {
        let query = QueryString::new()
            .push_opt("role", self.role.map(UserRole::as_str))
            .push_opt("isActive", self.is_active)
            .push_opt("search", self.search.as_deref());
        self.page.append_to(query)
    }
}

/// User administration and platform statistics. Admin role only.
#[derive(Clone)]
pub struct AdminApi {
    api: Arc<dyn ApiPort>,
}

impl AdminApi {
    /// Creates the client over an API port.
    #[must_use]
    pub fn new(api: Arc<dyn ApiPort>) -> Self {
        Self { api }
    }

    /// Dashboard counters.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        envelope::into_data(self.api.send(ApiRequest::get("/admin/stats")).await?)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn users(&self, filters: &UserFilters) -> Result<Page<UserProfile>, ApiError> {
        let endpoint = filters.query().apply("/admin/users");
        envelope::into_page(self.api.send(ApiRequest::get(endpoint)).await?)
    }

    /// Enables or disables an account.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn set_user_active(&self, id: &str, active: bool) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::patch(
            format!("/admin/users/{}/status", path_segment(id)),
            json!({ "isActive": active }),
        );
        let user = envelope::into_data(self.api.send(request).await?)?;
        info!(user_id = %id, active, "Account status changed");
        Ok(user)
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn verify_lawyer(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("/admin/lawyers/{}/verify", path_segment(id));
        let request = ApiRequest::patch(endpoint, json!({}));
        envelope::into_unit(self.api.send(request).await?)?;
        info!(lawyer_id = %id, "Lawyer verified");
        Ok(())
    }

    /// # Errors
    /// Returns error if the request fails.
    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        envelope::into_unit(
            self.api
                .send(ApiRequest::delete(format!("/admin/users/{}", path_segment(id))))
                .await?,
        )?;
        info!(user_id = %id, "Account deleted");
        Ok(())
    }
}
