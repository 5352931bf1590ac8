//! Navigation checks against the current session.

use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::{SessionState, UserRole};

/// Where unauthenticated users are sent.
pub const LOGIN_ROUTE: &str = "/login";
/// Where signed-in users are sent from guest pages or on a role mismatch.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Access rule attached to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Anyone.
    Public,
    /// Sign-in and registration pages.
    GuestOnly,
    /// Any signed-in user.
    Authenticated,
    /// Any of the listed roles.
    Role(Vec<UserRole>),
}

impl RouteRequirement {
    /// Rule for a single role.
    #[must_use]
    pub fn role(role: UserRole) -> Self {
        Self::Role(vec![role])
    }

    /// Whether checking this rule needs the user's profile.
    #[must_use]
    pub const fn needs_profile(&self) -> bool {
        matches!(self, Self::Role(_))
    }
}

/// Outcome of a route check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Proceed to the route.
    Allow,
    /// Go to this path instead.
    Redirect(&'static str),
}

impl NavigationDecision {
    /// True for [`NavigationDecision::Allow`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decides navigation from the shared session.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: Arc<SessionState>,
}

impl RouteGuard {
    /// Creates a guard reading the shared session.
    #[must_use]
    pub const fn new(session: Arc<SessionState>) -> Self {
        Self { session }
    }

    /// Decides whether the current session may enter a route.
    ///
    /// Role rules redirect to the dashboard when the profile is unknown, so
    /// callers load it first when `needs_profile` is true.
    #[must_use]
    pub fn check(&self, requirement: &RouteRequirement) -> NavigationDecision {
        let session = self.session.snapshot();
        let authenticated = session.is_authenticated();

        let decision = match requirement {
            RouteRequirement::Public => NavigationDecision::Allow,
            RouteRequirement::GuestOnly if authenticated => {
                NavigationDecision::Redirect(DASHBOARD_ROUTE)
            }
            RouteRequirement::GuestOnly => NavigationDecision::Allow,
            RouteRequirement::Authenticated | RouteRequirement::Role(_) if !authenticated => {
                NavigationDecision::Redirect(LOGIN_ROUTE)
            }
            RouteRequirement::Authenticated => NavigationDecision::Allow,
            RouteRequirement::Role(roles) => match session.role() {
                Some(role) if roles.contains(&role) => NavigationDecision::Allow,
                _ => NavigationDecision::Redirect(DASHBOARD_ROUTE),
            },
        };

        debug!(?requirement, ?decision, "Route checked");
        decision
    }
}
