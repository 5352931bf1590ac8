//! Stateful services shared across the application.

pub mod auth_store;
pub mod confirm_store;
pub mod route_guard;
pub mod toast_store;

pub use auth_store::AuthStore;
pub use confirm_store::{ConfirmStore, PendingAnswer};
pub use route_guard::{
    DASHBOARD_ROUTE, LOGIN_ROUTE, NavigationDecision, RouteGuard, RouteRequirement,
};
pub use toast_store::ToastStore;
