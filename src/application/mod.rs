//! Application layer with API clients, services and DTOs.

/// Typed clients for the REST resources.
pub mod api;
/// Data transfer objects.
pub mod dto;
/// Session, toast, confirmation and routing services.
pub mod services;

pub use dto::{AuthOutcome, LoginCredentials, RegisterRequest};
pub use services::{AuthStore, ConfirmStore, RouteGuard, ToastStore};
