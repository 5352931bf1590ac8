//! Resource API clients built on [`ApiPort`](crate::domain::ports::ApiPort).

mod admin;
mod appointments;
mod cases;
mod clients;
mod documents;
pub mod envelope;
mod lawyers;
mod messages;
mod notifications;
mod policy;
mod query;

pub use admin::{AdminApi, UserFilters};
pub use appointments::{AppointmentFilters, AppointmentsApi};
pub use cases::{CaseFilters, CasesApi};
pub use clients::{ClientFilters, ClientsApi};
pub use documents::{DocumentFilters, DocumentsApi};
pub use lawyers::{LawyerFilters, LawyersApi};
pub use messages::MessagesApi;
pub use notifications::{NotificationFilters, NotificationsApi};
pub use policy::{FailurePolicy, SoftFailPolicy};
pub use query::{PageRequest, QueryString};
