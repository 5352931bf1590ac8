//! Domain entity definitions.

mod appointment;
mod client;
mod confirm;
mod document;
mod lawyer;
mod legal_case;
mod message;
mod notification;
mod page;
mod session;
mod stats;
mod toast;
mod token;
mod user;

pub use appointment::{Appointment, AppointmentStatus, NewAppointment};
pub use client::{Client, ClientUpdate, NewClient};
pub use confirm::{ConfirmOptions, ConfirmRequest};
pub use document::{Document, DocumentUpdate, DownloadLink};
pub use lawyer::{Lawyer, LawyerUpdate, TimeSlot};
pub use legal_case::{Case, CaseStatus, CaseUpdate, NewCase};
pub use message::{Conversation, Message, NewMessage, UnreadCount};
pub use notification::Notification;
pub use page::{Page, Pagination};
pub use session::{Session, SessionState};
pub use stats::DashboardStats;
pub use toast::{DEFAULT_TOAST_DURATION_MS, Toast, ToastKind, ToastRequest};
pub use token::AuthToken;
pub use user::{UserProfile, UserRole};
