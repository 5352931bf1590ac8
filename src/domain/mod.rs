//! Domain layer with core entities, errors, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{AuthToken, Page, Session, SessionState, UserProfile, UserRole};
pub use errors::{ApiError, StorageError};
pub use ports::{ApiPort, ApiRequest, TokenKey, TokenStoragePort};
