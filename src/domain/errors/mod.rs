//! Domain error types.

mod api_error;
mod storage_error;

pub use api_error::{ApiError, FieldError};
pub use storage_error::StorageError;
