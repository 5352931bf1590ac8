//! Durable token storage errors.

use thiserror::Error;

/// Token storage error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StorageError {
    #[error("failed to access token storage: {0}")]
    AccessFailed(String),

    #[error("failed to read token: {0}")]
    ReadFailed(String),

    #[error("failed to write token: {0}")]
    WriteFailed(String),

    #[error("failed to delete token: {0}")]
    DeleteFailed(String),
}
