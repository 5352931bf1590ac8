//! Token storage port definition.

use async_trait::async_trait;

use crate::domain::entities::AuthToken;
use crate::domain::errors::StorageError;

/// Durable storage slots for session tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    /// Bearer token sent with API calls.
    AccessToken,
    /// Token exchanged for a new access token.
    RefreshToken,
}

impl TokenKey {
    /// Every slot, in persistence order.
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

    /// Returns the storage key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
        }
    }
}

impl std::fmt::Display for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for token persistence operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStoragePort: Send + Sync {
    /// Retrieves a stored token.
    async fn get_token(&self, key: TokenKey) -> Result<Option<AuthToken>, StorageError>;

    /// Stores a token, replacing any previous value.
    async fn store_token(&self, key: TokenKey, token: &AuthToken) -> Result<(), StorageError>;

    /// Deletes a stored token. Deleting a missing token succeeds.
    async fn delete_token(&self, key: TokenKey) -> Result<(), StorageError>;

    /// Checks if a token exists.
    async fn has_token(&self, key: TokenKey) -> Result<bool, StorageError> {
        Ok(self.get_token(key).await?.is_some())
    }
}
