//! Keyring-based token storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::StorageError;
use crate::domain::ports::{TokenKey, TokenStoragePort};

const KEYRING_SERVICE: &str = "lexdesk";

/// System keyring token storage adapter. One entry per token slot.
pub struct KeyringTokenStorage {
    service: String,
}

impl KeyringTokenStorage {
    /// Storage under the default `lexdesk` service name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    /// Creates storage under a custom service name.
    #[must_use]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: TokenKey) -> Result<Entry, StorageError> {
        Entry::new(&self.service, key.as_str())
            .map_err(|e| StorageError::AccessFailed(format!("failed to access keyring: {e}")))
    }
}

impl Default for KeyringTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStoragePort for KeyringTokenStorage {
    async fn get_token(&self, key: TokenKey) -> Result<Option<AuthToken>, StorageError> {
        debug!(service = %self.service, %key, "Retrieving token from keyring");

        match self.entry(key)?.get_password() {
            Ok(password) => Ok(AuthToken::new(password)),
            Err(keyring::Error::NoEntry) => {
                debug!(%key, "No token stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(%key, error = %e, "Failed to retrieve token from keyring");
                Err(StorageError::ReadFailed(e.to_string()))
            }
        }
    }

    async fn store_token(&self, key: TokenKey, token: &AuthToken) -> Result<(), StorageError> {
        debug!(service = %self.service, %key, "Storing token in keyring");

        self.entry(key)?.set_password(token.as_str()).map_err(|e| {
            warn!(%key, error = %e, "Failed to store token in keyring");
            StorageError::WriteFailed(e.to_string())
        })
    }

    async fn delete_token(&self, key: TokenKey) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(%key, "Token removed from keyring");
                Ok(())
            }
            Err(e) => {
                warn!(%key, error = %e, "Failed to delete token from keyring");
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }
}
