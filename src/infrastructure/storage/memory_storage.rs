//! In-memory token storage.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::entities::AuthToken;
use crate::domain::errors::StorageError;
use crate::domain::ports::{TokenKey, TokenStoragePort};

/// Token storage that lives only as long as the process.
#[derive(Default)]
pub struct MemoryTokenStorage {
    tokens: Mutex<HashMap<TokenKey, AuthToken>>,
}

impl MemoryTokenStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStoragePort for MemoryTokenStorage {
    async fn get_token(&self, key: TokenKey) -> Result<Option<AuthToken>, StorageError> {
        Ok(self.tokens.lock().get(&key).cloned())
    }

    async fn store_token(&self, key: TokenKey, token: &AuthToken) -> Result<(), StorageError> {
        self.tokens.lock().insert(key, token.clone());
        Ok(())
    }

    async fn delete_token(&self, key: TokenKey) -> Result<(), StorageError> {
        self.tokens.lock().remove(&key);
        Ok(())
    }
}
