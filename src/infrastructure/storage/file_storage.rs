//! Token storage in a private TOML file.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::StorageError;
use crate::domain::ports::{TokenKey, TokenStoragePort};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl TokenFile {
    fn slot(&mut self, key: TokenKey) -> &mut Option<String> {
        match key {
            TokenKey::AccessToken => &mut self.access_token,
            TokenKey::RefreshToken => &mut self.refresh_token,
        }
    }

    const fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// File-backed token storage.
///
/// Writes go through a temporary file in the same directory and are renamed
/// into place, so a crash never leaves a half-written file behind.
pub struct FileTokenStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStorage {
    /// Storage backed by the file at `path`, created on first write.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Location of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<TokenFile, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TokenFile::default()),
            Err(e) => return Err(StorageError::ReadFailed(e.to_string())),
        };

        match toml::from_str(&content) {
            Ok(file) => Ok(file),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Malformed token file, ignoring it");
                Ok(TokenFile::default())
            }
        }
    }

    async fn write_file(&self, file: &TokenFile) -> Result<(), StorageError> {
        if file.is_empty() {
            return match fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::DeleteFailed(e.to_string())),
            };
        }

        let content =
            toml::to_string(file).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || save_atomically(&path, content.as_bytes()))
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }
}

fn save_atomically(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("Invalid path"))?;
    std::fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl TokenStoragePort for FileTokenStorage {
    async fn get_token(&self, key: TokenKey) -> Result<Option<AuthToken>, StorageError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_file().await?;
        Ok(file.slot(key).take().and_then(AuthToken::new))
    }

    async fn store_token(&self, key: TokenKey, token: &AuthToken) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_file().await?;
        *file.slot(key) = Some(token.as_str().to_string());
        self.write_file(&file).await?;

        debug!(path = %self.path.display(), %key, "Token written");
        Ok(())
    }

    async fn delete_token(&self, key: TokenKey) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read_file().await?;
        if file.slot(key).take().is_none() {
            return Ok(());
        }
        self.write_file(&file).await?;

        debug!(path = %self.path.display(), %key, "Token removed");
        Ok(())
    }
}
