//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// REST backend client.
pub mod http;
/// Token storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, ConfigLoader, LogLevel, StorageBackend};
pub use http::HttpApiClient;
#[cfg(feature = "keyring")]
pub use storage::KeyringTokenStorage;
pub use storage::{FileTokenStorage, MemoryTokenStorage};
