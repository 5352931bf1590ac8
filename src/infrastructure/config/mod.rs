//! Application configuration.

pub mod app_config;
pub mod args;
pub mod loader;

pub use app_config::{
    ApiConfig, AppConfig, DEFAULT_API_URL, DEFAULT_AVATAR, LogLevel, StorageBackend,
    StorageConfig, ToastConfig,
};
pub use args::CliArgs;
pub use loader::{ConfigError, ConfigLoader};
