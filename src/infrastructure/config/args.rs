//! Global command-line options.

use super::app_config::{LogLevel, StorageBackend};
use clap::Args;
use std::path::PathBuf;

/// Options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Backend base URL.
    #[arg(long, value_name = "URL", env = "LEXDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Where session tokens are kept.
    #[arg(long, value_enum, global = true)]
    pub storage: Option<StorageBackend>,

    /// Toast lifetime in milliseconds.
    #[arg(long, value_name = "MS", allow_negative_numbers = true, global = true)]
    pub toast_duration_ms: Option<i64>,

    /// Fail instead of showing empty related lists.
    #[arg(long, global = true)]
    pub strict: bool,
}
