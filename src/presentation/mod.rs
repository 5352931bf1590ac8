//! Presentation layer: command line, terminal output and prompts.

/// Wiring and command dispatch.
pub mod app;
/// Argument parsing.
pub mod cli;
/// Terminal output.
pub mod console;
/// Interactive confirmations.
pub mod prompt;

pub use app::App;
pub use cli::{Cli, Command};
