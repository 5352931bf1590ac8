//! Lexdesk - client for a legal practice management backend.
//!
//! This crate provides the client-side session, API and UI-state layer of a
//! legal practice platform: token persistence, an authenticated JSON client,
//! typed resource clients, toast and confirmation stores, and route guards.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing API clients, services and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing the command-line interface.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "lexdesk";
