//! HTTP adapter for the REST backend.

mod client;
mod dto;

pub use client::HttpApiClient;
