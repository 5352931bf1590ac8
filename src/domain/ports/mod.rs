//! Port definitions implemented by infrastructure adapters.

mod api_port;
mod token_storage_port;

pub use api_port::{ApiPort, ApiRequest, HttpMethod};
pub use token_storage_port::{TokenKey, TokenStoragePort};
