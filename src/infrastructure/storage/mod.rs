//! Token storage adapters.

mod file_storage;
#[cfg(feature = "keyring")]
mod keyring_storage;
mod memory_storage;

pub use file_storage::FileTokenStorage;
#[cfg(feature = "keyring")]
pub use keyring_storage::KeyringTokenStorage;
pub use memory_storage::MemoryTokenStorage;
