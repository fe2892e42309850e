//! Sample Store
//!
//! Everything the widget keeps between runs lives in one opaque key-value
//! secret store: the admin password and the last successfully fetched
//! sample. Backends implement [`SecretStore`]; [`SampleStore`] and
//! [`CredentialVault`] give the two entries typed access.

mod cache;
mod credential;
mod secret;

pub use cache::SampleStore;
pub use credential::CredentialVault;
pub use secret::{FileSecretStore, MemorySecretStore, SecretStore};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Refusing to store an empty secret")]
    EmptySecret,
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
