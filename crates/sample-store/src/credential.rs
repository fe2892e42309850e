//! Admin Password Access

use crate::secret::SecretStore;
use crate::StoreError;
use tracing::{info, warn};

/// Default key of the admin password
pub const DEFAULT_PASSWORD_KEY: &str = "pihole_admin_password_v1";

/// Typed access to the stored admin password
///
/// The password is only ever read for one login per refresh; it is never
/// logged or copied into other entries.
pub struct CredentialVault<S> {
    store: S,
    key: String,
}

impl<S: SecretStore> CredentialVault<S> {
    /// Create a vault on top of `store` under `key`
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Create a vault under the default key
    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_PASSWORD_KEY)
    }

    /// Stored password; store failures read as absent
    pub fn credential(&self) -> Option<String> {
        match self.store.has(&self.key) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!("Password lookup failed: {}", e);
                return None;
            }
        }

        match self.store.get(&self.key) {
            Ok(secret) if !secret.is_empty() => Some(secret),
            Ok(_) => None,
            Err(e) => {
                warn!("Password read failed: {}", e);
                None
            }
        }
    }

    /// Whether a password is stored
    pub fn is_configured(&self) -> bool {
        self.credential().is_some()
    }

    /// Replace the stored password
    pub fn store_credential(&self, secret: &str) -> Result<(), StoreError> {
        if secret.trim().is_empty() {
            return Err(StoreError::EmptySecret);
        }
        self.store.set(&self.key, secret)?;
        info!("Admin password updated");
        Ok(())
    }

    /// Forget the stored password
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key)?;
        info!("Admin password removed");
        Ok(())
    }
}
