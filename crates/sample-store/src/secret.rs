//! Secret Store Backends

use crate::StoreError;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Opaque key-value store for secrets and small persisted values
pub trait SecretStore: Send + Sync {
    /// Whether a value exists for `key`
    fn has(&self, key: &str) -> Result<bool, StoreError>;
    /// Read the value for `key`
    fn get(&self, key: &str) -> Result<String, StoreError>;
    /// Replace the value for `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Delete the value for `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: SecretStore + ?Sized> SecretStore for Arc<T> {
    fn has(&self, key: &str) -> Result<bool, StoreError> {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Result<String, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl SecretStore for MemorySecretStore {
    fn has(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries()?.contains_key(key))
    }

    fn get(&self, key: &str) -> Result<String, StoreError> {
        self.entries()?
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// One file per key inside a state directory
///
/// Writes go to a temporary file in the same directory that is then renamed
/// over the target, so readers see either the old or the new value. Files
/// are created owner-readable only.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    dir: PathBuf,
}

impl FileSecretStore {
    /// Use `dir` as the state directory (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        info!("Using state directory {}", dir.display());
        Self { dir }
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl SecretStore for FileSecretStore {
    fn has(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.path(key)?.is_file())
    }

    fn get(&self, key: &str) -> Result<String, StoreError> {
        let path = self.path(key)?;
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(key.to_string()),
            _ => e.into(),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;

        let mut staged = tempfile::NamedTempFile::new_in(&self.dir)?;
        staged.write_all(value.as_bytes())?;
        staged.as_file().sync_all()?;
        staged
            .persist(&path)
            .map_err(|e| StoreError::Io(e.error.to_string()))?;

        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_operations() {
        let store = MemorySecretStore::new();
        assert!(!store.has("k").unwrap());
        assert_eq!(store.get("k"), Err(StoreError::NotFound("k".to_string())));

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert!(store.has("k").unwrap());
        assert_eq!(store.get("k").unwrap(), "v2");

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(!store.has("k").unwrap());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let store = FileSecretStore::new(std::env::temp_dir());
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert_eq!(store.has(key), Err(StoreError::InvalidKey(key.to_string())));
        }
    }

    #[test]
    fn test_shared_store_through_arc() {
        let shared = Arc::new(MemorySecretStore::new());
        let handle = Arc::clone(&shared);
        handle.set("k", "v").unwrap();
        assert_eq!(shared.get("k").unwrap(), "v");
    }
}
