//! Last-Known-Good Sample Cache

use crate::secret::SecretStore;
use pihole_api::Sample;
use tracing::{debug, warn};

/// Default key of the cached sample
pub const DEFAULT_CACHE_KEY: &str = "pihole_widget_cache_v6_enhanced_v1";

/// Single-slot store for the most recent live sample
///
/// Store failures never reach the caller: this is already the fallback
/// path, so a broken store reads as "no cache".
pub struct SampleStore<S> {
    store: S,
    key: String,
}

impl<S: SecretStore> SampleStore<S> {
    /// Create a cache on top of `store` under `key`
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Create a cache under the default key
    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_CACHE_KEY)
    }

    /// Overwrite the cached sample
    ///
    /// The zero-state is never persisted. Returns whether the value was
    /// written; on failure the previous value stays in place.
    pub fn save(&self, sample: &Sample) -> bool {
        if sample.is_zero_state() {
            debug!("Not caching zero-state sample");
            return false;
        }

        let encoded = match serde_json::to_string(sample) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Cache encode failed: {}", e);
                return false;
            }
        };

        match self.store.set(&self.key, &encoded) {
            Ok(()) => {
                debug!("Cached sample fetched at {:?}", sample.fetched_at);
                true
            }
            Err(e) => {
                warn!("Cache write failed: {}", e);
                false
            }
        }
    }

    /// Read the cached sample, `None` if absent or unreadable
    pub fn load(&self) -> Option<Sample> {
        match self.store.has(&self.key) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!("Cache lookup failed: {}", e);
                return None;
            }
        }

        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cache read failed: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Sample>(&raw) {
            Ok(sample) if !sample.is_zero_state() => Some(sample),
            Ok(_) => {
                warn!("Ignoring cached sample without timestamp");
                None
            }
            Err(e) => {
                warn!("Cache entry unreadable: {}", e);
                None
            }
        }
    }

    /// Drop the cached sample; clearing an empty cache is a no-op
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!("Cache clear failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::MemorySecretStore;
    use crate::StoreError;
    use chrono::{TimeZone, Utc};

    fn sample() -> Sample {
        Sample {
            fetched_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()),
            total_queries: 1000,
            queries_blocked: 234,
            percentage_blocked: 23.4,
            domains_on_list: 120_000,
            forwarded: 600,
            cached_count: 166,
            unique_domains: 310,
            clients_total: 5,
        }
    }

    /// Store whose every operation fails
    struct BrokenStore;

    impl SecretStore for BrokenStore {
        fn has(&self, _key: &str) -> Result<bool, StoreError> {
            Err(StoreError::Io("device not configured".to_string()))
        }
        fn get(&self, _key: &str) -> Result<String, StoreError> {
            Err(StoreError::Io("device not configured".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io("device not configured".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Io("device not configured".to_string()))
        }
    }

    #[test]
    fn test_save_load_clear() {
        let cache = SampleStore::with_default_key(MemorySecretStore::new());
        assert_eq!(cache.load(), None);

        assert!(cache.save(&sample()));
        assert_eq!(cache.load(), Some(sample()));

        cache.clear();
        assert_eq!(cache.load(), None);
        cache.clear();
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn test_save_overwrites() {
        let cache = SampleStore::with_default_key(MemorySecretStore::new());
        cache.save(&sample());

        let newer = Sample {
            total_queries: 1200,
            ..sample()
        };
        cache.save(&newer);
        assert_eq!(cache.load().unwrap().total_queries, 1200);
    }

    #[test]
    fn test_zero_state_not_persisted() {
        let cache = SampleStore::with_default_key(MemorySecretStore::new());
        cache.save(&sample());
        assert!(!cache.save(&Sample::zero_state()));
        assert_eq!(cache.load(), Some(sample()));
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let store = MemorySecretStore::new();
        store.set(DEFAULT_CACHE_KEY, "{not json").unwrap();
        let cache = SampleStore::with_default_key(store);
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn test_broken_store_is_swallowed() {
        let cache = SampleStore::with_default_key(BrokenStore);
        assert!(!cache.save(&sample()));
        assert_eq!(cache.load(), None);
        cache.clear();
    }
}
