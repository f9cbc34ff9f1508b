//! Backend on Spin's Key-Value Store.

use crate::{CacheBackend, CacheEntry, CacheError, SlotKey};

/// Namespace prefixed to every stored key so housekeeping never touches keys
/// written by other components sharing the store.
const NAMESPACE: &str = "design-cache|";

/// Cache backend persisting entries as JSON in a Spin Key-Value store.
///
/// Only available inside the Spin runtime; opening it elsewhere fails.
pub struct KvBackend {
    #[cfg(target_arch = "wasm32")]
    store: spin_sdk::key_value::Store,
    #[cfg(not(target_arch = "wasm32"))]
    _phantom: std::marker::PhantomData<()>,
}

fn namespaced(slot: &SlotKey) -> String {
    format!("{}{}", NAMESPACE, slot.as_storage_key())
}

impl KvBackend {
    /// Open the default Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self { store })
    }

    /// Open a named Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open(name)
            .map_err(|e| CacheError::OpenError(e.to_string()))?;
        Ok(Self { store })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> Result<Self, CacheError> {
        Self::open("default")
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(name: &str) -> Result<Self, CacheError> {
        Err(CacheError::OpenError(format!(
            "key-value store '{}' is only available inside the Spin runtime",
            name
        )))
    }

    #[cfg(target_arch = "wasm32")]
    fn owned_keys(&self) -> Result<Vec<String>, CacheError> {
        let keys = self
            .store
            .get_keys()
            .map_err(|e| CacheError::StoreError(e.to_string()))?;
        Ok(keys.into_iter().filter(|k| k.starts_with(NAMESPACE)).collect())
    }
}

#[cfg(target_arch = "wasm32")]
impl CacheBackend for KvBackend {
    fn load(&self, slot: &SlotKey) -> Result<Option<CacheEntry>, CacheError> {
        match self.store.get(&namespaced(slot)) {
            Ok(Some(bytes)) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(CacheError::StoreError(e.to_string())),
        }
    }

    fn store(&self, slot: &SlotKey, entry: CacheEntry) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(&entry)?;
        self.store
            .set(&namespaced(slot), &bytes)
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    fn remove(&self, slot: &SlotKey) -> Result<(), CacheError> {
        self.store
            .delete(&namespaced(slot))
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }

    fn purge_expired(&self, now: u64) -> Result<u64, CacheError> {
        let mut purged = 0;
        for key in self.owned_keys()? {
            let expired = match self.store.get(&key) {
                Ok(Some(bytes)) => serde_json::from_slice::<CacheEntry>(&bytes)
                    .map(|entry| entry.is_expired(now))
                    // Unreadable entries would never be served; drop them too.
                    .unwrap_or(true),
                Ok(None) => false,
                Err(e) => return Err(CacheError::StoreError(e.to_string())),
            };
            if expired {
                self.store
                    .delete(&key)
                    .map_err(|e| CacheError::StoreError(e.to_string()))?;
                purged += 1;
            }
        }
        Ok(purged)
    }

    fn clear(&self) -> Result<(), CacheError> {
        for key in self.owned_keys()? {
            self.store
                .delete(&key)
                .map_err(|e| CacheError::StoreError(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl CacheBackend for KvBackend {
    fn load(&self, slot: &SlotKey) -> Result<Option<CacheEntry>, CacheError> {
        Err(unavailable(slot))
    }

    fn store(&self, slot: &SlotKey, _entry: CacheEntry) -> Result<(), CacheError> {
        Err(unavailable(slot))
    }

    fn remove(&self, slot: &SlotKey) -> Result<(), CacheError> {
        Err(unavailable(slot))
    }

    fn purge_expired(&self, _now: u64) -> Result<u64, CacheError> {
        Err(CacheError::StoreError("no key-value host".to_string()))
    }

    fn clear(&self) -> Result<(), CacheError> {
        Err(CacheError::StoreError("no key-value host".to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn unavailable(slot: &SlotKey) -> CacheError {
    CacheError::StoreError(format!("no key-value host for {}", namespaced(slot)))
}
