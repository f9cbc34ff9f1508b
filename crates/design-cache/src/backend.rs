//! Cache backends.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{CacheEntry, CacheError, SlotKey};

/// Storage for cache entries.
///
/// Backends store and return entries verbatim; expiry is judged by the
/// caller against its own clock. Concurrent writers to one slot race and the
/// last write wins.
pub trait CacheBackend: Send + Sync {
    /// Read the entry for a slot.
    fn load(&self, slot: &SlotKey) -> Result<Option<CacheEntry>, CacheError>;

    /// Write the entry for a slot, replacing any previous one.
    fn store(&self, slot: &SlotKey, entry: CacheEntry) -> Result<(), CacheError>;

    /// Drop the entry for a slot.
    fn remove(&self, slot: &SlotKey) -> Result<(), CacheError>;

    /// Drop every entry expired at `now`. Returns how many were dropped.
    fn purge_expired(&self, now: u64) -> Result<u64, CacheError>;

    /// Drop everything.
    fn clear(&self) -> Result<(), CacheError>;
}

/// Process-local backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<SlotKey, CacheEntry>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl CacheBackend for MemoryBackend {
    fn load(&self, slot: &SlotKey) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entries.read().get(slot).cloned())
    }

    fn store(&self, slot: &SlotKey, entry: CacheEntry) -> Result<(), CacheError> {
        self.entries.write().insert(slot.clone(), entry);
        Ok(())
    }

    fn remove(&self, slot: &SlotKey) -> Result<(), CacheError> {
        self.entries.write().remove(slot);
        Ok(())
    }

    fn purge_expired(&self, now: u64) -> Result<u64, CacheError> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok((before - entries.len()) as u64)
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().clear();
        Ok(())
    }
}
