//! The slot cache: `start`, then `get` / `put`.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::{CacheBackend, CacheEntry, CacheError, CacheStatus, Clock, Lookup, MemoryBackend, SlotKey, SystemClock};

/// Time-bounded cache shared across requests.
///
/// Cheap to clone; clones share the backend and clock.
///
/// # Example
///
/// ```rust,ignore
/// let cache = Cache::in_memory();
/// let slot = cache.start("db/design/static", "analyticsApitrue", Duration::from_secs(172_800));
///
/// let code: Option<String> = match slot.get()? {
///     Lookup::Hit(code) => code,
///     Lookup::Miss | Lookup::Expired => {
///         let code = load_from_storage()?;
///         slot.put(&code)?;
///         code
///     }
/// };
/// ```
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
}

impl Cache {
    /// Create a cache over a backend, using wall-clock time.
    pub fn new(backend: impl CacheBackend + 'static) -> Self {
        Self::with_clock(backend, SystemClock)
    }

    /// Create a cache with an explicit clock.
    pub fn with_clock(backend: impl CacheBackend + 'static, clock: impl Clock + 'static) -> Self {
        Self::from_parts(Arc::new(backend), Arc::new(clock))
    }

    /// Create a cache from shared parts.
    pub fn from_parts(backend: Arc<dyn CacheBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    /// A process-local cache on wall-clock time.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Designate the slot for a following `get` / `put` pair.
    ///
    /// Expiry is tracked in whole seconds; a fractional TTL is rounded up.
    ///
    /// A malformed group or key does not fail here: the returned slot is inert
    /// (`get` misses, `put` does nothing) and a warning is logged.
    pub fn start(&self, group: &str, key: &str, ttl: Duration) -> CacheSlot<'_> {
        let slot = SlotKey::new(group, key);
        if slot.is_none() {
            tracing::warn!(group, key, "malformed cache slot, caching bypassed");
        }
        CacheSlot {
            cache: self,
            slot,
            ttl_secs: ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0),
        }
    }

    /// Drop every expired entry from the backend.
    pub fn purge_expired(&self) -> Result<u64, CacheError> {
        let purged = self.backend.purge_expired(self.clock.now_secs())?;
        tracing::debug!(purged, "purged expired cache entries");
        Ok(purged)
    }

    /// Drop every entry from the backend.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.backend.clear()
    }

    /// The clock used for expiry.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

/// A designated slot, produced by [`Cache::start`].
pub struct CacheSlot<'a> {
    cache: &'a Cache,
    slot: Option<SlotKey>,
    ttl_secs: u64,
}

impl CacheSlot<'_> {
    /// The slot address, or `None` if the slot is inert.
    pub fn key(&self) -> Option<&SlotKey> {
        self.slot.as_ref()
    }

    /// The TTL applied by [`CacheSlot::put`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Read the slot.
    ///
    /// An entry the backend cannot decode, or a payload that no longer
    /// deserializes as `T`, is reported as a miss so the caller repopulates
    /// it.
    pub fn get<T: DeserializeOwned>(&self) -> Result<Lookup<T>, CacheError> {
        let Some(slot) = &self.slot else {
            return Ok(Lookup::Miss);
        };

        let loaded = match self.cache.backend.load(slot) {
            Ok(loaded) => loaded,
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(%slot, error = %e, "undecodable cache entry");
                None
            }
            Err(e) => return Err(e),
        };

        let lookup = match loaded {
            None => Lookup::Miss,
            Some(entry) if entry.is_expired(self.cache.clock.now_secs()) => Lookup::Expired,
            Some(entry) => match serde_json::from_value(entry.payload) {
                Ok(payload) => Lookup::Hit(payload),
                Err(e) => {
                    tracing::warn!(%slot, error = %e, "cached payload has unexpected shape");
                    Lookup::Miss
                }
            },
        };

        tracing::debug!(%slot, status = %lookup.status(), "cache lookup");
        Ok(lookup)
    }

    /// Store a payload with expiry `now + ttl`, replacing what was there.
    pub fn put<T: Serialize + ?Sized>(&self, payload: &T) -> Result<(), CacheError> {
        let Some(slot) = &self.slot else {
            return Ok(());
        };

        let entry = CacheEntry::new(
            serde_json::to_value(payload)?,
            self.cache.clock.now_secs(),
            self.ttl_secs,
        );
        self.cache.backend.store(slot, entry)?;
        tracing::debug!(%slot, ttl_secs = self.ttl_secs, "cache put");
        Ok(())
    }

    /// Cache-aside in one call: return the cached payload, or run `load`,
    /// store its result and return it.
    ///
    /// Errors from `load` propagate and nothing is stored.
    pub fn get_or_load<T, E, F>(&self, load: F) -> Result<(T, CacheStatus), E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Result<T, E>,
    {
        if self.slot.is_none() {
            return Ok((load()?, CacheStatus::Bypass));
        }

        let status = match self.get::<T>()? {
            Lookup::Hit(payload) => return Ok((payload, CacheStatus::Hit)),
            other => other.status(),
        };

        let payload = load()?;
        self.put(&payload)?;
        Ok((payload, status))
    }
}
