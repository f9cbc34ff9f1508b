//! Process-wide cache.

use std::sync::OnceLock;

use crate::{Cache, CacheError};

static PROCESS_CACHE: OnceLock<Cache> = OnceLock::new();

/// Install the process-wide cache.
///
/// Call once at startup, before the first [`global`]. Entries expire on
/// their own, so there is no matching teardown.
pub fn init(cache: Cache) -> Result<(), CacheError> {
    PROCESS_CACHE
        .set(cache)
        .map_err(|_| CacheError::AlreadyInitialized)
}

/// The process-wide cache.
///
/// Falls back to an in-memory cache on wall-clock time if [`init`] was never
/// called.
pub fn global() -> &'static Cache {
    PROCESS_CACHE.get_or_init(|| {
        tracing::debug!("process cache not initialized, using in-memory backend");
        Cache::in_memory()
    })
}
