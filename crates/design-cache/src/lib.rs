//! TTL slot cache for the design content fetcher.
//!
//! A slot is addressed by `(group, key)`. Callers `start` a slot, `get` it,
//! and on a miss load from storage and `put` the result:
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use design_cache::{Cache, Lookup};
//!
//! let cache = Cache::in_memory();
//! let slot = cache.start("db/design/static", "customCodecss", Duration::from_secs(172_800));
//!
//! if let Lookup::Hit(css) = slot.get::<Option<String>>()? {
//!     return Ok(css);
//! }
//! let css = load_css()?;
//! slot.put(&css)?;
//! ```
//!
//! Lookups are three-state ([`Lookup::Hit`], [`Lookup::Miss`],
//! [`Lookup::Expired`]) so an empty payload that was cached is never
//! confused with a slot that was never filled.

mod backend;
mod cache;
mod clock;
mod entry;
mod error;
mod global;
mod key;
mod kv;

pub use backend::{CacheBackend, MemoryBackend};
pub use cache::{Cache, CacheSlot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, CacheStatus, Lookup};
pub use error::CacheError;
pub use global::{global, init};
pub use key::SlotKey;
pub use kv::KvBackend;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, Cache, CacheError, CacheSlot, CacheStatus, Lookup};
}
