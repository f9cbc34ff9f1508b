//! Cached entries and lookup results.

use serde::{Deserialize, Serialize};

/// A payload stored under a slot, with its expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The payload as JSON. `null` is the cached "empty" sentinel.
    pub payload: serde_json::Value,
    /// When the entry was created (Unix seconds).
    pub created_at: u64,
    /// Time-to-live in seconds.
    pub ttl_secs: u64,
}

impl CacheEntry {
    /// Create a new entry.
    pub fn new(payload: serde_json::Value, created_at: u64, ttl_secs: u64) -> Self {
        Self {
            payload,
            created_at,
            ttl_secs,
        }
    }

    /// Unix second at which the entry stops being visible.
    pub fn expires_at(&self) -> u64 {
        self.created_at.saturating_add(self.ttl_secs)
    }

    /// Check if the entry has expired at `now`.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at()
    }

    /// Remaining TTL in seconds at `now`.
    pub fn remaining_ttl(&self, now: u64) -> u64 {
        self.expires_at().saturating_sub(now)
    }

    /// Age in seconds at `now`.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }
}

/// Outcome of reading a slot.
///
/// `Hit` carries whatever was stored, including an empty payload, so "cached
/// as empty" and "not cached" never look alike.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// A live entry.
    Hit(T),
    /// Nothing stored for the slot.
    Miss,
    /// An entry exists but its TTL has elapsed.
    Expired,
}

impl<T> Lookup<T> {
    /// The payload of a hit.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Hit(v) => Some(v),
            Self::Miss | Self::Expired => None,
        }
    }

    /// Check if this is a hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// The status tag of this lookup.
    pub fn status(&self) -> CacheStatus {
        match self {
            Self::Hit(_) => CacheStatus::Hit,
            Self::Miss => CacheStatus::Miss,
            Self::Expired => CacheStatus::Expired,
        }
    }
}

/// Status of a cache lookup, for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Fresh cache hit.
    Hit,
    /// Cache miss.
    Miss,
    /// Entry found past its TTL.
    Expired,
    /// Slot was malformed; caching skipped.
    Bypass,
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Bypass => write!(f, "BYPASS"),
        }
    }
}
