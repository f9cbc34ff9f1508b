//! Content fetcher error types.

use design_cache::CacheError;
use design_db::DbError;
use thiserror::Error;

/// Errors surfaced by the content fetcher.
///
/// Cache misses and empty results are not errors; only storage and cache
/// backend failures reach the caller.
#[derive(Error, Debug)]
pub enum DesignError {
    /// The storage read failed or ran past its deadline.
    #[error("storage: {0}")]
    Storage(#[from] DbError),

    /// The cache backend failed.
    #[error("cache: {0}")]
    Cache(#[from] CacheError),
}

impl DesignError {
    /// Check if the failure was a storage deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Storage(DbError::Timeout { .. }))
    }
}
