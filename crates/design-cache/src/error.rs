//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the backing store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize a payload.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// A backend operation failed.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// The process-wide cache was initialized twice.
    #[error("Process-wide cache is already initialized")]
    AlreadyInitialized,
}
