//! Storage error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when querying storage.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open the database.
    #[error("Failed to open database: {0}")]
    OpenError(String),

    /// Failed to execute a query.
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// Failed to deserialize a row.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),

    /// Type conversion error.
    #[error("Type conversion error: {0}")]
    TypeError(String),

    /// The query ran past its deadline.
    #[error("Query exceeded deadline of {limit:?} (took {elapsed:?})")]
    Timeout { limit: Duration, elapsed: Duration },
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}
