//! Query deadlines.

use std::time::{Duration, Instant};

use crate::{DbError, QueryResult, Storage, Value};

/// Deadline configuration for storage calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTimeout {
    /// Total time a single query may take.
    pub total: Duration,
    /// Queries slower than this are logged but still succeed.
    pub slow: Duration,
}

impl QueryTimeout {
    /// Create a deadline from a single total timeout.
    ///
    /// The slow-query threshold is half the total.
    pub fn from_total(total: Duration) -> Self {
        Self {
            total,
            slow: total / 2,
        }
    }

    /// Create from a millisecond count, as stored in configuration.
    pub fn from_millis(ms: u64) -> Self {
        Self::from_total(Duration::from_millis(ms))
    }

    /// Classify an elapsed duration against this deadline.
    pub fn check(&self, elapsed: Duration) -> Result<(), DbError> {
        if elapsed > self.total {
            return Err(DbError::Timeout {
                limit: self.total,
                elapsed,
            });
        }
        Ok(())
    }
}

impl Default for QueryTimeout {
    fn default() -> Self {
        Self::from_total(Duration::from_millis(2000))
    }
}

/// Storage wrapper that enforces a [`QueryTimeout`] on every call.
///
/// Calls are synchronous, so the deadline is checked once the backend
/// returns: a result that arrives late is discarded and reported as
/// [`DbError::Timeout`] so the caller never caches it.
pub struct TimedStorage<S> {
    inner: S,
    timeout: QueryTimeout,
}

impl<S: Storage> TimedStorage<S> {
    /// Wrap a storage backend.
    pub fn new(inner: S, timeout: QueryTimeout) -> Self {
        Self { inner, timeout }
    }

    /// The configured deadline.
    pub fn timeout(&self) -> QueryTimeout {
        self.timeout
    }

    /// Access the wrapped backend.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Storage> Storage for TimedStorage<S> {
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        let started = Instant::now();
        let result = self.inner.query(sql, params);
        let elapsed = started.elapsed();

        if let Err(e) = self.timeout.check(elapsed) {
            tracing::warn!(sql, ?elapsed, limit = ?self.timeout.total, "query exceeded deadline");
            return Err(e);
        }
        if elapsed > self.timeout.slow {
            tracing::warn!(sql, ?elapsed, "slow query");
        }

        result
    }
}
