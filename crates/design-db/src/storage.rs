//! The storage seam used by the content fetcher.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{DbError, QueryResult, Value};

/// Parameterized query execution against the system of record.
///
/// Implementations return zero, one or many rows. Everything else on this
/// trait is derived from [`Storage::query`].
pub trait Storage: Send + Sync {
    /// Execute a read query with positional `?` parameters.
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError>;

    /// Execute a query and deserialize every row.
    fn query_as<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>, DbError>
    where
        Self: Sized,
    {
        self.query(sql, params)?.deserialize_all()
    }

    /// Execute a query and deserialize the first row, if any.
    fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError>
    where
        Self: Sized,
    {
        match self.query(sql, params)?.first() {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Execute a query and read one text column of the first row.
    ///
    /// Returns `None` for no rows and for a null column.
    fn query_text(&self, sql: &str, params: &[Value], column: &str) -> Result<Option<String>, DbError> {
        let result = self.query(sql, params)?;
        Ok(result
            .first()
            .and_then(|row| row.text(column))
            .map(str::to_string))
    }

    /// Execute a query and collect one text column across all rows,
    /// skipping nulls.
    fn query_texts(&self, sql: &str, params: &[Value], column: &str) -> Result<Vec<String>, DbError> {
        let result = self.query(sql, params)?;
        Ok(result
            .iter()
            .filter_map(|row| row.text(column))
            .map(str::to_string)
            .collect())
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        (**self).query(sql, params)
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        (**self).query(sql, params)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        (**self).query(sql, params)
    }
}
