//! SQLite-backed storage.

use crate::{DbError, QueryResult, Storage, Value};
#[cfg(target_arch = "wasm32")]
use crate::Row;

/// SQLite database connection provided by the Spin runtime.
///
/// Outside of `wasm32` there is no host database: opening fails and callers
/// are expected to supply their own [`Storage`] implementation.
pub struct Db {
    #[cfg(target_arch = "wasm32")]
    conn: spin_sdk::sqlite::Connection,
    #[cfg(not(target_arch = "wasm32"))]
    _phantom: std::marker::PhantomData<()>,
}

impl Db {
    /// Open the default SQLite database.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let db = Db::open_default()?;
    /// ```
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Result<Self, DbError> {
        let conn = spin_sdk::sqlite::Connection::open_default()
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open a named SQLite database.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> Result<Self, DbError> {
        let conn = spin_sdk::sqlite::Connection::open(name)
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { conn })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> Result<Self, DbError> {
        Self::open("default")
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(name: &str) -> Result<Self, DbError> {
        Err(DbError::OpenError(format!(
            "database '{}' is only available inside the Spin runtime",
            name
        )))
    }
}

#[cfg(target_arch = "wasm32")]
fn to_spin(value: &Value) -> spin_sdk::sqlite::Value {
    match value {
        Value::Null => spin_sdk::sqlite::Value::Null,
        Value::Integer(i) => spin_sdk::sqlite::Value::Integer(*i),
        Value::Real(f) => spin_sdk::sqlite::Value::Real(*f),
        Value::Text(s) => spin_sdk::sqlite::Value::Text(s.clone()),
        Value::Blob(b) => spin_sdk::sqlite::Value::Blob(b.clone()),
    }
}

#[cfg(target_arch = "wasm32")]
fn from_spin(value: &spin_sdk::sqlite::Value) -> Value {
    match value {
        spin_sdk::sqlite::Value::Null => Value::Null,
        spin_sdk::sqlite::Value::Integer(i) => Value::Integer(*i),
        spin_sdk::sqlite::Value::Real(f) => Value::Real(*f),
        spin_sdk::sqlite::Value::Text(s) => Value::Text(s.clone()),
        spin_sdk::sqlite::Value::Blob(b) => Value::Blob(b.clone()),
    }
}

impl Storage for Db {
    #[cfg(target_arch = "wasm32")]
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        let spin_params: Vec<spin_sdk::sqlite::Value> = params.iter().map(to_spin).collect();

        let result = self
            .conn
            .execute(sql, spin_params.as_slice())
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        let columns: Vec<String> = result.columns.iter().map(|c| c.to_string()).collect();
        let rows = result
            .rows
            .iter()
            .map(|row| Row::new(columns.clone(), row.values.iter().map(from_spin).collect()))
            .collect();

        Ok(QueryResult::new(columns, rows))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn query(&self, _sql: &str, _params: &[Value]) -> Result<QueryResult, DbError> {
        Err(DbError::QueryError(
            "no SQLite host outside the Spin runtime".to_string(),
        ))
    }
}
