//! Parameterized storage access for the design content fetcher.
//!
//! The fetcher only ever reads: it issues a parameterized query on a cache
//! miss and turns the rows into a payload. This crate provides the seam for
//! that read ([`Storage`]), the SQLite backend used in production ([`Db`]),
//! a deadline wrapper ([`TimedStorage`]) and a scripted double for tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use design_db::{params, Db, Storage, QueryTimeout, TimedStorage};
//!
//! let db = TimedStorage::new(Db::open_default()?, QueryTimeout::from_millis(500));
//! let code = db.query_text(
//!     "SELECT code FROM ph7_CustomCode WHERE codeType = ? LIMIT 1",
//!     params!["css"],
//!     "code",
//! )?;
//! ```

mod db;
mod error;
mod scripted;
mod storage;
mod timeout;
mod types;

pub use db::Db;
pub use error::DbError;
pub use scripted::{RecordedQuery, ScriptedStorage};
pub use storage::Storage;
pub use timeout::{QueryTimeout, TimedStorage};
pub use types::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{params, Db, DbError, QueryResult, QueryTimeout, Row, Storage, TimedStorage, Value};
}

/// Create a parameter list for SQL queries.
///
/// # Example
///
/// ```rust,ignore
/// use design_db::params;
///
/// let params = params![160, 600, "css"];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
