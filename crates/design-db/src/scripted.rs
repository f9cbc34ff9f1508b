//! In-process storage double for development and tests.

use std::time::Duration;

use parking_lot::Mutex;

use crate::{DbError, QueryResult, Storage, Value};

/// A query that reached [`ScriptedStorage`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    /// The SQL text as issued.
    pub sql: String,
    /// Bound parameters.
    pub params: Vec<Value>,
}

enum Reply {
    Rows(QueryResult),
    Fail(String),
}

/// Storage that answers queries from a script instead of a database.
///
/// Each rule matches when the SQL contains its fragment; the first matching
/// rule wins and unmatched queries return no rows. Every call is recorded so
/// callers can assert how often storage was actually hit.
#[derive(Default)]
pub struct ScriptedStorage {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<RecordedQuery>>,
    latency: Option<Duration>,
}

impl ScriptedStorage {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries containing `fragment` with `result`.
    pub fn respond(mut self, fragment: impl Into<String>, result: QueryResult) -> Self {
        self.rules.push((fragment.into(), Reply::Rows(result)));
        self
    }

    /// Fail queries containing `fragment` with a query error.
    pub fn fail(mut self, fragment: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push((fragment.into(), Reply::Fail(message.into())));
        self
    }

    /// Sleep this long on every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// All queries issued so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls.lock().clone()
    }

    /// Number of issued queries whose SQL contains `fragment`.
    pub fn calls_matching(&self, fragment: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|q| q.sql.contains(fragment))
            .count()
    }
}

impl Storage for ScriptedStorage {
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        self.calls.lock().push(RecordedQuery {
            sql: sql.to_string(),
            params: params.to_vec(),
        });

        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }

        match self.rules.iter().find(|(fragment, _)| sql.contains(fragment.as_str())) {
            Some((_, Reply::Rows(result))) => Ok(result.clone()),
            Some((_, Reply::Fail(message))) => Err(DbError::QueryError(message.clone())),
            None => Ok(QueryResult::empty()),
        }
    }
}
