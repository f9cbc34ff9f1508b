//! Query parameter and result types.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::de::DeserializeOwned;

use crate::DbError;

/// A value bound as a query parameter or read back from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Integer value.
    Integer(i64),
    /// Real/float value.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl Value {
    /// Try to get the value as an i64.
    ///
    /// Text holding a decimal integer converts too, since flag columns such as
    /// `active` are stored as `'1'`/`'0'` strings.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => Some(*f as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to get the value as a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as bytes.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            Value::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Check if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Integer(i) => serde_json::Value::Number((*i).into()),
            Value::Real(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            // Code columns are sometimes stored as BLOB; keep them readable.
            Value::Blob(b) => match std::str::from_utf8(b) {
                Ok(s) => serde_json::Value::String(s.to_string()),
                Err(_) => serde_json::Value::String(STANDARD.encode(b)),
            },
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(if v { 1 } else { 0 })
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A row from a query result.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Create a new row from columns and values.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Get a column as text, treating null and missing columns alike.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    /// Get the column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get all values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Convert the row to a HashMap.
    pub fn to_map(&self) -> HashMap<String, Value> {
        self.columns
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }

    /// Deserialize the row into a type, going through a JSON object keyed by
    /// column name.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DbError> {
        let map: serde_json::Map<String, serde_json::Value> = self
            .columns
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();

        serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| DbError::DeserializeError(e.to_string()))
    }
}

/// Query result containing zero or more rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// The column names.
    pub columns: Vec<String>,
    /// The rows.
    pub rows: Vec<Row>,
}

impl QueryResult {
    /// Create a new query result.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// An empty result with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result from column names and raw value rows.
    pub fn from_values(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|values| Row::new(columns.clone(), values))
            .collect();
        Self { columns, rows }
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the first row.
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Iterate over the rows.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Deserialize all rows into a vector of a type.
    pub fn deserialize_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, DbError> {
        self.rows.iter().map(Row::deserialize).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Banner {
        #[serde(rename = "adsId")]
        ads_id: i64,
        code: String,
    }

    // === Value Tests ===

    #[test]
    fn test_value_as_integer_parses_flag_text() {
        assert_eq!(Value::from("1").as_integer(), Some(1));
        assert_eq!(Value::from(" 0 ").as_integer(), Some(0));
        assert_eq!(Value::from("yes").as_integer(), None);
        assert_eq!(Value::Null.as_integer(), None);
    }

    #[test]
    fn test_value_from_option() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some("css")), Value::Text("css".into()));
    }

    #[test]
    fn test_value_from_bool() {
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::from(false), Value::Integer(0));
    }

    // === Row Tests ===

    #[test]
    fn test_row_get_by_column() {
        let row = Row::new(
            vec!["file".into(), "active".into()],
            vec![Value::from("/static/app.css"), Value::from("1")],
        );

        assert_eq!(row.text("file"), Some("/static/app.css"));
        assert_eq!(row.get("active").and_then(Value::as_integer), Some(1));
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_row_deserialize() {
        let row = Row::new(
            vec!["adsId".into(), "code".into()],
            vec![Value::Integer(7), Value::Blob(b"<b>ad</b>".to_vec())],
        );

        let banner: Banner = row.deserialize().unwrap();
        assert_eq!(
            banner,
            Banner {
                ads_id: 7,
                code: "<b>ad</b>".into()
            }
        );
    }

    #[test]
    fn test_row_deserialize_type_mismatch() {
        let row = Row::new(vec!["adsId".into()], vec![Value::from("seven")]);
        let result: Result<Banner, _> = row.deserialize();
        assert!(matches!(result, Err(DbError::DeserializeError(_))));
    }

    #[test]
    fn test_non_utf8_blob_is_base64() {
        let v = Value::Blob(vec![0xff, 0xfe]);
        assert_eq!(v.to_json(), serde_json::Value::String("//4=".into()));
    }

    // === QueryResult Tests ===

    #[test]
    fn test_query_result_from_values() {
        let result = QueryResult::from_values(
            &["langId"],
            vec![vec![Value::from("en_US")], vec![Value::from("fr_FR")]],
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result.first().and_then(|r| r.text("langId")), Some("en_US"));
        assert_eq!(result.rows[1].columns(), &["langId".to_string()]);
    }

    #[test]
    fn test_query_result_empty() {
        let result = QueryResult::empty();
        assert!(result.is_empty());
        assert!(result.first().is_none());
    }
}
