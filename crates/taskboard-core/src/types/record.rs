//! Rows decoded by column name.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use super::value::SqlValue;
use crate::error::AppError;
use crate::result::AppResult;

/// A single result row, keyed by column name.
///
/// Entities are rebuilt from records by name, so the order of the
/// projected columns never matters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: HashMap<String, SqlValue>,
}

impl Record {
    /// An empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set `column`, replacing any previous value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<SqlValue>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Raw value of `column`, if present.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns.get(column)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` for a row without columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn required(&self, column: &str) -> AppResult<&SqlValue> {
        match self.columns.get(column) {
            None => Err(AppError::serialization(format!(
                "Column '{column}' missing from row"
            ))),
            Some(value) if value.is_null() => Err(AppError::serialization(format!(
                "Column '{column}' is unexpectedly NULL"
            ))),
            Some(value) => Ok(value),
        }
    }

    fn optional(&self, column: &str) -> Option<&SqlValue> {
        self.columns.get(column).filter(|v| !v.is_null())
    }

    fn mismatch(column: &str, expected: &str, found: &SqlValue) -> AppError {
        AppError::serialization(format!(
            "Column '{column}' expected {expected}, found {:?}",
            found.sql_type()
        ))
    }

    /// Read a text column.
    pub fn string(&self, column: &str) -> AppResult<String> {
        match self.required(column)? {
            SqlValue::Text(v) => Ok(v.clone()),
            other => Err(Self::mismatch(column, "text", other)),
        }
    }

    /// Read a nullable text column.
    pub fn opt_string(&self, column: &str) -> AppResult<Option<String>> {
        match self.optional(column) {
            None => Ok(None),
            Some(SqlValue::Text(v)) => Ok(Some(v.clone())),
            Some(other) => Err(Self::mismatch(column, "text", other)),
        }
    }

    /// Non-null boolean column.
    pub fn boolean(&self, column: &str) -> AppResult<bool> {
        match self.required(column)? {
            SqlValue::Bool(v) => Ok(*v),
            other => Err(Self::mismatch(column, "bool", other)),
        }
    }

    /// Non-null integer column.
    pub fn integer(&self, column: &str) -> AppResult<i64> {
        match self.required(column)? {
            SqlValue::Integer(v) => Ok(*v),
            other => Err(Self::mismatch(column, "integer", other)),
        }
    }

    /// Non-null timestamp column.
    pub fn timestamp(&self, column: &str) -> AppResult<DateTime<Utc>> {
        match self.required(column)? {
            SqlValue::Timestamp(v) => Ok(*v),
            other => Err(Self::mismatch(column, "timestamp", other)),
        }
    }

    /// Nullable timestamp column.
    pub fn opt_timestamp(&self, column: &str) -> AppResult<Option<DateTime<Utc>>> {
        match self.optional(column) {
            None => Ok(None),
            Some(SqlValue::Timestamp(v)) => Ok(Some(*v)),
            Some(other) => Err(Self::mismatch(column, "timestamp", other)),
        }
    }

    /// Non-null date column.
    pub fn date(&self, column: &str) -> AppResult<NaiveDate> {
        match self.required(column)? {
            SqlValue::Date(v) => Ok(*v),
            other => Err(Self::mismatch(column, "date", other)),
        }
    }

    /// Non-null JSON column.
    pub fn json(&self, column: &str) -> AppResult<serde_json::Value> {
        match self.required(column)? {
            SqlValue::Json(v) => Ok(v.clone()),
            other => Err(Self::mismatch(column, "json", other)),
        }
    }

    /// Nullable JSON column.
    pub fn opt_json(&self, column: &str) -> AppResult<Option<serde_json::Value>> {
        match self.optional(column) {
            None => Ok(None),
            Some(SqlValue::Json(v)) => Ok(Some(v.clone())),
            Some(other) => Err(Self::mismatch(column, "json", other)),
        }
    }

    /// Read a text column and parse it (enum columns stored as text).
    pub fn parse<T>(&self, column: &str) -> AppResult<T>
    where
        T: FromStr<Err = AppError>,
    {
        self.string(column)?.parse()
    }
}

impl FromIterator<(String, SqlValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::value::SqlType;

    #[test]
    fn test_typed_getters() {
        let record = Record::new()
            .with("name", "alice")
            .with("is_activated", true)
            .with("total", 7i64);
        assert_eq!(record.string("name").unwrap(), "alice");
        assert!(record.boolean("is_activated").unwrap());
        assert_eq!(record.integer("total").unwrap(), 7);
    }

    #[test]
    fn test_missing_and_null_columns() {
        let record = Record::new().with("deleted_at", SqlValue::Null(SqlType::Timestamp));
        assert_eq!(record.opt_timestamp("deleted_at").unwrap(), None);
        assert!(record.timestamp("deleted_at").unwrap_err().is(ErrorKind::Serialization));
        assert!(record.string("absent").is_err());
        assert_eq!(record.opt_string("absent").unwrap(), None);
    }

    #[test]
    fn test_type_mismatch() {
        let record = Record::new().with("name", 3i64);
        let err = record.string("name").unwrap_err();
        assert!(err.message.contains("expected text"));
    }
}
