//! Caller-side filter values and driver-side bound parameters.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A value supplied by a caller when binding a filter.
///
/// Whether a given variant is acceptable depends on the filter kind; the
/// check happens when the value is bound, not when the query runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A boolean value.
    Boolean(bool),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A timestamp.
    DateTime(DateTime<Utc>),
    /// A calendar date.
    Date(NaiveDate),
    /// A string value.
    String(String),
    /// An ordered list of values (for `IN`, `NOT IN`, `BETWEEN`).
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::DateTime(_) => "datetime",
            Self::Date(_) => "date",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>, const N: usize> From<[T; N]> for FilterValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Column type of a bound `NULL`, so the driver can pick the right encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Bool,
    Integer,
    Float,
    Text,
    Timestamp,
    Date,
    Json,
}

/// A parameter bound to a placeholder, or a column decoded from a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    /// A typed `NULL`.
    Null(SqlType),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Json(serde_json::Value),
}

impl SqlValue {
    /// The column type this value binds as.
    pub fn sql_type(&self) -> SqlType {
        match self {
            Self::Null(ty) => *ty,
            Self::Bool(_) => SqlType::Bool,
            Self::Integer(_) => SqlType::Integer,
            Self::Float(_) => SqlType::Float,
            Self::Text(_) => SqlType::Text,
            Self::Timestamp(_) => SqlType::Timestamp,
            Self::Date(_) => SqlType::Date,
            Self::Json(_) => SqlType::Json,
        }
    }

    /// Returns `true` for any typed `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }
}

/// Textual rendering used in logs and assertions.
///
/// Integers render as `1`, booleans as `true`, timestamps as
/// `2024-01-02 03:04:05`.
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null(_) => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_sql_value_from {
    ($($ty:ty => $variant:ident, $sql_type:ident, $conv:expr;)*) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(value: $ty) -> Self {
                    Self::$variant($conv(value))
                }
            }

            impl From<Option<$ty>> for SqlValue {
                fn from(value: Option<$ty>) -> Self {
                    match value {
                        Some(v) => Self::$variant($conv(v)),
                        None => Self::Null(SqlType::$sql_type),
                    }
                }
            }
        )*
    };
}

impl_sql_value_from! {
    bool => Bool, Bool, |v| v;
    i32 => Integer, Integer, i64::from;
    i64 => Integer, Integer, |v| v;
    f64 => Float, Float, |v| v;
    String => Text, Text, |v| v;
    &str => Text, Text, |v: &str| v.to_string();
    DateTime<Utc> => Timestamp, Timestamp, |v| v;
    NaiveDate => Date, Date, |v| v;
    serde_json::Value => Json, Json, |v| v;
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Option<&String>> for SqlValue {
    fn from(value: Option<&String>) -> Self {
        value.map_or(Self::Null(SqlType::Text), |v| Self::Text(v.clone()))
    }
}
