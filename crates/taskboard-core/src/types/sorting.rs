//! Ordering clauses.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::filter::qualify;
use crate::error::AppError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    #[default]
    Asc,
    Desc,
}

impl OrderKind {
    /// Wire name, `ASC` or `DESC`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(AppError::validation(format!("Invalid order kind: '{s}'"))),
        }
    }
}

/// Backend implementation of one sort direction.
pub trait OrderOperator: Send + Sync + fmt::Debug {
    fn kind(&self) -> OrderKind;

    /// Render the `ORDER BY` item for `attribute`, e.g. `created_at DESC`.
    fn render(&self, attribute: &str) -> String;
}

/// An ordering clause on one attribute.
#[derive(Debug, Clone)]
pub struct Ordered {
    attribute: String,
    operator: Arc<dyn OrderOperator>,
}

impl Ordered {
    /// Pair `attribute` with a backend order operator.
    pub fn new(attribute: impl Into<String>, operator: Arc<dyn OrderOperator>) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
        }
    }

    /// Attribute being ordered, possibly table-qualified.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn kind(&self) -> OrderKind {
        self.operator.kind()
    }

    /// Clause text, e.g. `created_at DESC`.
    pub fn to_definition(&self) -> String {
        self.operator.render(&self.attribute)
    }

    /// Qualify the attribute with `table`.
    pub fn with_table(mut self, table: &str) -> Self {
        self.attribute = qualify(table, &self.attribute);
        self
    }
}
