//! Joins used to filter across related tables.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A join against `table` with a raw `ON` condition.
///
/// Joins only narrow a query. The projected columns stay those of the
/// queried entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub join_type: JoinType,
    pub on: String,
}

impl Join {
    /// Join `table` on the condition `on`.
    pub fn new(table: impl Into<String>, on: impl Into<String>, join_type: JoinType) -> Self {
        Self {
            table: table.into(),
            join_type,
            on: on.into(),
        }
    }

    pub fn inner(table: impl Into<String>, on: impl Into<String>) -> Self {
        Self::new(table, on, JoinType::Inner)
    }

    /// Clause text, e.g. `INNER JOIN t ON t.a = b.id`.
    pub fn to_definition(&self) -> String {
        format!("{} {} ON {}", self.join_type, self.table, self.on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition() {
        let join = Join::inner(
            "tbl_ownership_board",
            "tbl_ownership_board.board_id = tbl_board.id",
        );
        assert_eq!(
            join.to_definition(),
            "INNER JOIN tbl_ownership_board ON tbl_ownership_board.board_id = tbl_board.id"
        );
        assert_eq!(JoinType::Left.as_sql(), "LEFT JOIN");
    }
}
