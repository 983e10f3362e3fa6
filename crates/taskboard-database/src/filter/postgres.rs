//! PostgreSQL renderings of the filter algebra.
//!
//! Every comparison renders `attribute OPERATOR placeholder(s)` with `?`
//! placeholders; the session renumbers them to `$1..$n` before execution.
//! Values are always bound, never spliced into the text.

use taskboard_core::error::AppError;
use taskboard_core::result::AppResult;
use taskboard_core::types::{
    FilterBuilder, FilterKind, FilterOperator, FilterValue, GroupKind, GroupOperator, OrderKind,
    OrderOperator, SqlValue,
};

/// Which values a comparison accepts and how they become parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValuePolicy {
    /// One boolean, number, string, timestamp, or date.
    Scalar,
    /// One string, matched as a substring (`%value%`).
    Pattern,
    /// One number, timestamp, or date.
    Ordered,
    /// A non-empty list of numbers or strings, one placeholder each.
    Membership,
    /// Exactly two numbers, strings, timestamps, or dates.
    Range,
}

/// A comparison operator rendered for PostgreSQL.
#[derive(Debug, Clone, Copy)]
pub struct PostgresComparison {
    kind: FilterKind,
    operator: &'static str,
    policy: ValuePolicy,
}

impl PostgresComparison {
    pub fn new(kind: FilterKind) -> Self {
        let (operator, policy) = match kind {
            FilterKind::Equal => ("=", ValuePolicy::Scalar),
            FilterKind::NotEqual => ("!=", ValuePolicy::Scalar),
            FilterKind::Like => ("LIKE", ValuePolicy::Pattern),
            FilterKind::NotLike => ("NOT LIKE", ValuePolicy::Pattern),
            FilterKind::Greater => (">", ValuePolicy::Ordered),
            FilterKind::Lower => ("<", ValuePolicy::Ordered),
            FilterKind::GreaterEqual => (">=", ValuePolicy::Ordered),
            FilterKind::LowerEqual => ("<=", ValuePolicy::Ordered),
            FilterKind::In => ("IN", ValuePolicy::Membership),
            FilterKind::NotIn => ("NOT IN", ValuePolicy::Membership),
            FilterKind::Between => ("BETWEEN", ValuePolicy::Range),
        };
        Self {
            kind,
            operator,
            policy,
        }
    }

    fn unsupported(&self, value: &FilterValue) -> AppError {
        AppError::unsupported_type(self.kind, value.type_name())
    }

    fn scalar(&self, value: &FilterValue) -> AppResult<SqlValue> {
        match value {
            FilterValue::Boolean(v) => Ok(SqlValue::Bool(*v)),
            FilterValue::Integer(v) => Ok(SqlValue::Integer(*v)),
            FilterValue::Float(v) => Ok(SqlValue::Float(*v)),
            FilterValue::String(v) => Ok(SqlValue::Text(v.clone())),
            FilterValue::DateTime(v) => Ok(SqlValue::Timestamp(*v)),
            FilterValue::Date(v) => Ok(SqlValue::Date(*v)),
            FilterValue::List(_) => Err(self.unsupported(value)),
        }
    }

    fn ordered(&self, value: &FilterValue) -> AppResult<SqlValue> {
        match value {
            FilterValue::Integer(v) => Ok(SqlValue::Integer(*v)),
            FilterValue::Float(v) => Ok(SqlValue::Float(*v)),
            FilterValue::DateTime(v) => Ok(SqlValue::Timestamp(*v)),
            FilterValue::Date(v) => Ok(SqlValue::Date(*v)),
            _ => Err(self.unsupported(value)),
        }
    }

    fn member(&self, value: &FilterValue) -> AppResult<SqlValue> {
        match value {
            FilterValue::Integer(v) => Ok(SqlValue::Integer(*v)),
            FilterValue::Float(v) => Ok(SqlValue::Float(*v)),
            FilterValue::String(v) => Ok(SqlValue::Text(v.clone())),
            _ => Err(self.unsupported(value)),
        }
    }

    fn bound(&self, value: &FilterValue) -> AppResult<SqlValue> {
        match value {
            FilterValue::String(v) => Ok(SqlValue::Text(v.clone())),
            other => self.ordered(other),
        }
    }
}

impl FilterOperator for PostgresComparison {
    fn kind(&self) -> FilterKind {
        self.kind
    }

    fn coerce(&self, value: &FilterValue) -> AppResult<Vec<SqlValue>> {
        match self.policy {
            ValuePolicy::Scalar => Ok(vec![self.scalar(value)?]),
            ValuePolicy::Pattern => match value {
                FilterValue::String(v) => Ok(vec![SqlValue::Text(format!("%{v}%"))]),
                other => Err(self.unsupported(other)),
            },
            ValuePolicy::Ordered => Ok(vec![self.ordered(value)?]),
            ValuePolicy::Membership => match value {
                FilterValue::List(items) if !items.is_empty() => {
                    items.iter().map(|item| self.member(item)).collect()
                }
                FilterValue::List(_) => Err(AppError::validation(format!(
                    "{} requires at least one value",
                    self.kind
                ))),
                other => Err(self.unsupported(other)),
            },
            ValuePolicy::Range => match value {
                FilterValue::List(items) if items.len() == 2 => {
                    items.iter().map(|item| self.bound(item)).collect()
                }
                FilterValue::List(items) => Err(AppError::validation(format!(
                    "{} requires exactly 2 values, got {}",
                    self.kind,
                    items.len()
                ))),
                other => Err(self.unsupported(other)),
            },
        }
    }

    fn render(&self, attribute: &str, params: &[SqlValue]) -> String {
        match self.policy {
            ValuePolicy::Membership => {
                let placeholders = vec!["?"; params.len().max(1)].join(", ");
                format!("{attribute} {} ({placeholders})", self.operator)
            }
            ValuePolicy::Range => format!("{attribute} BETWEEN ? AND ?"),
            _ => format!("{attribute} {} ?", self.operator),
        }
    }
}

/// `AND`, `OR`, and `NOT` combinators.
///
/// Each child is wrapped in parentheses. `NOT` negates the conjunction of
/// its children. An empty `AND` is `TRUE` and an empty `OR` is `FALSE`.
#[derive(Debug, Clone, Copy)]
pub struct PostgresGroup {
    kind: GroupKind,
}

impl PostgresGroup {
    pub fn new(kind: GroupKind) -> Self {
        Self { kind }
    }

    fn join(children: &[String], separator: &str, empty: &str) -> String {
        if children.is_empty() {
            return empty.to_string();
        }
        children
            .iter()
            .map(|child| format!("({child})"))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl GroupOperator for PostgresGroup {
    fn kind(&self) -> GroupKind {
        self.kind
    }

    fn render(&self, children: &[String]) -> String {
        match self.kind {
            GroupKind::And => Self::join(children, " AND ", "TRUE"),
            GroupKind::Or => Self::join(children, " OR ", "FALSE"),
            GroupKind::Not => format!("NOT ({})", Self::join(children, " AND ", "TRUE")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PostgresOrder {
    kind: OrderKind,
}

impl PostgresOrder {
    pub fn new(kind: OrderKind) -> Self {
        Self { kind }
    }
}

impl OrderOperator for PostgresOrder {
    fn kind(&self) -> OrderKind {
        self.kind
    }

    fn render(&self, attribute: &str) -> String {
        format!("{attribute} {}", self.kind)
    }
}

/// A builder with every comparison, combinator, and direction registered.
pub fn postgres_filter_builder() -> FilterBuilder {
    let mut builder = FilterBuilder::new();
    for kind in FilterKind::ALL {
        builder.inject(PostgresComparison::new(kind));
    }
    for kind in [GroupKind::And, GroupKind::Or, GroupKind::Not] {
        builder.inject_group_filter(PostgresGroup::new(kind));
    }
    for kind in [OrderKind::Asc, OrderKind::Desc] {
        builder.inject_order(PostgresOrder::new(kind));
    }
    builder
}
