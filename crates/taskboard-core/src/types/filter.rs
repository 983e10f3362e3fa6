//! The filter algebra.
//!
//! A [`FilterDefinition`] pairs an attribute with a backend operator. Binding
//! a value to it checks the value against the operator's policy and yields a
//! [`Filter`], which renders a parameterized fragment (`username = ?`) and
//! exposes the values for its placeholders. [`GroupFilter`] combines
//! predicates recursively; its values are always listed in the same
//! depth-first, left-to-right order in which its fragment text is built.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::value::{FilterValue, SqlValue};
use crate::error::AppError;
use crate::result::AppResult;

/// Comparison kinds a backend may register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterKind {
    Equal,
    NotEqual,
    Like,
    NotLike,
    Greater,
    Lower,
    GreaterEqual,
    LowerEqual,
    In,
    NotIn,
    Between,
}

impl FilterKind {
    /// Every kind, in declaration order.
    pub const ALL: [FilterKind; 11] = [
        Self::Equal,
        Self::NotEqual,
        Self::Like,
        Self::NotLike,
        Self::Greater,
        Self::Lower,
        Self::GreaterEqual,
        Self::LowerEqual,
        Self::In,
        Self::NotIn,
        Self::Between,
    ];

    /// Wire name, e.g. `NOT_EQUAL`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOT_EQUAL",
            Self::Like => "LIKE",
            Self::NotLike => "NOT_LIKE",
            Self::Greater => "GREATER",
            Self::Lower => "LOWER",
            Self::GreaterEqual => "GREATER_EQUAL",
            Self::LowerEqual => "LOWER_EQUAL",
            Self::In => "IN",
            Self::NotIn => "NOT_IN",
            Self::Between => "BETWEEN",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| AppError::validation(format!("Invalid filter kind: '{s}'")))
    }
}

/// Backend implementation of one comparison kind.
pub trait FilterOperator: Send + Sync + fmt::Debug {
    /// The kind this operator is registered under.
    fn kind(&self) -> FilterKind;

    /// Check `value` against the kind's value policy and convert it into
    /// the parameters bound to the rendered placeholders.
    fn coerce(&self, value: &FilterValue) -> AppResult<Vec<SqlValue>>;

    /// Render the fragment for `attribute`. `params` is the output of
    /// [`FilterOperator::coerce`] and fixes the placeholder count.
    fn render(&self, attribute: &str, params: &[SqlValue]) -> String;
}

/// Prefix `attribute` with `table.` unless it is already qualified.
pub fn qualify(table: &str, attribute: &str) -> String {
    if attribute.contains('.') {
        attribute.to_string()
    } else {
        format!("{table}.{attribute}")
    }
}

/// An attribute paired with an operator, waiting for a value.
#[derive(Debug, Clone)]
pub struct FilterDefinition {
    attribute: String,
    operator: Arc<dyn FilterOperator>,
}

impl FilterDefinition {
    /// Pair `attribute` with a backend operator.
    pub fn new(attribute: impl Into<String>, operator: Arc<dyn FilterOperator>) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
        }
    }

    /// Attribute the filter applies to, possibly table-qualified.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Kind of the underlying operator.
    pub fn kind(&self) -> FilterKind {
        self.operator.kind()
    }

    /// Bind a value. Fails with an unsupported-type error when the value
    /// does not satisfy the operator's policy.
    pub fn bind(&self, value: impl Into<FilterValue>) -> AppResult<Filter> {
        let value = value.into();
        let params = self.operator.coerce(&value)?;
        Ok(Filter {
            attribute: self.attribute.clone(),
            operator: Arc::clone(&self.operator),
            value,
            params,
        })
    }

    /// Qualify the attribute with `table`.
    pub fn with_table(mut self, table: &str) -> Self {
        self.attribute = qualify(table, &self.attribute);
        self
    }
}

/// A bound comparison.
#[derive(Debug, Clone)]
pub struct Filter {
    attribute: String,
    operator: Arc<dyn FilterOperator>,
    value: FilterValue,
    params: Vec<SqlValue>,
}

impl Filter {
    /// Attribute the filter applies to, possibly table-qualified.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Kind of the underlying operator.
    pub fn kind(&self) -> FilterKind {
        self.operator.kind()
    }

    /// The value as supplied by the caller.
    pub fn value(&self) -> &FilterValue {
        &self.value
    }

    /// Fragment text with `?` placeholders.
    pub fn to_definition(&self) -> String {
        self.operator.render(&self.attribute, &self.params)
    }

    /// Parameters for the placeholders of [`Filter::to_definition`].
    pub fn values(&self) -> Vec<SqlValue> {
        self.params.clone()
    }

    /// Borrowed form of [`Filter::values`].
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Qualify the attribute with `table`.
    pub fn with_table(mut self, table: &str) -> Self {
        self.attribute = qualify(table, &self.attribute);
        self
    }
}

/// Combinator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupKind {
    And,
    Or,
    Not,
}

impl GroupKind {
    /// Wire name, e.g. `AND`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend implementation of a combinator.
pub trait GroupOperator: Send + Sync + fmt::Debug {
    fn kind(&self) -> GroupKind;

    /// Combine already-rendered child fragments, in order.
    fn render(&self, children: &[String]) -> String;
}

/// A combinator over ordered child predicates.
#[derive(Debug, Clone)]
pub struct GroupFilter {
    operator: Arc<dyn GroupOperator>,
    children: Vec<Predicate>,
}

impl GroupFilter {
    /// Combine `children` with `operator`, keeping their order.
    pub fn new(operator: Arc<dyn GroupOperator>, children: Vec<Predicate>) -> Self {
        Self { operator, children }
    }

    /// Kind of the combinator.
    pub fn kind(&self) -> GroupKind {
        self.operator.kind()
    }

    /// Direct children, in rendering order.
    pub fn children(&self) -> &[Predicate] {
        &self.children
    }

    /// Append a child after the existing ones.
    pub fn push(&mut self, child: impl Into<Predicate>) {
        self.children.push(child.into());
    }

    /// Fragment text with children rendered in order.
    pub fn to_definition(&self) -> String {
        let rendered: Vec<String> = self.children.iter().map(Predicate::to_definition).collect();
        self.operator.render(&rendered)
    }

    /// Child values flattened depth-first, left to right.
    pub fn values(&self) -> Vec<SqlValue> {
        self.children.iter().flat_map(Predicate::values).collect()
    }

    /// Qualify every attribute in the subtree with `table`.
    pub fn with_table(self, table: &str) -> Self {
        Self {
            operator: self.operator,
            children: self
                .children
                .into_iter()
                .map(|child| child.with_table(table))
                .collect(),
        }
    }
}

/// Either a single comparison or a combinator.
#[derive(Debug, Clone)]
pub enum Predicate {
    Filter(Filter),
    Group(GroupFilter),
}

impl Predicate {
    /// Fragment text with `?` placeholders.
    pub fn to_definition(&self) -> String {
        match self {
            Self::Filter(filter) => filter.to_definition(),
            Self::Group(group) => group.to_definition(),
        }
    }

    /// Parameters in placeholder order.
    pub fn values(&self) -> Vec<SqlValue> {
        match self {
            Self::Filter(filter) => filter.values(),
            Self::Group(group) => group.values(),
        }
    }

    /// Qualify every attribute with `table`.
    pub fn with_table(self, table: &str) -> Self {
        match self {
            Self::Filter(filter) => Self::Filter(filter.with_table(table)),
            Self::Group(group) => Self::Group(group.with_table(table)),
        }
    }
}

impl From<Filter> for Predicate {
    fn from(filter: Filter) -> Self {
        Self::Filter(filter)
    }
}

impl From<GroupFilter> for Predicate {
    fn from(group: GroupFilter) -> Self {
        Self::Group(group)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{GroupStub, eq};
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_kind_parse_is_case_insensitive() {
        assert_eq!("not_in".parse::<FilterKind>().unwrap(), FilterKind::NotIn);
        assert_eq!(FilterKind::GreaterEqual.to_string(), "GREATER_EQUAL");
        assert!("ILIKE".parse::<FilterKind>().is_err());
    }

    #[test]
    fn test_bind_checks_policy() {
        let def = FilterDefinition::new("is_activated", Arc::new(testing::EqualStub));
        let err = def.bind(true).unwrap_err();
        assert!(err.is(ErrorKind::UnsupportedType));
    }

    #[test]
    fn test_nested_values_follow_text_order() {
        let inner = GroupFilter::new(
            Arc::new(GroupStub(GroupKind::Or)),
            vec![eq("b", 2).into(), eq("c", 3).into()],
        );
        let outer = GroupFilter::new(
            Arc::new(GroupStub(GroupKind::And)),
            vec![eq("a", 1).into(), inner.into(), eq("d", 4).into()],
        );
        assert_eq!(
            outer.to_definition(),
            "(a = ?) AND ((b = ?) OR (c = ?)) AND (d = ?)"
        );
        let values: Vec<String> = outer.values().iter().map(ToString::to_string).collect();
        assert_eq!(values, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_with_table_qualifies_once() {
        let filter = eq("board_id", "b1").with_table("tbl_task");
        assert_eq!(filter.to_definition(), "tbl_task.board_id = ?");
        let filter = filter.with_table("tbl_other");
        assert_eq!(filter.attribute(), "tbl_task.board_id");
    }
}
