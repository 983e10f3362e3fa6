//! Registry of backend operators, keyed by kind.
//!
//! A backend populates a [`FilterBuilder`] once at startup. Afterwards the
//! builder is shared read-only (usually as `Arc<FilterBuilder>`), and callers
//! construct filters by kind without naming a backend type.

use std::collections::HashMap;
use std::sync::Arc;

use super::filter::{
    Filter, FilterDefinition, FilterKind, FilterOperator, GroupFilter, GroupKind, GroupOperator,
    Predicate,
};
use super::sorting::{OrderKind, OrderOperator, Ordered};
use super::value::FilterValue;
use crate::error::AppError;
use crate::result::AppResult;

/// Maps filter, order, and group kinds to backend operators.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    filters: HashMap<FilterKind, Arc<dyn FilterOperator>>,
    orders: HashMap<OrderKind, Arc<dyn OrderOperator>>,
    groups: HashMap<GroupKind, Arc<dyn GroupOperator>>,
}

impl FilterBuilder {
    /// A builder with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a comparison operator under its own kind, replacing any
    /// previous registration.
    pub fn inject(&mut self, operator: impl FilterOperator + 'static) -> &mut Self {
        self.filters.insert(operator.kind(), Arc::new(operator));
        self
    }

    /// Register an order operator, replacing any with the same kind.
    pub fn inject_order(&mut self, operator: impl OrderOperator + 'static) -> &mut Self {
        self.orders.insert(operator.kind(), Arc::new(operator));
        self
    }

    /// Register a combinator, replacing any with the same kind.
    pub fn inject_group_filter(&mut self, operator: impl GroupOperator + 'static) -> &mut Self {
        self.groups.insert(operator.kind(), Arc::new(operator));
        self
    }

    /// Constructor for filters of `kind`.
    pub fn build(&self, kind: FilterKind) -> AppResult<FilterFactory> {
        self.filters
            .get(&kind)
            .map(|operator| FilterFactory {
                operator: Arc::clone(operator),
            })
            .ok_or_else(|| AppError::definition_not_found(kind))
    }

    /// Constructor for ordering clauses of `kind`.
    pub fn build_order(&self, kind: OrderKind) -> AppResult<OrderFactory> {
        self.orders
            .get(&kind)
            .map(|operator| OrderFactory {
                operator: Arc::clone(operator),
            })
            .ok_or_else(|| AppError::definition_not_found(kind))
    }

    /// Constructor for combinators of `kind`.
    pub fn build_group_filter(&self, kind: GroupKind) -> AppResult<GroupFactory> {
        self.groups
            .get(&kind)
            .map(|operator| GroupFactory {
                operator: Arc::clone(operator),
            })
            .ok_or_else(|| AppError::definition_not_found(kind))
    }

    /// Shorthand for `build(kind)?.on(attribute).bind(value)`.
    pub fn filter(
        &self,
        kind: FilterKind,
        attribute: &str,
        value: impl Into<FilterValue>,
    ) -> AppResult<Filter> {
        self.build(kind)?.on(attribute).bind(value)
    }

    /// Shorthand for `build_order(kind)?.on(attribute)`.
    pub fn order(&self, kind: OrderKind, attribute: &str) -> AppResult<Ordered> {
        Ok(self.build_order(kind)?.on(attribute))
    }

    /// Shorthand for `build_group_filter(kind)?.of(children)`.
    pub fn group<I, P>(&self, kind: GroupKind, children: I) -> AppResult<GroupFilter>
    where
        I: IntoIterator<Item = P>,
        P: Into<Predicate>,
    {
        Ok(self.build_group_filter(kind)?.of(children))
    }

    /// Returns `true` when a filter operator is registered for `kind`.
    pub fn supports(&self, kind: FilterKind) -> bool {
        self.filters.contains_key(&kind)
    }
}

/// Produces [`FilterDefinition`]s for one kind.
#[derive(Debug, Clone)]
pub struct FilterFactory {
    operator: Arc<dyn FilterOperator>,
}

impl FilterFactory {
    /// Bind `attribute` to this factory's operator.
    pub fn on(&self, attribute: impl Into<String>) -> FilterDefinition {
        FilterDefinition::new(attribute, Arc::clone(&self.operator))
    }
}

/// Produces [`Ordered`] clauses for one direction.
#[derive(Debug, Clone)]
pub struct OrderFactory {
    operator: Arc<dyn OrderOperator>,
}

impl OrderFactory {
    pub fn on(&self, attribute: impl Into<String>) -> Ordered {
        Ordered::new(attribute, Arc::clone(&self.operator))
    }
}

/// Produces [`GroupFilter`]s for one combinator.
#[derive(Debug, Clone)]
pub struct GroupFactory {
    operator: Arc<dyn GroupOperator>,
}

impl GroupFactory {
    pub fn of<I, P>(&self, children: I) -> GroupFilter
    where
        I: IntoIterator<Item = P>,
        P: Into<Predicate>,
    {
        GroupFilter::new(
            Arc::clone(&self.operator),
            children.into_iter().map(Into::into).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::filter::testing::{EqualStub, GroupStub};

    fn builder() -> FilterBuilder {
        let mut builder = FilterBuilder::new();
        builder
            .inject(EqualStub)
            .inject_group_filter(GroupStub(GroupKind::And));
        builder
    }

    #[test]
    fn test_build_registered_kind() {
        let filter = builder()
            .build(FilterKind::Equal)
            .unwrap()
            .on("username")
            .bind("alice")
            .unwrap();
        assert_eq!(filter.to_definition(), "username = ?");
        assert_eq!(filter.values()[0].to_string(), "alice");
    }

    #[test]
    fn test_unregistered_kind_is_configuration_error() {
        let err = builder().build(FilterKind::Between).unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
        assert!(err.message.contains("BETWEEN"));
        assert!(builder().build_order(OrderKind::Desc).is_err());
        assert!(builder().build_group_filter(GroupKind::Or).is_err());
    }

    #[test]
    fn test_group_shorthand() {
        let b = builder();
        let group = b
            .group(
                GroupKind::And,
                [
                    b.filter(FilterKind::Equal, "a", 1).unwrap(),
                    b.filter(FilterKind::Equal, "b", 2).unwrap(),
                ],
            )
            .unwrap();
        assert_eq!(group.to_definition(), "(a = ?) AND (b = ?)");
    }
}
