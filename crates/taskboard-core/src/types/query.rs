//! Serializable list request, converted to [`Criteria`] at the edge.

use serde::{Deserialize, Serialize};

use super::builder::FilterBuilder;
use super::criteria::Criteria;
use super::filter::FilterKind;
use super::sorting::OrderKind;
use super::value::FilterValue;
use crate::config::RepositoryConfig;
use crate::result::AppResult;

/// One comparison in a [`ListQuery`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub attribute: String,
    pub value: FilterValue,
}

/// One ordering clause in a [`ListQuery`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSpec {
    pub attribute: String,
    #[serde(default)]
    pub kind: OrderKind,
}

/// A list request as it arrives from outside (CLI arguments, JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub order_by: Vec<OrderSpec>,
    /// Page size. Falls back to the configured default and is capped at the
    /// configured maximum.
    pub limit: Option<u64>,
    /// 1-based page number, default 1.
    pub page: Option<u64>,
}

impl ListQuery {
    /// Add a filter request.
    pub fn filter(
        mut self,
        kind: FilterKind,
        attribute: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.filters.push(FilterSpec {
            kind,
            attribute: attribute.into(),
            value: value.into(),
        });
        self
    }

    /// Add an order request.
    pub fn order_by(mut self, attribute: impl Into<String>, kind: OrderKind) -> Self {
        self.order_by.push(OrderSpec {
            attribute: attribute.into(),
            kind,
        });
        self
    }

    /// Build criteria through `builder`. Fails when a kind is not registered,
    /// a value does not fit its filter, or the page is 0.
    pub fn into_criteria(
        self,
        builder: &FilterBuilder,
        config: &RepositoryConfig,
    ) -> AppResult<Criteria> {
        let page_size = self
            .limit
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);
        let mut criteria = Criteria::new(self.page.unwrap_or(1), page_size)?;

        for filter in self.filters {
            criteria.push_filter(builder.filter(filter.kind, &filter.attribute, filter.value)?);
        }
        for order in self.order_by {
            criteria.push_order(builder.order(order.kind, &order.attribute)?);
        }
        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::filter::testing::EqualStub;

    fn builder() -> FilterBuilder {
        let mut builder = FilterBuilder::new();
        builder.inject(EqualStub);
        builder
    }

    #[test]
    fn test_defaults_and_cap() {
        let config = RepositoryConfig::default();
        let criteria = ListQuery::default()
            .into_criteria(&builder(), &config)
            .unwrap();
        assert_eq!(criteria.page_size(), 30);
        assert_eq!(criteria.page_number(), 1);

        let query = ListQuery {
            limit: Some(10_000),
            page: Some(2),
            ..ListQuery::default()
        };
        let criteria = query.into_criteria(&builder(), &config).unwrap();
        assert_eq!(criteria.page_size(), config.max_page_size);
        assert_eq!(criteria.offset(), config.max_page_size);
    }

    #[test]
    fn test_unregistered_kind_fails() {
        let query = ListQuery::default().filter(FilterKind::Like, "name", "x");
        let err = query
            .into_criteria(&builder(), &RepositoryConfig::default())
            .unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }

    #[test]
    fn test_deserialize() {
        let query: ListQuery = serde_json::from_str(
            r#"{"filters":[{"kind":"EQUAL","attribute":"username","value":"alice"}],"page":1}"#,
        )
        .unwrap();
        let criteria = query
            .into_criteria(&builder(), &RepositoryConfig::default())
            .unwrap();
        assert_eq!(criteria.filters()[0].to_definition(), "username = ?");
    }
}
