//! Core type definitions used across the Taskboard workspace.

pub mod builder;
pub mod criteria;
pub mod data;
pub mod filter;
pub mod join;
pub mod pagination;
pub mod query;
pub mod record;
pub mod secret;
pub mod sorting;
pub mod value;

pub use builder::{FilterBuilder, FilterFactory, GroupFactory, OrderFactory};
pub use criteria::{Criteria, DEFAULT_PAGE_SIZE};
pub use data::{DATA_FIELDS, RepositoryData};
pub use filter::{
    Filter, FilterDefinition, FilterKind, FilterOperator, GroupFilter, GroupKind, GroupOperator,
    Predicate,
};
pub use join::{Join, JoinType};
pub use pagination::Paginator;
pub use query::{FilterSpec, ListQuery, OrderSpec};
pub use record::Record;
pub use secret::Secret;
pub use sorting::{OrderKind, OrderOperator, Ordered};
pub use value::{FilterValue, SqlType, SqlValue};
