//! Backend implementations of the filter algebra.

pub mod postgres;

pub use postgres::{PostgresComparison, PostgresGroup, PostgresOrder, postgres_filter_builder};
