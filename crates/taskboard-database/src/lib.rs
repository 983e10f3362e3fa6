//! # taskboard-database
//!
//! PostgreSQL backend for Taskboard: connection pool management, the
//! transactional session, filter renderings, the SQL statement templates,
//! the generic repository mixin, and the concrete repositories for every
//! entity.

pub mod connection;
pub mod filter;
pub mod migration;
pub mod mixin;
pub mod repositories;
pub mod session;
pub mod statement;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::DatabasePool;
pub use filter::postgres_filter_builder;
pub use mixin::PostgresRepository;
pub use repositories::postgres_repositories;
pub use session::{PgSession, PgUnitOfWork};
