//! # taskboard-core
//!
//! Core crate for Taskboard. Contains the filter algebra and its builder,
//! criteria and pagination types, the repository capability traits, the
//! session contract, the type-indexed repository registry, configuration
//! schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Taskboard crates and
//! knows nothing about a concrete storage backend.

pub mod config;
pub mod error;
pub mod registry;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use registry::{RepositoryContext, RepositoryGetter};
pub use result::AppResult;
