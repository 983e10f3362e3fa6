//! Core traits defined in `taskboard-core` and implemented by other crates.

pub mod repository;
pub mod session;

pub use repository::{
    Creator, CrudRepository, Deleter, Entity, Getter, GetterList, RepositoryPersistence, Updater,
};
pub use session::{QueryResult, Session, SessionHandle, Statement, StatementKind, UnitOfWork};
