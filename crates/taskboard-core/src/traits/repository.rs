//! Repository capabilities.
//!
//! Each capability is its own trait so callers can depend on the narrowest
//! one they need. A concrete repository declares the capabilities it
//! implements; [`CrudRepository`] is implemented automatically for any type
//! that has all five.

use std::any::type_name;

use async_trait::async_trait;

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::criteria::Criteria;
use crate::types::data::RepositoryData;
use crate::types::join::Join;
use crate::types::pagination::Paginator;
use crate::types::record::Record;
use crate::types::value::SqlValue;

/// Where an entity lives: table name and its ordered column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryPersistence {
    pub table_name: &'static str,
    pub fields: &'static [&'static str],
}

impl RepositoryPersistence {
    pub const fn new(table_name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { table_name, fields }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(&name)
    }
}

/// A persisted entity: [`RepositoryData`] plus its own columns.
pub trait Entity: Clone + Send + Sync + 'static {
    fn data(&self) -> &RepositoryData;

    fn data_mut(&mut self) -> &mut RepositoryData;

    /// Value of one of the entity's own columns, as it is stored.
    fn field(&self, name: &str) -> Option<SqlValue>;

    /// Rebuild the entity from a row, reading columns by name.
    fn from_record(record: &Record) -> AppResult<Self>;

    /// Value of any column, bookkeeping columns included.
    fn column(&self, name: &str) -> AppResult<SqlValue> {
        self.data()
            .column(name)
            .or_else(|| self.field(name))
            .ok_or_else(|| {
                AppError::internal(format!(
                    "{} has no column '{name}'",
                    type_name::<Self>()
                ))
            })
    }

    fn id(&self) -> &str {
        &self.data().id
    }
}

/// Fetch one active entity by id.
#[async_trait]
pub trait Getter<E: Entity>: Send + Sync {
    /// Soft-deleted rows are never returned; missing rows are `NotFound`.
    async fn get_by_id(&self, id: &str) -> AppResult<E>;
}

/// Filtered, paginated listing.
#[async_trait]
pub trait GetterList<E: Entity>: Send + Sync {
    async fn filter(&self, criteria: &Criteria, joins: &[Join]) -> AppResult<Paginator<E>>;
}

/// Insert an entity and return it with its generated id.
#[async_trait]
pub trait Creator<E: Entity>: Send + Sync {
    async fn create(&self, entity: E) -> AppResult<E>;
}

/// Overwrite every column of the entity stored under `id`.
#[async_trait]
pub trait Updater<E: Entity>: Send + Sync {
    async fn update(&self, id: &str, entity: E) -> AppResult<E>;
}

/// Logical delete.
#[async_trait]
pub trait Deleter: Send + Sync {
    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// All five capabilities.
pub trait CrudRepository<E: Entity>:
    Getter<E> + GetterList<E> + Creator<E> + Updater<E> + Deleter
{
}

impl<E, T> CrudRepository<E> for T
where
    E: Entity,
    T: Getter<E> + GetterList<E> + Creator<E> + Updater<E> + Deleter,
{
}
