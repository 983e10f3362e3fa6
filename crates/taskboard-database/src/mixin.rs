//! Generic PostgreSQL repository.
//!
//! [`PostgresRepository`] implements every capability trait for any
//! [`Entity`] given its table layout. Concrete repositories are this type
//! specialized to an entity, plus whatever finders their abstract trait adds.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use taskboard_core::error::AppError;
use taskboard_core::registry::RepositoryContext;
use taskboard_core::result::AppResult;
use taskboard_core::traits::{
    Creator, Deleter, Entity, Getter, GetterList, QueryResult, RepositoryPersistence,
    SessionHandle, Statement, Updater,
};
use taskboard_core::types::{
    Criteria, FilterBuilder, FilterKind, FilterValue, GroupKind, Join, Ordered, Paginator,
    Predicate,
};

use crate::statement::{self, Window};

pub struct PostgresRepository<E: Entity> {
    persistence: &'static RepositoryPersistence,
    session: SessionHandle,
    filter_builder: Arc<FilterBuilder>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> PostgresRepository<E> {
    pub fn new(persistence: &'static RepositoryPersistence, ctx: &RepositoryContext) -> Self {
        Self {
            persistence,
            session: ctx.session.clone(),
            filter_builder: Arc::clone(&ctx.filter_builder),
            _entity: PhantomData,
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.persistence.table_name
    }

    pub fn persistence(&self) -> &'static RepositoryPersistence {
        self.persistence
    }

    pub fn filter_builder(&self) -> &FilterBuilder {
        &self.filter_builder
    }

    /// `attribute = value` on this repository's table.
    pub fn equal(&self, attribute: &str, value: impl Into<FilterValue>) -> AppResult<Predicate> {
        Ok(self
            .filter_builder
            .filter(FilterKind::Equal, attribute, value)?
            .into())
    }

    /// `attribute = value AND is_activated = true`.
    pub fn active_by(
        &self,
        attribute: &str,
        value: impl Into<FilterValue>,
    ) -> AppResult<Predicate> {
        let group = self.filter_builder.group(
            GroupKind::And,
            [
                self.equal(attribute, value)?,
                self.equal("is_activated", true)?,
            ],
        )?;
        Ok(group.into())
    }

    pub async fn execute(&self, statement: Statement) -> AppResult<QueryResult> {
        info!(
            table = self.persistence.table_name,
            params = statement.params.len(),
            "Query [{}]",
            statement.sql
        );
        self.session.atomic_execute(&statement).await
    }

    /// First row matching every predicate.
    pub async fn find_one(&self, predicates: &[Predicate]) -> AppResult<Option<E>> {
        let statement =
            statement::select(self.persistence, predicates, &[], &[], Some(Window::first(1)));
        self.execute(statement)
            .await?
            .fetch_one()
            .map(E::from_record)
            .transpose()
    }

    /// Every row matching the predicates, unpaged.
    pub async fn find_all(
        &self,
        predicates: &[Predicate],
        orders: &[Ordered],
    ) -> AppResult<Vec<E>> {
        let statement = statement::select(self.persistence, predicates, orders, &[], None);
        self.execute(statement)
            .await?
            .fetch_all()
            .iter()
            .map(E::from_record)
            .collect()
    }

    fn not_found(&self, id: &str) -> AppError {
        AppError::not_found(format!(
            "Get_by_id - {} not found record with id {id}",
            self.persistence.table_name
        ))
    }
}

#[async_trait]
impl<E: Entity> Getter<E> for PostgresRepository<E> {
    async fn get_by_id(&self, id: &str) -> AppResult<E> {
        self.find_one(&[self.active_by("id", id)?])
            .await?
            .ok_or_else(|| self.not_found(id))
    }
}

#[async_trait]
impl<E: Entity> GetterList<E> for PostgresRepository<E> {
    async fn filter(&self, criteria: &Criteria, joins: &[Join]) -> AppResult<Paginator<E>> {
        let counted = self
            .execute(statement::count(self.persistence, criteria.filters(), joins))
            .await?;
        let total = match counted.fetch_one() {
            Some(row) => u64::try_from(row.integer("total")?).unwrap_or(0),
            None => 0,
        };
        if total == 0 {
            return Ok(Paginator::empty(criteria.page_number(), criteria.page_size()));
        }

        let elements = self
            .execute(statement::select_page(self.persistence, criteria, joins))
            .await?
            .fetch_all()
            .iter()
            .map(E::from_record)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Paginator::new(
            total,
            criteria.page_number(),
            criteria.page_size(),
            elements,
        ))
    }
}

#[async_trait]
impl<E: Entity> Creator<E> for PostgresRepository<E> {
    async fn create(&self, mut entity: E) -> AppResult<E> {
        let returned = self
            .execute(statement::insert(self.persistence, &entity)?)
            .await?;
        let row = returned.fetch_one().ok_or_else(|| {
            AppError::database(format!(
                "Insert into {} returned no id",
                self.persistence.table_name
            ))
        })?;
        entity.data_mut().id = row.string("id")?;
        Ok(entity)
    }
}

#[async_trait]
impl<E: Entity> Updater<E> for PostgresRepository<E> {
    async fn update(&self, id: &str, mut entity: E) -> AppResult<E> {
        entity.data_mut().touch();
        let result = self
            .execute(statement::update(self.persistence, id, &entity)?)
            .await?;
        if result.rows_affected == 0 {
            return Err(self.not_found(id));
        }
        entity.data_mut().id = id.to_string();
        Ok(entity)
    }
}

#[async_trait]
impl<E: Entity> Deleter for PostgresRepository<E> {
    async fn delete(&self, id: &str) -> AppResult<()> {
        let target = self.active_by("id", id)?;
        let result = self
            .execute(statement::soft_delete(self.persistence, &target, Utc::now()))
            .await?;
        if result.rows_affected == 0 {
            return Err(self.not_found(id));
        }
        info!(table = self.persistence.table_name, id, "Soft-deleted record");
        Ok(())
    }
}
