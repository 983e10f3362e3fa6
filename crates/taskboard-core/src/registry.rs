//! Type-indexed resolution of abstract repositories.
//!
//! A backend registers one factory per abstract repository trait object
//! (`dyn UserRepository`, `dyn TaskRepository`, ...). Callers ask for the
//! trait object by type and receive the concrete implementation, bound to
//! the session they pass in:
//!
//! ```ignore
//! let users: Box<dyn UserRepository> = getter.get::<dyn UserRepository>(&session)?;
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::AppError;
use crate::result::AppResult;
use crate::traits::session::SessionHandle;
use crate::types::builder::FilterBuilder;

/// Everything a repository needs to be constructed for one request.
#[derive(Debug, Clone)]
pub struct RepositoryContext {
    pub session: SessionHandle,
    pub filter_builder: Arc<FilterBuilder>,
}

type Factory = Arc<dyn Fn(&RepositoryContext) -> AppResult<Box<dyn Any + Send>> + Send + Sync>;

#[derive(Clone)]
struct Registration {
    name: &'static str,
    factory: Factory,
}

/// Maps abstract repository types to factories for their implementations.
#[derive(Clone)]
pub struct RepositoryGetter {
    filter_builder: Arc<FilterBuilder>,
    factories: HashMap<TypeId, Registration>,
}

impl RepositoryGetter {
    /// An empty resolver sharing `filter_builder` with every repository it builds.
    pub fn new(filter_builder: Arc<FilterBuilder>) -> Self {
        Self {
            filter_builder,
            factories: HashMap::new(),
        }
    }

    /// Register the implementation of `R`, replacing any previous one.
    pub fn register<R, F>(&mut self, factory: F) -> &mut Self
    where
        R: ?Sized + Send + 'static,
        F: Fn(&RepositoryContext) -> AppResult<Box<R>> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |ctx: &RepositoryContext| {
            factory(ctx).map(|repository| Box::new(repository) as Box<dyn Any + Send>)
        });
        self.factories.insert(
            TypeId::of::<R>(),
            Registration {
                name: type_name::<R>(),
                factory,
            },
        );
        self
    }

    /// Builder-style [`RepositoryGetter::register`].
    pub fn with<R, F>(mut self, factory: F) -> Self
    where
        R: ?Sized + Send + 'static,
        F: Fn(&RepositoryContext) -> AppResult<Box<R>> + Send + Sync + 'static,
    {
        self.register::<R, F>(factory);
        self
    }

    /// Add every registration of `other`. On a shared key `other` wins.
    pub fn merge(mut self, other: RepositoryGetter) -> Self {
        self.factories.extend(other.factories);
        self
    }

    /// Resolve `R` bound to `session`.
    pub fn get<R>(&self, session: &SessionHandle) -> AppResult<Box<R>>
    where
        R: ?Sized + 'static,
    {
        let registration = self
            .factories
            .get(&TypeId::of::<R>())
            .ok_or_else(|| AppError::persistence_type_not_found(type_name::<R>()))?;

        let ctx = RepositoryContext {
            session: session.clone(),
            filter_builder: Arc::clone(&self.filter_builder),
        };

        (registration.factory)(&ctx)?
            .downcast::<Box<R>>()
            .map(|repository| *repository)
            .map_err(|_| {
                AppError::internal(format!(
                    "Factory registered for {} returned another type",
                    registration.name
                ))
            })
    }

    /// Returns `true` when a factory is registered for `R`.
    pub fn contains<R: ?Sized + 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<R>())
    }

    /// Names of every registered type, sorted.
    pub fn registered(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.values().map(|r| r.name).collect();
        names.sort_unstable();
        names
    }

    /// The builder handed to every resolved repository.
    pub fn filter_builder(&self) -> &Arc<FilterBuilder> {
        &self.filter_builder
    }
}

impl fmt::Debug for RepositoryGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryGetter")
            .field("registered", &self.registered())
            .finish()
    }
}
