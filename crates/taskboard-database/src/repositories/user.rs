//! PostgreSQL storage of user accounts.

use async_trait::async_trait;

use taskboard_core::registry::RepositoryContext;
use taskboard_core::result::AppResult;
use taskboard_entity::user::{USER_PERSISTENCE, User, UserRepository};

use crate::mixin::PostgresRepository;

pub type PostgresUserRepository = PostgresRepository<User>;

pub fn user_repository(ctx: &RepositoryContext) -> AppResult<Box<dyn UserRepository>> {
    Ok(Box::new(PostgresUserRepository::new(&USER_PERSISTENCE, ctx)))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.find_one(&[self.active_by("username", username)?]).await
    }

    async fn by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one(&[self.active_by("email", email)?]).await
    }
}
