//! PostgreSQL storage of user profiles.

use async_trait::async_trait;

use taskboard_core::registry::RepositoryContext;
use taskboard_core::result::AppResult;
use taskboard_entity::user::{PROFILE_PERSISTENCE, Profile, ProfileRepository};

use crate::mixin::PostgresRepository;

pub type PostgresProfileRepository = PostgresRepository<Profile>;

pub fn profile_repository(ctx: &RepositoryContext) -> AppResult<Box<dyn ProfileRepository>> {
    Ok(Box::new(PostgresProfileRepository::new(&PROFILE_PERSISTENCE, ctx)))
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn by_user_id(&self, user_id: &str) -> AppResult<Option<Profile>> {
        self.find_one(&[self.active_by("user_id", user_id)?]).await
    }
}
