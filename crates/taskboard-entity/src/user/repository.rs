//! Abstract repositories for the security module.

use async_trait::async_trait;

use taskboard_core::result::AppResult;
use taskboard_core::traits::CrudRepository;

use super::model::User;
use super::profile::Profile;

/// Storage of [`User`] accounts.
#[async_trait]
pub trait UserRepository: CrudRepository<User> {
    /// Active user with this username, if any.
    async fn by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Active user with this email, if any.
    async fn by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Storage of [`Profile`]s.
#[async_trait]
pub trait ProfileRepository: CrudRepository<Profile> {
    async fn by_user_id(&self, user_id: &str) -> AppResult<Option<Profile>>;
}
