//! PostgreSQL repositories and their registration.
//!
//! Each module contributes a [`RepositoryGetter`] binding its abstract
//! repository traits to the PostgreSQL implementations; the application
//! merges them into one resolver.

pub mod board;
pub mod ownership;
pub mod profile;
pub mod task;
pub mod user;

use std::sync::Arc;

use taskboard_core::registry::RepositoryGetter;
use taskboard_core::types::FilterBuilder;
use taskboard_entity::board::{BoardRepository, OwnershipBoardRepository};
use taskboard_entity::task::{TaskHistoryRepository, TaskRepository};
use taskboard_entity::user::{ProfileRepository, UserRepository};

pub use board::PostgresBoardRepository;
pub use ownership::PostgresOwnershipBoardRepository;
pub use profile::PostgresProfileRepository;
pub use task::{PostgresTaskHistoryRepository, PostgresTaskRepository};
pub use user::PostgresUserRepository;

/// Users and profiles.
pub fn security_repositories(filter_builder: Arc<FilterBuilder>) -> RepositoryGetter {
    RepositoryGetter::new(filter_builder)
        .with::<dyn UserRepository, _>(user::user_repository)
        .with::<dyn ProfileRepository, _>(profile::profile_repository)
}

/// Boards, memberships, tasks, and task history.
pub fn task_repositories(filter_builder: Arc<FilterBuilder>) -> RepositoryGetter {
    RepositoryGetter::new(filter_builder)
        .with::<dyn BoardRepository, _>(board::board_repository)
        .with::<dyn OwnershipBoardRepository, _>(ownership::ownership_board_repository)
        .with::<dyn TaskRepository, _>(task::task_repository)
        .with::<dyn TaskHistoryRepository, _>(task::task_history_repository)
}

/// Every PostgreSQL repository.
pub fn postgres_repositories(filter_builder: Arc<FilterBuilder>) -> RepositoryGetter {
    security_repositories(Arc::clone(&filter_builder)).merge(task_repositories(filter_builder))
}

#[cfg(test)]
mod tests {
    use taskboard_core::error::ErrorKind;
    use taskboard_core::traits::{Creator, Deleter, Entity, Getter};
    use taskboard_core::types::{Criteria, OrderKind, Record, SqlValue};
    use taskboard_entity::task::{Priority, TASK_PERSISTENCE, Task};
    use taskboard_entity::user::{Role, User};

    use super::*;
    use crate::filter::postgres_filter_builder;
    use crate::testing::ScriptedSession;

    fn getter() -> RepositoryGetter {
        postgres_repositories(Arc::new(postgres_filter_builder()))
    }

    #[test]
    fn test_every_repository_registered() {
        let getter = getter();
        assert!(getter.contains::<dyn UserRepository>());
        assert!(getter.contains::<dyn ProfileRepository>());
        assert!(getter.contains::<dyn BoardRepository>());
        assert!(getter.contains::<dyn OwnershipBoardRepository>());
        assert!(getter.contains::<dyn TaskRepository>());
        assert!(getter.contains::<dyn TaskHistoryRepository>());
        assert_eq!(getter.registered().len(), 6);
    }

    #[test]
    fn test_unregistered_type_fails() {
        let getter = security_repositories(Arc::new(postgres_filter_builder()));
        let session = ScriptedSession::new();
        let err = getter
            .get::<dyn TaskRepository>(&session.handle())
            .err()
            .unwrap();
        assert!(err.is(ErrorKind::Configuration));
        assert!(err.message.contains("TaskRepository"));
    }

    #[tokio::test]
    async fn test_resolved_repositories_share_the_session() {
        let session = ScriptedSession::new();
        let handle = session.handle();
        let getter = getter();
        let users = getter.get::<dyn UserRepository>(&handle).unwrap();
        let tasks = getter.get::<dyn TaskRepository>(&handle).unwrap();

        session.reply_rows(vec![Record::new().with("id", "u-1")]);
        let user = users
            .create(User::new("Ada", "Lovelace", "ada", "ada@example.com", "hash", Role::Client))
            .await
            .unwrap();
        session.reply_affected(1);
        tasks.delete("t-1").await.unwrap();
        handle.commit().await.unwrap();

        assert_eq!(user.data.id, "u-1");
        let executed = session.executed();
        assert!(executed[0].sql.starts_with("INSERT INTO tbl_user"));
        assert!(executed[1].sql.starts_with("UPDATE tbl_task SET deleted_at"));
        assert_eq!(session.commits(), 1);
    }

    #[tokio::test]
    async fn test_by_username_is_active_only() {
        let session = ScriptedSession::new();
        let users = getter().get::<dyn UserRepository>(&session.handle()).unwrap();
        assert!(users.by_username("ghost").await.unwrap().is_none());
        let executed = session.executed();
        assert!(executed[0]
            .sql
            .ends_with("WHERE (username = ?) AND (is_activated = ?) LIMIT 1 OFFSET 0"));
    }

    #[tokio::test]
    async fn test_filter_by_member_joins_ownership() {
        let session = ScriptedSession::new();
        session.reply_total(0);
        let boards = getter().get::<dyn BoardRepository>(&session.handle()).unwrap();
        let criteria = Criteria::default().order_by(
            postgres_filter_builder()
                .order(OrderKind::Asc, "name")
                .unwrap(),
        );
        let page = boards.filter_by_member("u-1", &criteria).await.unwrap();
        assert_eq!(page.total, 0);

        let count = &session.executed()[0];
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) AS total FROM tbl_board \
             INNER JOIN tbl_ownership_board ON tbl_ownership_board.board_id = tbl_board.id \
             WHERE (tbl_board.is_activated = ?) AND (tbl_ownership_board.user_id = ?) \
             AND (tbl_ownership_board.is_activated = ?)"
        );
        assert_eq!(
            count.params,
            vec![SqlValue::Bool(true), SqlValue::from("u-1"), SqlValue::Bool(true)]
        );
    }

    #[tokio::test]
    async fn test_task_round_trip_through_record() {
        let mut task = Task::create("Ship", "b-1", "Release 1.0", "u-1", Priority::High, None);
        task.take_histories();
        let row: Record = TASK_PERSISTENCE
            .fields
            .iter()
            .map(|f| (f.to_string(), task.column(f).unwrap()))
            .collect();

        let session = ScriptedSession::new();
        session.reply_rows(vec![row]);
        let tasks = getter().get::<dyn TaskRepository>(&session.handle()).unwrap();
        let loaded = tasks.get_by_id(&task.data.id).await.unwrap();
        assert_eq!(loaded, task);
    }
}
