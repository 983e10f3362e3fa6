//! Abstract repositories for tasks and their history.

use async_trait::async_trait;

use taskboard_core::result::AppResult;
use taskboard_core::traits::CrudRepository;
use taskboard_core::types::{Criteria, Paginator};

use super::history::TaskHistory;
use super::model::Task;

#[async_trait]
pub trait TaskRepository: CrudRepository<Task> {
    /// Active tasks of a board, narrowed by `criteria`.
    async fn by_board_id(&self, board_id: &str, criteria: &Criteria) -> AppResult<Paginator<Task>>;
}

#[async_trait]
pub trait TaskHistoryRepository: CrudRepository<TaskHistory> {
    /// Full history of a task, oldest change first.
    async fn by_task_id(&self, task_id: &str) -> AppResult<Vec<TaskHistory>>;
}
