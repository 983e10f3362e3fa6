//! PostgreSQL storage of tasks and their history.

use async_trait::async_trait;

use taskboard_core::registry::RepositoryContext;
use taskboard_core::result::AppResult;
use taskboard_core::traits::GetterList;
use taskboard_core::types::{Criteria, OrderKind, Paginator};
use taskboard_entity::task::{
    TASK_HISTORY_PERSISTENCE, TASK_PERSISTENCE, Task, TaskHistory, TaskHistoryRepository,
    TaskRepository,
};

use crate::mixin::PostgresRepository;

pub type PostgresTaskRepository = PostgresRepository<Task>;
pub type PostgresTaskHistoryRepository = PostgresRepository<TaskHistory>;

pub fn task_repository(ctx: &RepositoryContext) -> AppResult<Box<dyn TaskRepository>> {
    Ok(Box::new(PostgresTaskRepository::new(&TASK_PERSISTENCE, ctx)))
}

pub fn task_history_repository(
    ctx: &RepositoryContext,
) -> AppResult<Box<dyn TaskHistoryRepository>> {
    Ok(Box::new(PostgresTaskHistoryRepository::new(
        &TASK_HISTORY_PERSISTENCE,
        ctx,
    )))
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn by_board_id(&self, board_id: &str, criteria: &Criteria) -> AppResult<Paginator<Task>> {
        let criteria = criteria
            .clone()
            .filter(self.active_by("board_id", board_id)?);
        self.filter(&criteria, &[]).await
    }
}

#[async_trait]
impl TaskHistoryRepository for PostgresTaskHistoryRepository {
    async fn by_task_id(&self, task_id: &str) -> AppResult<Vec<TaskHistory>> {
        let oldest_first = self.filter_builder().order(OrderKind::Asc, "changed_at")?;
        self.find_all(&[self.active_by("task_id", task_id)?], &[oldest_first])
            .await
    }
}
