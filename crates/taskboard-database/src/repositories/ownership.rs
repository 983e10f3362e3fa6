//! PostgreSQL storage of board memberships.

use async_trait::async_trait;

use taskboard_core::registry::RepositoryContext;
use taskboard_core::result::AppResult;
use taskboard_core::types::OrderKind;
use taskboard_entity::board::{
    OWNERSHIP_BOARD_PERSISTENCE, OwnershipBoard, OwnershipBoardRepository,
};

use crate::mixin::PostgresRepository;

pub type PostgresOwnershipBoardRepository = PostgresRepository<OwnershipBoard>;

pub fn ownership_board_repository(
    ctx: &RepositoryContext,
) -> AppResult<Box<dyn OwnershipBoardRepository>> {
    Ok(Box::new(PostgresOwnershipBoardRepository::new(
        &OWNERSHIP_BOARD_PERSISTENCE,
        ctx,
    )))
}

#[async_trait]
impl OwnershipBoardRepository for PostgresOwnershipBoardRepository {
    async fn by_board_id(&self, board_id: &str) -> AppResult<Vec<OwnershipBoard>> {
        let oldest_first = self.filter_builder().order(OrderKind::Asc, "created_at")?;
        self.find_all(&[self.active_by("board_id", board_id)?], &[oldest_first])
            .await
    }
}
