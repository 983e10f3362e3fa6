//! Abstract repositories for boards and their members.

use async_trait::async_trait;

use taskboard_core::result::AppResult;
use taskboard_core::traits::CrudRepository;
use taskboard_core::types::{Criteria, Paginator};

use super::model::Board;
use super::ownership::OwnershipBoard;

#[async_trait]
pub trait BoardRepository: CrudRepository<Board> {
    /// Boards where `user_id` holds an active membership, narrowed further
    /// by `criteria`.
    async fn filter_by_member(
        &self,
        user_id: &str,
        criteria: &Criteria,
    ) -> AppResult<Paginator<Board>>;
}

#[async_trait]
pub trait OwnershipBoardRepository: CrudRepository<OwnershipBoard> {
    /// Every active membership row of a board.
    async fn by_board_id(&self, board_id: &str) -> AppResult<Vec<OwnershipBoard>>;
}
