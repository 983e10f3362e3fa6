//! PostgreSQL storage of boards.

use async_trait::async_trait;

use taskboard_core::registry::RepositoryContext;
use taskboard_core::result::AppResult;
use taskboard_core::traits::GetterList;
use taskboard_core::types::{Criteria, Join, Paginator};
use taskboard_entity::board::{
    BOARD_PERSISTENCE, Board, BoardRepository, OWNERSHIP_BOARD_PERSISTENCE,
};

use crate::mixin::PostgresRepository;

pub type PostgresBoardRepository = PostgresRepository<Board>;

pub fn board_repository(ctx: &RepositoryContext) -> AppResult<Box<dyn BoardRepository>> {
    Ok(Box::new(PostgresBoardRepository::new(&BOARD_PERSISTENCE, ctx)))
}

#[async_trait]
impl BoardRepository for PostgresBoardRepository {
    async fn filter_by_member(
        &self,
        user_id: &str,
        criteria: &Criteria,
    ) -> AppResult<Paginator<Board>> {
        let board = BOARD_PERSISTENCE.table_name;
        let ownership = OWNERSHIP_BOARD_PERSISTENCE.table_name;
        let joins = [Join::inner(
            ownership,
            format!("{ownership}.board_id = {board}.id"),
        )];
        let criteria = criteria
            .clone()
            .with_table(board)
            .filter(self.equal(&format!("{board}.is_activated"), true)?)
            .filter(self.equal(&format!("{ownership}.user_id"), user_id)?)
            .filter(self.equal(&format!("{ownership}.is_activated"), true)?);
        self.filter(&criteria, &joins).await
    }
}
