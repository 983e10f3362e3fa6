//! Board domain entities.

pub mod member;
pub mod model;
pub mod ownership;
pub mod repository;

pub use member::{BoardMember, MemberRole};
pub use model::{BOARD_PERSISTENCE, Board, BoardChanges};
pub use ownership::{OWNERSHIP_BOARD_PERSISTENCE, OwnershipBoard};
pub use repository::{BoardRepository, OwnershipBoardRepository};
