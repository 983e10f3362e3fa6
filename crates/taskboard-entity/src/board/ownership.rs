//! Stored board membership rows.

use serde::{Deserialize, Serialize};

use taskboard_core::result::AppResult;
use taskboard_core::traits::{Entity, RepositoryPersistence};
use taskboard_core::types::{Record, RepositoryData, SqlValue};

use super::member::{BoardMember, MemberRole};

pub const OWNERSHIP_BOARD_PERSISTENCE: RepositoryPersistence = RepositoryPersistence::new(
    "tbl_ownership_board",
    &[
        "id",
        "board_id",
        "user_id",
        "role",
        "created_at",
        "updated_at",
        "deleted_at",
        "is_activated",
    ],
);

/// One row of `tbl_ownership_board`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipBoard {
    #[serde(flatten)]
    pub data: RepositoryData,
    pub board_id: String,
    pub user_id: String,
    pub role: MemberRole,
}

impl OwnershipBoard {
    pub fn new(board_id: impl Into<String>, user_id: impl Into<String>, role: MemberRole) -> Self {
        Self {
            data: RepositoryData::new(),
            board_id: board_id.into(),
            user_id: user_id.into(),
            role,
        }
    }
}

impl From<&BoardMember> for OwnershipBoard {
    fn from(member: &BoardMember) -> Self {
        Self::new(&member.board_id, &member.user_id, member.role)
    }
}

impl From<&OwnershipBoard> for BoardMember {
    fn from(row: &OwnershipBoard) -> Self {
        BoardMember::new(&row.user_id, &row.board_id, row.role)
    }
}

impl Entity for OwnershipBoard {
    fn data(&self) -> &RepositoryData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut RepositoryData {
        &mut self.data
    }

    fn field(&self, name: &str) -> Option<SqlValue> {
        match name {
            "board_id" => Some(SqlValue::from(&self.board_id)),
            "user_id" => Some(SqlValue::from(&self.user_id)),
            "role" => Some(SqlValue::from(self.role)),
            _ => None,
        }
    }

    fn from_record(record: &Record) -> AppResult<Self> {
        Ok(Self {
            data: RepositoryData::from_record(record)?,
            board_id: record.string("board_id")?,
            user_id: record.string("user_id")?,
            role: record.parse("role")?,
        })
    }
}
