//! Board membership roles.

use serde::{Deserialize, Serialize};

use crate::text_enum;

/// What a member may do on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Editor,
    #[default]
    Viewer,
    Admin,
}

text_enum!(MemberRole, "member role", {
    Editor => "editor",
    Viewer => "viewer",
    Admin => "admin",
});

impl MemberRole {
    /// Editors and admins may add and change tasks.
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Editor | Self::Admin)
    }
}

/// A user's membership of a board.
///
/// Two members are the same membership when user and board match,
/// whatever their roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardMember {
    pub user_id: String,
    pub board_id: String,
    #[serde(default)]
    pub role: MemberRole,
}

impl BoardMember {
    pub fn new(user_id: impl Into<String>, board_id: impl Into<String>, role: MemberRole) -> Self {
        Self {
            user_id: user_id.into(),
            board_id: board_id.into(),
            role,
        }
    }
}

impl PartialEq for BoardMember {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id && self.board_id == other.board_id
    }
}

impl Eq for BoardMember {}
