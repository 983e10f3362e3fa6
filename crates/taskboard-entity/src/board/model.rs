//! Board entity and its membership rules.

use serde::{Deserialize, Serialize};

use taskboard_core::error::AppError;
use taskboard_core::result::AppResult;
use taskboard_core::traits::{Entity, RepositoryPersistence};
use taskboard_core::types::{Record, RepositoryData, SqlValue};

use super::member::{BoardMember, MemberRole};

pub const BOARD_PERSISTENCE: RepositoryPersistence = RepositoryPersistence::new(
    "tbl_board",
    &[
        "id",
        "name",
        "description",
        "icon_url",
        "created_at",
        "updated_at",
        "deleted_at",
        "is_activated",
    ],
);

/// Fields of a board that a member may change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
}

impl BoardChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.icon_url.is_none()
    }
}

/// A board groups tasks and the members allowed to work on them.
///
/// Members live in their own table and are attached with
/// [`Board::inject_member`] after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(flatten)]
    pub data: RepositoryData,
    pub name: String,
    pub description: String,
    pub icon_url: Option<String>,
    #[serde(default)]
    pub members: Vec<BoardMember>,
}

impl Board {
    /// New board with a client-side id, administered by `owner_id`.
    pub fn create(
        name: impl Into<String>,
        description: impl Into<String>,
        owner_id: impl Into<String>,
        icon_url: Option<String>,
    ) -> Self {
        let data = RepositoryData::generate();
        let members = vec![BoardMember::new(owner_id, data.id.clone(), MemberRole::Admin)];
        Self {
            data,
            name: name.into(),
            description: description.into(),
            icon_url,
            members,
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    pub fn member(&self, user_id: &str) -> AppResult<&BoardMember> {
        self.members
            .iter()
            .find(|m| m.user_id == user_id)
            .ok_or_else(|| {
                AppError::authorization(format!(
                    "Member {user_id} is not a member of board {}",
                    self.data.id
                ))
            })
    }

    pub fn is_editor(&self, user_id: &str) -> AppResult<bool> {
        Ok(self.member(user_id)?.role.can_edit())
    }

    /// Non-members are never admins.
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.member(user_id)
            .map(|m| m.role == MemberRole::Admin)
            .unwrap_or(false)
    }

    fn ensure_admin(&self, user_id: &str, action: &str) -> AppResult<()> {
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(AppError::authorization(format!("Only Admin can {action}")))
        }
    }

    /// Fails unless `user_id` may add tasks to this board.
    pub fn ensure_editor(&self, user_id: &str) -> AppResult<()> {
        if self.is_editor(user_id)? {
            Ok(())
        } else {
            Err(AppError::authorization("Only Editor can add task"))
        }
    }

    /// Attach a member loaded from storage, without permission checks.
    pub fn inject_member(&mut self, member: BoardMember) {
        self.members.push(member);
    }

    pub fn add_member(&mut self, member: BoardMember, by: &str) -> AppResult<()> {
        self.ensure_admin(by, "add members")?;
        if self.is_member(&member.user_id) {
            return Err(AppError::conflict(format!(
                "Member {} already in board {}",
                member.user_id, self.data.id
            )));
        }
        self.members.push(member);
        Ok(())
    }

    pub fn remove_member(&mut self, user_id: &str, by: &str) -> AppResult<BoardMember> {
        self.ensure_admin(by, "remove members")?;
        if user_id == by {
            return Err(AppError::validation("Admin cannot remove themselves"));
        }
        let position = self
            .members
            .iter()
            .position(|m| m.user_id == user_id)
            .ok_or_else(|| {
                AppError::validation(format!("Member {user_id} is not in board {}", self.data.id))
            })?;
        Ok(self.members.remove(position))
    }

    /// Returns `false` when the member already had `role`.
    pub fn update_role_member(&mut self, by: &str, user_id: &str, role: MemberRole) -> AppResult<bool> {
        self.ensure_admin(by, "update role member")?;
        let member = self
            .members
            .iter_mut()
            .find(|m| m.user_id == user_id)
            .ok_or_else(|| AppError::authorization(format!("Member {user_id} not found")))?;
        if member.role == role {
            return Ok(false);
        }
        member.role = role;
        Ok(true)
    }

    /// Apply `changes`. Returns `false` when there was nothing to change.
    pub fn update(&mut self, by: &str, changes: BoardChanges) -> AppResult<bool> {
        if changes.is_empty() {
            return Ok(false);
        }
        self.member(by)?;
        self.ensure_admin(by, "update board")?;

        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if changes.icon_url.is_some() {
            self.icon_url = changes.icon_url;
        }
        self.data.touch();
        Ok(true)
    }

    /// Logical delete, admins only.
    pub fn delete(&mut self, by: &str) -> AppResult<()> {
        self.ensure_admin(by, "delete board")?;
        self.data.mark_deleted();
        Ok(())
    }
}

impl Entity for Board {
    fn data(&self) -> &RepositoryData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut RepositoryData {
        &mut self.data
    }

    fn field(&self, name: &str) -> Option<SqlValue> {
        match name {
            "name" => Some(SqlValue::from(&self.name)),
            "description" => Some(SqlValue::from(&self.description)),
            "icon_url" => Some(SqlValue::from(self.icon_url.as_ref())),
            _ => None,
        }
    }

    fn from_record(record: &Record) -> AppResult<Self> {
        Ok(Self {
            data: RepositoryData::from_record(record)?,
            name: record.string("name")?,
            description: record.string("description")?,
            icon_url: record.opt_string("icon_url")?,
            members: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::error::ErrorKind;

    fn board() -> Board {
        Board::create("Roadmap", "Q3 work", "owner", None)
    }

    #[test]
    fn test_creator_is_admin() {
        let board = board();
        assert!(board.is_admin("owner"));
        assert_eq!(board.members[0].board_id, board.data.id);
        assert!(!board.is_admin("stranger"));
    }

    #[test]
    fn test_add_member_requires_admin() {
        let mut board = board();
        let id = board.data.id.clone();
        board
            .add_member(BoardMember::new("bob", &id, MemberRole::Viewer), "owner")
            .unwrap();
        let err = board
            .add_member(BoardMember::new("carol", &id, MemberRole::Viewer), "bob")
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
        let err = board
            .add_member(BoardMember::new("bob", &id, MemberRole::Editor), "owner")
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
    }

    #[test]
    fn test_remove_member_rules() {
        let mut board = board();
        let id = board.data.id.clone();
        board.inject_member(BoardMember::new("bob", &id, MemberRole::Editor));
        assert!(board.remove_member("owner", "owner").is_err());
        assert!(board.remove_member("nobody", "owner").is_err());
        let removed = board.remove_member("bob", "owner").unwrap();
        assert_eq!(removed.user_id, "bob");
        assert!(!board.is_member("bob"));
    }

    #[test]
    fn test_editor_rules() {
        let mut board = board();
        let id = board.data.id.clone();
        board.inject_member(BoardMember::new("viewer", &id, MemberRole::Viewer));
        assert!(board.ensure_editor("owner").is_ok());
        assert!(board.ensure_editor("viewer").is_err());
        assert!(board.ensure_editor("stranger").is_err());
        assert!(board.update_role_member("owner", "viewer", MemberRole::Editor).unwrap());
        assert!(!board.update_role_member("owner", "viewer", MemberRole::Editor).unwrap());
        assert!(board.ensure_editor("viewer").is_ok());
    }

    #[test]
    fn test_update_and_delete() {
        let mut board = board();
        assert!(!board.update("owner", BoardChanges::default()).unwrap());
        let changes = BoardChanges {
            name: Some("Renamed".into()),
            ..BoardChanges::default()
        };
        assert!(board.update("stranger", changes.clone()).is_err());
        assert!(board.update("owner", changes).unwrap());
        assert_eq!(board.name, "Renamed");

        board.delete("owner").unwrap();
        assert!(!board.data.is_activated);
        assert!(board.data.deleted_at.is_some());
    }
}
