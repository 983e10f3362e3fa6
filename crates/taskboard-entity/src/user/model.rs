//! User entity model.

use serde::{Deserialize, Serialize};

use taskboard_core::result::AppResult;
use taskboard_core::traits::{Entity, RepositoryPersistence};
use taskboard_core::types::{Record, RepositoryData, Secret, SqlValue};

use super::permission::{Permission, Role, join_permissions, split_permissions};

/// Table and column layout of [`User`].
pub const USER_PERSISTENCE: RepositoryPersistence = RepositoryPersistence::new(
    "tbl_user",
    &[
        "id",
        "name",
        "last_name",
        "username",
        "email",
        "password",
        "permissions",
        "created_at",
        "updated_at",
        "deleted_at",
        "is_activated",
    ],
);

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub data: RepositoryData,
    /// First name.
    pub name: String,
    pub last_name: String,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password: Secret,
    pub permissions: Vec<Permission>,
}

impl User {
    /// New, unsaved user holding every permission of `role`.
    pub fn new(
        name: impl Into<String>,
        last_name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            data: RepositoryData::new(),
            name: name.into(),
            last_name: last_name.into(),
            username: username.into(),
            email: email.into(),
            password: Secret::new(password_hash),
            permissions: role.permissions(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn is_admin(&self) -> bool {
        self.has_permission(Permission::RoleAdmin)
    }
}

impl Entity for User {
    fn data(&self) -> &RepositoryData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut RepositoryData {
        &mut self.data
    }

    fn field(&self, name: &str) -> Option<SqlValue> {
        match name {
            "name" => Some(SqlValue::from(&self.name)),
            "last_name" => Some(SqlValue::from(&self.last_name)),
            "username" => Some(SqlValue::from(&self.username)),
            "email" => Some(SqlValue::from(&self.email)),
            "password" => Some(SqlValue::from(&self.password)),
            "permissions" => Some(SqlValue::from(join_permissions(&self.permissions))),
            _ => None,
        }
    }

    fn from_record(record: &Record) -> AppResult<Self> {
        Ok(Self {
            data: RepositoryData::from_record(record)?,
            name: record.string("name")?,
            last_name: record.string("last_name")?,
            username: record.string("username")?,
            email: record.string("email")?,
            password: Secret::new(record.string("password")?),
            permissions: split_permissions(&record.string("permissions")?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new("Alice", "Liddell", "alice", "alice@example.com", "$argon2id$x", Role::Admin)
    }

    #[test]
    fn test_every_persisted_column_is_readable() {
        let user = alice();
        for field in USER_PERSISTENCE.fields {
            assert!(user.column(field).is_ok(), "column {field}");
        }
        assert!(user.column("role").is_err());
    }

    #[test]
    fn test_permissions_stored_as_text() {
        let user = alice();
        assert_eq!(
            user.column("permissions").unwrap(),
            SqlValue::Text("role:admin,profile:get,profile:update".into())
        );
        assert!(user.is_admin());
    }

    #[test]
    fn test_from_record() {
        let user = alice();
        let record: Record = USER_PERSISTENCE
            .fields
            .iter()
            .map(|f| (f.to_string(), user.column(f).unwrap()))
            .collect();
        assert_eq!(User::from_record(&record).unwrap(), user);
    }

    #[test]
    fn test_password_never_serialized() {
        let json = serde_json::to_string(&alice()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }
}
