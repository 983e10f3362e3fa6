//! Roles and the permissions they grant.

use serde::{Deserialize, Serialize};

use crate::text_enum;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
}

text_enum!(Role, "role", {
    Client => "client",
    Admin => "admin",
});

impl Role {
    /// Permission token marking an account as having this role.
    pub fn as_permission(&self) -> Permission {
        match self {
            Self::Client => Permission::RoleClient,
            Self::Admin => Permission::RoleAdmin,
        }
    }

    /// Every permission granted by this role, role token first.
    pub fn permissions(&self) -> Vec<Permission> {
        let mut granted = vec![self.as_permission()];
        granted.extend([Permission::GetProfile, Permission::UpdateProfile]);
        granted
    }
}

/// A permission token stored on the user and placed in token audiences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "role:client")]
    RoleClient,
    #[serde(rename = "role:admin")]
    RoleAdmin,
    #[serde(rename = "profile:get")]
    GetProfile,
    #[serde(rename = "profile:update")]
    UpdateProfile,
}

text_enum!(Permission, "permission", {
    RoleClient => "role:client",
    RoleAdmin => "role:admin",
    GetProfile => "profile:get",
    UpdateProfile => "profile:update",
});

/// Join permissions into the comma-separated form kept in the
/// `permissions` column.
pub fn join_permissions(permissions: &[Permission]) -> String {
    permissions
        .iter()
        .map(Permission::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the comma-separated `permissions` column. Empty input yields no
/// permissions.
pub fn split_permissions(raw: &str) -> Result<Vec<Permission>, taskboard_core::AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_permissions() {
        let granted = Role::Admin.permissions();
        assert_eq!(granted[0], Permission::RoleAdmin);
        assert!(granted.contains(&Permission::UpdateProfile));
    }

    #[test]
    fn test_column_round_trip() {
        let granted = Role::Client.permissions();
        let raw = join_permissions(&granted);
        assert_eq!(raw, "role:client,profile:get,profile:update");
        assert_eq!(split_permissions(&raw).unwrap(), granted);
        assert!(split_permissions("").unwrap().is_empty());
        assert!(split_permissions("profile:delete").is_err());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }
}
