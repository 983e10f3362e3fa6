//! Profile attached to a user account.

use serde::{Deserialize, Serialize};

use taskboard_core::result::AppResult;
use taskboard_core::traits::{Entity, RepositoryPersistence};
use taskboard_core::types::{Record, RepositoryData, SqlValue};

pub const PROFILE_PERSISTENCE: RepositoryPersistence = RepositoryPersistence::new(
    "tbl_profile",
    &[
        "id",
        "user_id",
        "phone",
        "icon_url",
        "created_at",
        "updated_at",
        "deleted_at",
        "is_activated",
    ],
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(flatten)]
    pub data: RepositoryData,
    pub user_id: String,
    pub phone: String,
    pub icon_url: Option<String>,
}

impl Profile {
    pub fn new(user_id: impl Into<String>, phone: impl Into<String>, icon_url: Option<String>) -> Self {
        Self {
            data: RepositoryData::new(),
            user_id: user_id.into(),
            phone: phone.into(),
            icon_url,
        }
    }
}

impl Entity for Profile {
    fn data(&self) -> &RepositoryData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut RepositoryData {
        &mut self.data
    }

    fn field(&self, name: &str) -> Option<SqlValue> {
        match name {
            "user_id" => Some(SqlValue::from(&self.user_id)),
            "phone" => Some(SqlValue::from(&self.phone)),
            "icon_url" => Some(SqlValue::from(self.icon_url.as_ref())),
            _ => None,
        }
    }

    fn from_record(record: &Record) -> AppResult<Self> {
        Ok(Self {
            data: RepositoryData::from_record(record)?,
            user_id: record.string("user_id")?,
            phone: record.string("phone")?,
            icon_url: record.opt_string("icon_url")?,
        })
    }
}
