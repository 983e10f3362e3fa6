//! Bookkeeping columns shared by every persisted entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::Record;
use super::value::SqlValue;
use crate::result::AppResult;

/// Column names carried by every entity table.
pub const DATA_FIELDS: [&str; 5] = ["id", "created_at", "updated_at", "deleted_at", "is_activated"];

/// Identity and lifecycle state of a persisted entity.
///
/// Rows are never physically removed: a logical delete stamps
/// `deleted_at` and clears `is_activated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryData {
    /// Opaque string identifier. Empty until the backend assigns one.
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_activated: bool,
}

impl RepositoryData {
    /// Fresh, unsaved data. The backend generates the id on insert.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            is_activated: true,
        }
    }

    /// Fresh data with a client-generated UUID v4 id.
    pub fn generate() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ..Self::new()
        }
    }

    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Stamp the logical delete.
    pub fn mark_deleted(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
        self.is_activated = false;
    }

    /// Returns `true` once the entity has been logically deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Value of one of [`DATA_FIELDS`], or `None` for any other name.
    pub fn column(&self, name: &str) -> Option<SqlValue> {
        match name {
            "id" => Some(SqlValue::from(self.id.as_str())),
            "created_at" => Some(SqlValue::from(self.created_at)),
            "updated_at" => Some(SqlValue::from(self.updated_at)),
            "deleted_at" => Some(SqlValue::from(self.deleted_at)),
            "is_activated" => Some(SqlValue::from(self.is_activated)),
            _ => None,
        }
    }

    pub fn from_record(record: &Record) -> AppResult<Self> {
        Ok(Self {
            id: record.string("id")?,
            created_at: record.timestamp("created_at")?,
            updated_at: record.timestamp("updated_at")?,
            deleted_at: record.opt_timestamp("deleted_at")?,
            is_activated: record.boolean("is_activated")?,
        })
    }
}

impl Default for RepositoryData {
    fn default() -> Self {
        Self::new()
    }
}
