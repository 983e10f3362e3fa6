//! Task entity. Every domain change appends a [`TaskHistory`] entry.

use serde::{Deserialize, Serialize};

use taskboard_core::result::AppResult;
use taskboard_core::traits::{Entity, RepositoryPersistence};
use taskboard_core::types::{Record, RepositoryData, SqlValue};

use super::history::{ChangeSet, HistoryChangeType, TaskHistory};
use super::status::{Priority, TaskStatus};

pub const TASK_PERSISTENCE: RepositoryPersistence = RepositoryPersistence::new(
    "tbl_task",
    &[
        "id",
        "name",
        "board_id",
        "description",
        "owner",
        "status",
        "icon_url",
        "priority",
        "created_at",
        "updated_at",
        "deleted_at",
        "is_activated",
    ],
);

/// Fields of a task that an editor may change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    pub data: RepositoryData,
    pub name: String,
    pub board_id: String,
    pub description: String,
    /// User id of the owner.
    pub owner: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub icon_url: Option<String>,
    /// Changes not yet persisted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub histories: Vec<TaskHistory>,
}

fn change(key: &str, value: Option<String>) -> (String, Option<String>) {
    (key.to_string(), value)
}

impl Task {
    /// New task with a client-side id and its `inserted` history entry.
    pub fn create(
        name: impl Into<String>,
        board_id: impl Into<String>,
        description: impl Into<String>,
        owner: impl Into<String>,
        priority: Priority,
        icon_url: Option<String>,
    ) -> Self {
        let mut task = Self {
            data: RepositoryData::generate(),
            name: name.into(),
            board_id: board_id.into(),
            description: description.into(),
            owner: owner.into(),
            status: TaskStatus::default(),
            priority,
            icon_url,
            histories: Vec::new(),
        };
        let new_values: ChangeSet = [
            change("id", Some(task.data.id.clone())),
            change("name", Some(task.name.clone())),
            change("description", Some(task.description.clone())),
            change("icon_url", task.icon_url.clone()),
            change("owner", Some(task.owner.clone())),
            change("priority", Some(task.priority.to_string())),
            change("board_id", Some(task.board_id.clone())),
        ]
        .into_iter()
        .collect();
        task.record(HistoryChangeType::Inserted, None, Some(new_values));
        task
    }

    fn record(
        &mut self,
        type_of_change: HistoryChangeType,
        previous_values: Option<ChangeSet>,
        new_values: Option<ChangeSet>,
    ) {
        self.histories.push(TaskHistory::new(
            &self.data.id,
            type_of_change,
            previous_values,
            new_values,
        ));
    }

    /// Attach a history entry loaded from storage.
    pub fn inject_history(&mut self, history: TaskHistory) {
        self.histories.push(history);
    }

    /// Drain the recorded changes, typically to persist them.
    pub fn take_histories(&mut self) -> Vec<TaskHistory> {
        std::mem::take(&mut self.histories)
    }

    pub fn require_change(&self, status: TaskStatus) -> bool {
        status != self.status
    }

    /// Returns `false` when the task already had `status`.
    pub fn change_status(&mut self, status: TaskStatus) -> bool {
        if !self.require_change(status) {
            return false;
        }
        self.record(
            HistoryChangeType::Updated,
            Some([change("status", Some(self.status.to_string()))].into()),
            Some([change("status", Some(status.to_string()))].into()),
        );
        self.status = status;
        self.data.touch();
        true
    }

    /// Apply `changes`. Returns `false` when nothing was supplied.
    pub fn update(&mut self, changes: TaskChanges) -> bool {
        let mut previous = ChangeSet::new();
        let mut next = ChangeSet::new();

        if let Some(name) = changes.name {
            previous.insert("name".into(), Some(self.name.clone()));
            next.insert("name".into(), Some(name.clone()));
            self.name = name;
        }
        if let Some(description) = changes.description {
            previous.insert("description".into(), Some(self.description.clone()));
            next.insert("description".into(), Some(description.clone()));
            self.description = description;
        }
        if let Some(icon_url) = changes.icon_url {
            previous.insert("icon_url".into(), self.icon_url.clone());
            next.insert("icon_url".into(), Some(icon_url.clone()));
            self.icon_url = Some(icon_url);
        }
        if let Some(priority) = changes.priority {
            previous.insert("priority".into(), Some(self.priority.to_string()));
            next.insert("priority".into(), Some(priority.to_string()));
            self.priority = priority;
        }

        if next.is_empty() {
            return false;
        }
        self.record(HistoryChangeType::Updated, Some(previous), Some(next));
        self.data.touch();
        true
    }

    /// Returns `false` when `owner` already owns the task.
    pub fn change_owner(&mut self, owner: &str) -> bool {
        if owner == self.owner {
            return false;
        }
        self.record(
            HistoryChangeType::Updated,
            Some([change("owner", Some(self.owner.clone()))].into()),
            Some([change("owner", Some(owner.to_string()))].into()),
        );
        self.owner = owner.to_string();
        self.data.touch();
        true
    }
}

impl Entity for Task {
    fn data(&self) -> &RepositoryData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut RepositoryData {
        &mut self.data
    }

    fn field(&self, name: &str) -> Option<SqlValue> {
        match name {
            "name" => Some(SqlValue::from(&self.name)),
            "board_id" => Some(SqlValue::from(&self.board_id)),
            "description" => Some(SqlValue::from(&self.description)),
            "owner" => Some(SqlValue::from(&self.owner)),
            "status" => Some(SqlValue::from(self.status)),
            "priority" => Some(SqlValue::from(self.priority)),
            "icon_url" => Some(SqlValue::from(self.icon_url.as_ref())),
            _ => None,
        }
    }

    fn from_record(record: &Record) -> AppResult<Self> {
        Ok(Self {
            data: RepositoryData::from_record(record)?,
            name: record.string("name")?,
            board_id: record.string("board_id")?,
            description: record.string("description")?,
            owner: record.string("owner")?,
            status: record.parse("status")?,
            priority: record.parse("priority")?,
            icon_url: record.opt_string("icon_url")?,
            histories: Vec::new(),
        })
    }
}
