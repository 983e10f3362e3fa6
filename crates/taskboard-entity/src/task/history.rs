//! Audit trail of task changes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use taskboard_core::result::AppResult;
use taskboard_core::traits::{Entity, RepositoryPersistence};
use taskboard_core::types::{Record, RepositoryData, SqlValue};

use crate::text_enum;

pub const TASK_HISTORY_PERSISTENCE: RepositoryPersistence = RepositoryPersistence::new(
    "tbl_history_task",
    &[
        "id",
        "task_id",
        "changed_at",
        "type_of_change",
        "previous_values",
        "new_values",
        "created_at",
        "updated_at",
        "deleted_at",
        "is_activated",
    ],
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryChangeType {
    Inserted,
    Updated,
    Deleted,
}

text_enum!(HistoryChangeType, "history change type", {
    Inserted => "inserted",
    Updated => "updated",
    Deleted => "deleted",
});

/// Attribute name to its textual value; `None` when the attribute was unset.
pub type ChangeSet = BTreeMap<String, Option<String>>;

/// One recorded change of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskHistory {
    #[serde(flatten)]
    pub data: RepositoryData,
    pub task_id: String,
    pub changed_at: DateTime<Utc>,
    pub type_of_change: HistoryChangeType,
    pub previous_values: Option<ChangeSet>,
    pub new_values: Option<ChangeSet>,
}

impl TaskHistory {
    pub fn new(
        task_id: impl Into<String>,
        type_of_change: HistoryChangeType,
        previous_values: Option<ChangeSet>,
        new_values: Option<ChangeSet>,
    ) -> Self {
        Self {
            data: RepositoryData::generate(),
            task_id: task_id.into(),
            changed_at: Utc::now(),
            type_of_change,
            previous_values,
            new_values,
        }
    }
}

fn change_set_to_json(values: &ChangeSet) -> Value {
    Value::Object(
        values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone().map_or(Value::Null, Value::String)))
            .collect(),
    )
}

fn change_set_column(values: Option<&ChangeSet>) -> SqlValue {
    SqlValue::from(values.map(change_set_to_json))
}

fn change_set_from_json(value: Option<Value>) -> AppResult<Option<ChangeSet>> {
    value.map(serde_json::from_value).transpose().map_err(Into::into)
}

impl Entity for TaskHistory {
    fn data(&self) -> &RepositoryData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut RepositoryData {
        &mut self.data
    }

    fn field(&self, name: &str) -> Option<SqlValue> {
        match name {
            "task_id" => Some(SqlValue::from(&self.task_id)),
            "changed_at" => Some(SqlValue::from(self.changed_at)),
            "type_of_change" => Some(SqlValue::from(self.type_of_change)),
            "previous_values" => Some(change_set_column(self.previous_values.as_ref())),
            "new_values" => Some(change_set_column(self.new_values.as_ref())),
            _ => None,
        }
    }

    fn from_record(record: &Record) -> AppResult<Self> {
        Ok(Self {
            data: RepositoryData::from_record(record)?,
            task_id: record.string("task_id")?,
            changed_at: record.timestamp("changed_at")?,
            type_of_change: record.parse("type_of_change")?,
            previous_values: change_set_from_json(record.opt_json("previous_values")?)?,
            new_values: change_set_from_json(record.opt_json("new_values")?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_set_stored_as_json() {
        let mut previous = ChangeSet::new();
        previous.insert("icon_url".into(), None);
        let history = TaskHistory::new("t1", HistoryChangeType::Updated, Some(previous), None);
        assert_eq!(
            history.column("previous_values").unwrap(),
            SqlValue::Json(serde_json::json!({"icon_url": null}))
        );
        assert!(history.column("new_values").unwrap().is_null());
    }

    #[test]
    fn test_from_record() {
        let mut new_values = ChangeSet::new();
        new_values.insert("status".into(), Some("done".into()));
        let history = TaskHistory::new("t1", HistoryChangeType::Updated, None, Some(new_values));
        let record: Record = TASK_HISTORY_PERSISTENCE
            .fields
            .iter()
            .map(|f| (f.to_string(), history.column(f).unwrap()))
            .collect();
        assert_eq!(TaskHistory::from_record(&record).unwrap(), history);
    }
}
