//! Task workflow status and priority.

use serde::{Deserialize, Serialize};

use crate::text_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
    Abandoned,
}

text_enum!(TaskStatus, "task status", {
    Todo => "todo",
    Doing => "doing",
    Done => "done",
    Abandoned => "abandoned",
});

impl TaskStatus {
    /// Done and abandoned tasks are closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Done | Self::Abandoned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

text_enum!(Priority, "priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});
