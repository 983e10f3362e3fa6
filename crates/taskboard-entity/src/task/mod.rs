//! Task domain entities.

pub mod history;
pub mod model;
pub mod repository;
pub mod status;

pub use history::{ChangeSet, HistoryChangeType, TASK_HISTORY_PERSISTENCE, TaskHistory};
pub use model::{TASK_PERSISTENCE, Task, TaskChanges};
pub use repository::{TaskHistoryRepository, TaskRepository};
pub use status::{Priority, TaskStatus};
