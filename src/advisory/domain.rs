//! Advisory request and response values.

use crate::task::domain::{Priority, Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task facts handed to the advisory provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisoryRequest {
    /// Task title.
    pub title: String,
    /// Task description, if any.
    pub description: Option<String>,
    /// Current priority.
    pub priority: Priority,
    /// Current status.
    pub status: TaskStatus,
    /// Due date.
    pub deadline: DateTime<Utc>,
}

impl From<&Task> for AdvisoryRequest {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            priority: task.priority(),
            status: task.status(),
            deadline: task.deadline(),
        }
    }
}

/// Non-authoritative suggestion returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Short plan or summary for the task.
    pub summary: String,
    /// Priority the provider would assign, if it has an opinion.
    pub priority_hint: Option<Priority>,
    /// Free-text assessment of whether the deadline is realistic.
    pub feasibility: String,
}
