//! Pure aggregation over task slices.

use crate::task::domain::{Task, TaskStatus};
use serde::Serialize;

/// Counts over the tasks a manager assigned.
///
/// `pending + in_progress + pending_review + completed == total_assigned`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManagerTaskStats {
    /// Every task the manager assigned.
    pub total_assigned: usize,
    /// Tasks not yet started.
    pub pending: usize,
    /// Tasks being worked on.
    pub in_progress: usize,
    /// Completed tasks awaiting review.
    pub pending_review: usize,
    /// Reviewed tasks.
    pub completed: usize,
}

/// Counts over the tasks assigned to an employee.
///
/// `completed` covers both completed and reviewed tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeTaskStats {
    /// Every task assigned to the employee.
    pub total_tasks: usize,
    /// Tasks not yet started.
    pub pending: usize,
    /// Tasks being worked on.
    pub in_progress: usize,
    /// Completed or reviewed tasks.
    pub completed: usize,
}

/// Statistics view chosen by the caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum TaskStatistics {
    /// Assigner view.
    Manager(ManagerTaskStats),
    /// Assignee view.
    Employee(EmployeeTaskStats),
}

/// Summarizes tasks from the assigner's side.
#[must_use]
pub fn summarize_assigned(tasks: &[Task]) -> ManagerTaskStats {
    tasks
        .iter()
        .fold(ManagerTaskStats::default(), |mut stats, task| {
            stats.total_assigned += 1;
            match task.status() {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.pending_review += 1,
                TaskStatus::Reviewed => stats.completed += 1,
            }
            stats
        })
}

/// Summarizes tasks from the assignee's side.
#[must_use]
pub fn summarize_received(tasks: &[Task]) -> EmployeeTaskStats {
    tasks
        .iter()
        .fold(EmployeeTaskStats::default(), |mut stats, task| {
            stats.total_tasks += 1;
            match task.status() {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed | TaskStatus::Reviewed => stats.completed += 1,
            }
            stats
        })
}
