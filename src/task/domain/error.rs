//! Error types for task domain validation and lifecycle transitions.

use super::{TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing or mutating tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title is longer than the stored column allows.
    #[error("task title is {length} characters, at most {max} allowed")]
    TitleTooLong {
        /// Characters in the rejected title.
        length: usize,
        /// Longest accepted title.
        max: usize,
    },

    /// An attachment reference is malformed.
    #[error("invalid attachment reference '{0}'")]
    InvalidAttachment(String),

    /// The rating is outside `1..=5`.
    #[error("invalid rating {0}, expected 1 to 5")]
    InvalidRating(u8),

    /// Review feedback is empty after trimming.
    #[error("review feedback must not be empty")]
    EmptyFeedback,

    /// The deadline lies before the current time.
    #[error("deadline {deadline} is in the past")]
    DeadlineInPast {
        /// The rejected deadline.
        deadline: DateTime<Utc>,
    },

    /// The requested status change is not a permitted lifecycle step.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// Review was attempted on a task that is not completed.
    #[error("task {task_id} is {current}; only completed tasks can be reviewed")]
    NotReviewable {
        /// Task identifier.
        task_id: TaskId,
        /// Current status.
        current: TaskStatus,
    },

    /// The task has been reviewed and is frozen.
    #[error("task {0} has been reviewed and can no longer change")]
    TaskFinalized(TaskId),
}

impl TaskDomainError {
    /// Returns `true` for errors caused by the task's current lifecycle
    /// state rather than by malformed input.
    #[must_use]
    pub const fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatusTransition { .. }
                | Self::NotReviewable { .. }
                | Self::TaskFinalized(_)
        )
    }
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);
