//! Task lifecycle status and its transition table.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// Tasks move strictly forward through
/// `Pending → InProgress → Completed → Reviewed`, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Assigned but not started.
    Pending,
    /// Being worked on by the assignee.
    InProgress,
    /// Finished by the assignee, awaiting the assigner's review.
    Completed,
    /// Reviewed by the assigner. Terminal.
    Reviewed,
}

impl TaskStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Reviewed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Reviewed => "reviewed",
        }
    }

    /// Returns the human-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Reviewed => "Reviewed",
        }
    }

    /// Returns the status that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed => Some(Self::Reviewed),
            Self::Reviewed => None,
        }
    }

    /// Returns `true` when no further mutation is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Reviewed)
    }

    /// Returns `true` for statuses the assignee may set.
    #[must_use]
    pub const fn is_assignee_settable(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress | Self::Completed)
    }

    /// Returns whether the assignee may move a task from `self` to `target`.
    ///
    /// Staying on the current status is allowed (attachments only) unless the
    /// task is terminal. Otherwise only the immediate successor is reachable,
    /// and `Reviewed` never is.
    #[must_use]
    pub const fn assignee_can_move_to(self, target: Self) -> bool {
        if self.is_terminal() || !target.is_assignee_settable() {
            return false;
        }
        match (self, target) {
            (Self::Pending, Self::Pending | Self::InProgress)
            | (Self::InProgress, Self::InProgress | Self::Completed)
            | (Self::Completed, Self::Completed) => true,
            _ => false,
        }
    }

    /// Returns whether the assigner may review a task in this status.
    #[must_use]
    pub const fn is_reviewable(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    /// Accepts the storage form (`in_progress`) and the label form
    /// (`In Progress`), case-insensitively.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "reviewed" => Ok(Self::Reviewed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
