//! Task aggregate root.

use super::{
    Attachment, Priority, Rating, TaskDomainError, TaskId, TaskReview, TaskStatus, TaskTitle,
};
use crate::authz::TaskScope;
use crate::identity::domain::{EmployeeId, ManagerId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// Every successful mutation bumps [`Task::version`], which repositories use
/// for optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    assigned_by: ManagerId,
    assigned_to: EmployeeId,
    priority: Priority,
    status: TaskStatus,
    deadline: DateTime<Utc>,
    attachments: Vec<Attachment>,
    review: Option<TaskReview>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for assigning a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: TaskTitle,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Assigning manager.
    pub assigned_by: ManagerId,
    /// Assignee, already verified to be owned by `assigned_by`.
    pub assigned_to: EmployeeId,
    /// Priority.
    pub priority: Priority,
    /// Due date.
    pub deadline: DateTime<Utc>,
    /// Initial attachments.
    pub attachments: Vec<Attachment>,
}

/// Manager-side edits to an existing task. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRevision {
    /// New title.
    pub title: Option<TaskTitle>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// New assignee, already verified to be owned by the assigner.
    pub assigned_to: Option<EmployeeId>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted assigner.
    pub assigned_by: ManagerId,
    /// Persisted assignee.
    pub assigned_to: EmployeeId,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted deadline.
    pub deadline: DateTime<Utc>,
    /// Persisted attachments in insertion order.
    pub attachments: Vec<Attachment>,
    /// Persisted review, present only for reviewed tasks.
    pub review: Option<TaskReview>,
    /// Persisted concurrency version.
    pub version: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task at version zero.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DeadlineInPast`] when the deadline is
    /// before the current clock time.
    pub fn assign(params: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        ensure_future(params.deadline, timestamp)?;

        Ok(Self {
            id: TaskId::new(),
            title: params.title,
            description: normalize_description(params.description),
            assigned_by: params.assigned_by,
            assigned_to: params.assigned_to,
            priority: params.priority,
            status: TaskStatus::Pending,
            deadline: params.deadline,
            attachments: params.attachments,
            review: None,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            assigned_by: data.assigned_by,
            assigned_to: data.assigned_to,
            priority: data.priority,
            status: data.status,
            deadline: data.deadline,
            attachments: data.attachments,
            review: data.review,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the assigning manager.
    #[must_use]
    pub const fn assigned_by(&self) -> ManagerId {
        self.assigned_by
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> EmployeeId {
        self.assigned_to
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns attachments in insertion order.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns the review, present only once reviewed.
    #[must_use]
    pub const fn review(&self) -> Option<&TaskReview> {
        self.review.as_ref()
    }

    /// Returns the concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the ownership edge used by the authorization guard.
    #[must_use]
    pub const fn scope(&self) -> TaskScope {
        TaskScope {
            assigned_by: self.assigned_by,
            assigned_to: self.assigned_to,
        }
    }

    /// Records assignee progress: an optional single forward step plus
    /// appended attachments.
    ///
    /// Passing the current status appends attachments without moving.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskFinalized`] for reviewed tasks and
    /// [`TaskDomainError::InvalidStatusTransition`] for skips, backward
    /// moves, or an attempt to set `Reviewed`.
    pub fn record_progress(
        &mut self,
        status: TaskStatus,
        attachments: Vec<Attachment>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_mutable()?;
        if !self.status.assignee_can_move_to(status) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        self.attachments.extend(attachments);
        self.touch(clock);
        Ok(())
    }

    /// Reviews a completed task, recording feedback and rating together
    /// with the move to `Reviewed`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotReviewable`] unless the task is
    /// completed, or [`TaskDomainError::EmptyFeedback`] for blank feedback.
    pub fn review_with(
        &mut self,
        feedback: impl Into<String>,
        rating: Rating,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.is_reviewable() {
            return Err(TaskDomainError::NotReviewable {
                task_id: self.id,
                current: self.status,
            });
        }
        let timestamp = clock.utc();
        self.review = Some(TaskReview::new(feedback, rating, timestamp)?);
        self.status = TaskStatus::Reviewed;
        self.touch(clock);
        Ok(())
    }

    /// Applies manager-side edits.
    ///
    /// All fields are validated before any is applied.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskFinalized`] for reviewed tasks or
    /// [`TaskDomainError::DeadlineInPast`] for a past deadline.
    pub fn revise(
        &mut self,
        revision: TaskRevision,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_mutable()?;
        if let Some(deadline) = revision.deadline {
            ensure_future(deadline, clock.utc())?;
        }

        if let Some(title) = revision.title {
            self.title = title;
        }
        if revision.description.is_some() {
            self.description = normalize_description(revision.description);
        }
        if let Some(priority) = revision.priority {
            self.priority = priority;
        }
        if let Some(deadline) = revision.deadline {
            self.deadline = deadline;
        }
        if let Some(assigned_to) = revision.assigned_to {
            self.assigned_to = assigned_to;
        }
        self.touch(clock);
        Ok(())
    }

    const fn ensure_mutable(&self) -> Result<(), TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::TaskFinalized(self.id));
        }
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
        self.version += 1;
    }
}

fn ensure_future(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), TaskDomainError> {
    if deadline < now {
        return Err(TaskDomainError::DeadlineInPast { deadline });
    }
    Ok(())
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
