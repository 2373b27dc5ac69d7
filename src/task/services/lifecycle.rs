//! Service layer for task assignment and lifecycle transitions.

use crate::authz::{
    AccessDenied, DenyReason, EmployeeScope, Operation, Principal, Target, authorize_role, decide,
};
use crate::identity::{
    domain::EmployeeId,
    ports::{EmployeeRepository, IdentityRepositoryError},
};
use crate::task::{
    domain::{
        Attachment, NewTask, ParseTaskStatusError, Priority, Rating, Task, TaskDomainError, TaskId,
        TaskRevision, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for assigning a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    assigned_to: EmployeeId,
    deadline: DateTime<Utc>,
    description: Option<String>,
    priority: Priority,
    attachments: Vec<String>,
}

impl CreateTaskRequest {
    /// Creates a request with required task fields and medium priority.
    #[must_use]
    pub fn new(title: impl Into<String>, assigned_to: EmployeeId, deadline: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            assigned_to,
            deadline,
            description: None,
            priority: Priority::default(),
            attachments: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets initial attachments.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = String>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }
}

/// Request payload for an assignee status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    status: String,
    attachments: Vec<String>,
}

impl UpdateStatusRequest {
    /// Creates a request for the given status, in storage or label form.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            attachments: Vec::new(),
        }
    }

    /// Sets attachments to append.
    #[must_use]
    pub fn with_attachments(mut self, attachments: impl IntoIterator<Item = String>) -> Self {
        self.attachments = attachments.into_iter().collect();
        self
    }
}

/// Request payload for reviewing a completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTaskRequest {
    feedback: String,
    rating: u8,
}

impl ReviewTaskRequest {
    /// Creates a review request.
    #[must_use]
    pub fn new(feedback: impl Into<String>, rating: u8) -> Self {
        Self {
            feedback: feedback.into(),
            rating,
        }
    }
}

/// Manager-side edits to a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTaskRequest {
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    deadline: Option<DateTime<Utc>>,
    assigned_to: Option<EmployeeId>,
}

impl EditTaskRequest {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Changes the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Changes the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Changes the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Reassigns the task to another employee of the same manager.
    #[must_use]
    pub const fn with_assignee(mut self, assigned_to: EmployeeId) -> Self {
        self.assigned_to = Some(assigned_to);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Employee lookup failed.
    #[error(transparent)]
    Identity(#[from] IdentityRepositoryError),
    /// The authorization guard denied the operation.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    /// The requested status is not a known lifecycle status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// The employee named as assignee does not exist.
    #[error("assignee not found: {0}")]
    AssigneeNotFound(EmployeeId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task assignment and lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<T, E, C>
where
    T: TaskRepository,
    E: EmployeeRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    employees: Arc<E>,
    clock: Arc<C>,
}

impl<T, E, C> TaskLifecycleService<T, E, C>
where
    T: TaskRepository,
    E: EmployeeRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, employees: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            employees,
            clock,
        }
    }

    /// Assigns a new task to one of the calling manager's employees.
    ///
    /// Checks run in order: caller role, assignee existence, assignee
    /// ownership, field validation. The assignee is read again after the
    /// write; if it was deleted meanwhile the task is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AccessDenied`] for non-manager callers
    /// or foreign assignees, [`TaskLifecycleError::AssigneeNotFound`] for an
    /// unknown assignee, or [`TaskLifecycleError::Domain`] for malformed
    /// input.
    pub async fn create_task(
        &self,
        principal: &Principal,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        authorize_role(principal, Operation::AssignTask).into_result()?;
        let assigned_by = principal
            .manager_id()
            .ok_or(AccessDenied(DenyReason::NotFoundOrUnauthorized))?;
        self.ensure_assignable(principal, request.assigned_to)
            .await?;

        let CreateTaskRequest {
            title,
            assigned_to,
            deadline,
            description,
            priority,
            attachments,
        } = request;
        let params = NewTask {
            title: TaskTitle::new(title)?,
            description,
            assigned_by,
            assigned_to,
            priority,
            deadline,
            attachments: parse_attachments(attachments)?,
        };
        let task = Task::assign(params, &*self.clock)?;
        self.tasks.store(&task).await?;
        if let Some(vanished) = self.vanished(Some(assigned_to)).await? {
            warn!(
                task_id = %task.id(),
                employee_id = %vanished,
                "assignee removed during assignment"
            );
            self.discard(task.id()).await?;
            return Err(TaskLifecycleError::AssigneeNotFound(vanished));
        }
        info!(
            task_id = %task.id(),
            assigned_by = %assigned_by,
            assigned_to = %assigned_to,
            priority = %task.priority(),
            "task assigned"
        );
        Ok(task)
    }

    /// Lists the caller's tasks: those it assigned (managers) or those
    /// assigned to it (employees).
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] on lookup failure.
    pub async fn list_tasks(&self, principal: &Principal) -> TaskLifecycleResult<Vec<Task>> {
        authorize(principal, Operation::ListTasks, &Target::None)?;
        let tasks = match (principal.manager_id(), principal.employee_id()) {
            (Some(manager_id), _) => self.tasks.list_by_assigner(manager_id).await?,
            (None, Some(employee_id)) => self.tasks.list_by_assignee(employee_id).await?,
            (None, None) => Vec::new(),
        };
        Ok(tasks)
    }

    /// Returns one task visible to the caller: its assigner or assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AccessDenied`] when the task does not
    /// exist or is outside the caller's scope.
    pub async fn get_task(&self, principal: &Principal, id: TaskId) -> TaskLifecycleResult<Task> {
        self.load_scoped(principal, Operation::ReadTask, id).await
    }

    /// Applies an assignee status update: one forward step or none, plus
    /// appended attachments, in a single version-checked write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidStatus`] for an unknown status,
    /// [`TaskLifecycleError::AccessDenied`] unless the caller is the
    /// assignee, [`TaskLifecycleError::Domain`] for a disallowed transition,
    /// or [`TaskLifecycleError::Repository`] on a concurrent modification.
    pub async fn update_status(
        &self,
        principal: &Principal,
        id: TaskId,
        request: UpdateStatusRequest,
    ) -> TaskLifecycleResult<Task> {
        authorize_role(principal, Operation::UpdateTaskStatus).into_result()?;
        let status = TaskStatus::try_from(request.status.as_str())?;
        let attachments = parse_attachments(request.attachments)?;

        let mut task = self
            .load_scoped(principal, Operation::UpdateTaskStatus, id)
            .await?;
        let previous = task.status();
        let expected = task.version();
        task.record_progress(status, attachments, &*self.clock)
            .inspect_err(|err| {
                warn!(
                    task_id = %id,
                    from = %previous,
                    to = %status,
                    error = %err,
                    "status update rejected"
                );
            })?;
        self.tasks.update(&task, expected).await?;
        info!(task_id = %id, from = %previous, to = %status, "task status updated");
        Ok(task)
    }

    /// Reviews a completed task the caller assigned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AccessDenied`] unless the caller is the
    /// assigner, or [`TaskLifecycleError::Domain`] when the task is not
    /// completed or the review input is malformed.
    pub async fn review_task(
        &self,
        principal: &Principal,
        id: TaskId,
        request: ReviewTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        authorize_role(principal, Operation::ReviewTask).into_result()?;
        let rating = Rating::new(request.rating)?;

        let mut task = self
            .load_scoped(principal, Operation::ReviewTask, id)
            .await?;
        let expected = task.version();
        task.review_with(request.feedback, rating, &*self.clock)
            .inspect_err(|err| {
                warn!(task_id = %id, error = %err, "review rejected");
            })?;
        self.tasks.update(&task, expected).await?;
        info!(task_id = %id, rating = rating.value(), "task reviewed");
        Ok(task)
    }

    /// Edits a task the caller assigned. Reassignment is limited to the
    /// caller's own employees, and is undone if the new assignee is deleted
    /// before the write lands.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AccessDenied`] unless the caller is the
    /// assigner or when the new assignee is foreign,
    /// [`TaskLifecycleError::AssigneeNotFound`] for an unknown new assignee,
    /// or [`TaskLifecycleError::Domain`] for reviewed tasks and malformed
    /// input.
    pub async fn edit_task(
        &self,
        principal: &Principal,
        id: TaskId,
        request: EditTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_scoped(principal, Operation::EditTask, id).await?;

        let EditTaskRequest {
            title,
            description,
            priority,
            deadline,
            assigned_to,
        } = request;
        if let Some(assignee) = assigned_to {
            self.ensure_assignable(principal, assignee).await?;
        }

        let revision = TaskRevision {
            title: title.map(TaskTitle::new).transpose()?,
            description,
            priority,
            deadline,
            assigned_to,
        };
        let previous_assignee = task.assigned_to();
        let expected = task.version();
        task.revise(revision, &*self.clock)?;
        self.tasks.update(&task, expected).await?;
        if let Some(vanished) = self.vanished(assigned_to).await? {
            warn!(
                task_id = %id,
                employee_id = %vanished,
                "assignee removed during reassignment"
            );
            self.restore_assignee(task, previous_assignee).await?;
            return Err(TaskLifecycleError::AssigneeNotFound(vanished));
        }
        info!(task_id = %id, assigned_to = %task.assigned_to(), "task edited");
        Ok(task)
    }

    /// Deletes a task the caller assigned, regardless of status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::AccessDenied`] unless the caller is the
    /// assigner.
    pub async fn delete_task(&self, principal: &Principal, id: TaskId) -> TaskLifecycleResult<()> {
        self.load_scoped(principal, Operation::DeleteTask, id)
            .await?;
        self.tasks.delete(id).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Removes every task assigned to an employee being deleted.
    ///
    /// Callers authorize the employee deletion before invoking this.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] on persistence failure.
    pub async fn remove_tasks_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> TaskLifecycleResult<usize> {
        let removed = self.tasks.delete_by_assignee(employee_id).await?;
        if removed > 0 {
            info!(employee_id = %employee_id, removed, "tasks removed with employee");
        }
        Ok(removed)
    }

    /// Re-reads an assignee after a write; returns it if it no longer exists.
    async fn vanished(
        &self,
        assignee: Option<EmployeeId>,
    ) -> TaskLifecycleResult<Option<EmployeeId>> {
        let Some(id) = assignee else {
            return Ok(None);
        };
        let current = self.employees.find_by_id(id).await?;
        Ok(current.is_none().then_some(id))
    }

    /// Removes a task written for an assignee that was deleted meanwhile.
    /// The employee cascade may already have removed it.
    async fn discard(&self, id: TaskId) -> TaskLifecycleResult<()> {
        match self.tasks.delete(id).await {
            Ok(()) | Err(TaskRepositoryError::NotFound(_)) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Points a reassigned task back at its previous assignee after the new
    /// one was deleted meanwhile.
    async fn restore_assignee(
        &self,
        mut task: Task,
        previous_assignee: EmployeeId,
    ) -> TaskLifecycleResult<()> {
        let expected = task.version();
        let revision = TaskRevision {
            assigned_to: Some(previous_assignee),
            ..TaskRevision::default()
        };
        task.revise(revision, &*self.clock)?;
        match self.tasks.update(&task, expected).await {
            Ok(()) | Err(TaskRepositoryError::NotFound(_)) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn ensure_assignable(
        &self,
        principal: &Principal,
        assignee: EmployeeId,
    ) -> TaskLifecycleResult<()> {
        let Some(employee) = self.employees.find_by_id(assignee).await? else {
            warn!(principal = %principal, employee_id = %assignee, "assignee not found");
            return Err(TaskLifecycleError::AssigneeNotFound(assignee));
        };
        authorize(
            principal,
            Operation::AssignTask,
            &Target::Employee(EmployeeScope::from(&employee)),
        )?;
        Ok(())
    }

    async fn load_scoped(
        &self,
        principal: &Principal,
        operation: Operation,
        id: TaskId,
    ) -> TaskLifecycleResult<Task> {
        authorize_role(principal, operation).into_result()?;
        let Some(task) = self.tasks.find_by_id(id).await? else {
            warn!(
                principal = %principal,
                operation = %operation,
                task_id = %id,
                "task lookup denied"
            );
            return Err(AccessDenied(DenyReason::NotFoundOrUnauthorized).into());
        };
        authorize(principal, operation, &Target::Task(task.scope()))?;
        Ok(task)
    }
}

fn parse_attachments(raw: Vec<String>) -> Result<Vec<Attachment>, TaskDomainError> {
    raw.into_iter().map(Attachment::new).collect()
}

fn authorize(
    principal: &Principal,
    operation: Operation,
    target: &Target,
) -> Result<(), AccessDenied> {
    decide(principal, operation, target).into_result().inspect_err(|denied| {
        warn!(principal = %principal, operation = %operation, reason = %denied, "access denied");
    })
}
