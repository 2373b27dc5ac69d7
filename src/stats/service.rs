//! Statistics service over the task repository.

use super::{TaskStatistics, summarize_assigned, summarize_received};
use crate::authz::{AccessDenied, DenyReason, Operation, Principal, Target, decide};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while computing statistics.
#[derive(Debug, Error)]
pub enum StatisticsError {
    /// Task lookup failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The authorization guard denied the operation.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
}

/// Computes per-caller task statistics.
#[derive(Clone)]
pub struct StatisticsService<T>
where
    T: TaskRepository,
{
    tasks: Arc<T>,
}

impl<T> StatisticsService<T>
where
    T: TaskRepository,
{
    /// Creates a new statistics service.
    #[must_use]
    pub const fn new(tasks: Arc<T>) -> Self {
        Self { tasks }
    }

    /// Returns the manager view for managers and admins, and the employee
    /// view for employees.
    ///
    /// # Errors
    ///
    /// Returns [`StatisticsError::Repository`] on lookup failure.
    pub async fn for_principal(
        &self,
        principal: &Principal,
    ) -> Result<TaskStatistics, StatisticsError> {
        decide(principal, Operation::ViewStatistics, &Target::None).into_result()?;
        if let Some(manager_id) = principal.manager_id() {
            let tasks = self.tasks.list_by_assigner(manager_id).await?;
            return Ok(TaskStatistics::Manager(summarize_assigned(&tasks)));
        }
        let employee_id = principal
            .employee_id()
            .ok_or(AccessDenied(DenyReason::NotFoundOrUnauthorized))?;
        let tasks = self.tasks.list_by_assignee(employee_id).await?;
        Ok(TaskStatistics::Employee(summarize_received(&tasks)))
    }
}
