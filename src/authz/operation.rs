//! Guarded operations and the ownership facts they are decided against.

use super::Role;
use crate::identity::domain::{Employee, EmployeeId, ManagerId};
use std::fmt;

const MANAGERS: &[Role] = &[Role::Admin, Role::Manager];
const EMPLOYEES: &[Role] = &[Role::Employee];
const EVERYONE: &[Role] = &[Role::Admin, Role::Manager, Role::Employee];

/// Every operation that passes through the authorization guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create an employee owned by the caller.
    CreateEmployee,
    /// List the caller's employees.
    ListEmployees,
    /// Read one employee record.
    ReadEmployee,
    /// Update an employee record with manager rights.
    UpdateEmployee,
    /// Update the self-service fields of the caller's own record.
    UpdateOwnProfile,
    /// Delete an employee record.
    DeleteEmployee,
    /// Assign a task to an employee, at creation or by reassignment.
    AssignTask,
    /// List tasks in the caller's scope.
    ListTasks,
    /// Read one task.
    ReadTask,
    /// Advance a task's status and append attachments.
    UpdateTaskStatus,
    /// Review a completed task.
    ReviewTask,
    /// Edit task details.
    EditTask,
    /// Delete a task.
    DeleteTask,
    /// Read task statistics for the caller's scope.
    ViewStatistics,
    /// Ask the advisory subsystem for suggestions.
    RequestAdvice,
}

impl Operation {
    /// Returns the roles permitted to attempt the operation.
    #[must_use]
    pub const fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::CreateEmployee
            | Self::ListEmployees
            | Self::UpdateEmployee
            | Self::DeleteEmployee
            | Self::AssignTask
            | Self::ReviewTask
            | Self::EditTask
            | Self::DeleteTask
            | Self::RequestAdvice => MANAGERS,
            Self::UpdateOwnProfile | Self::UpdateTaskStatus => EMPLOYEES,
            Self::ReadEmployee | Self::ListTasks | Self::ReadTask | Self::ViewStatistics => {
                EVERYONE
            }
        }
    }

    /// Returns `true` when the operation is decided on role alone.
    #[must_use]
    pub const fn is_unscoped(self) -> bool {
        matches!(
            self,
            Self::CreateEmployee
                | Self::ListEmployees
                | Self::ListTasks
                | Self::ViewStatistics
                | Self::RequestAdvice
        )
    }

    /// Returns a stable name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateEmployee => "create_employee",
            Self::ListEmployees => "list_employees",
            Self::ReadEmployee => "read_employee",
            Self::UpdateEmployee => "update_employee",
            Self::UpdateOwnProfile => "update_own_profile",
            Self::DeleteEmployee => "delete_employee",
            Self::AssignTask => "assign_task",
            Self::ListTasks => "list_tasks",
            Self::ReadTask => "read_task",
            Self::UpdateTaskStatus => "update_task_status",
            Self::ReviewTask => "review_task",
            Self::EditTask => "edit_task",
            Self::DeleteTask => "delete_task",
            Self::ViewStatistics => "view_statistics",
            Self::RequestAdvice => "request_advice",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ownership facts of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeScope {
    /// The employee itself.
    pub employee_id: EmployeeId,
    /// The owning manager.
    pub owner_id: ManagerId,
}

impl From<&Employee> for EmployeeScope {
    fn from(employee: &Employee) -> Self {
        Self {
            employee_id: employee.id(),
            owner_id: employee.owner_id(),
        }
    }
}

/// Ownership facts of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskScope {
    /// Manager that assigned the task.
    pub assigned_by: ManagerId,
    /// Employee the task is assigned to.
    pub assigned_to: EmployeeId,
}

/// Entity an operation is decided against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// No specific entity; only unscoped operations admit this.
    None,
    /// An employee record, or the assignee of a task being assigned.
    Employee(EmployeeScope),
    /// An existing task.
    Task(TaskScope),
}
