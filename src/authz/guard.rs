//! The authorization decision function.

use super::{EmployeeScope, Operation, Principal, Role, Target, TaskScope};
use std::fmt;
use thiserror::Error;

/// Outcome of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The principal may perform the operation on the target.
    Admit,
    /// The principal may not perform the operation.
    Deny(DenyReason),
}

impl Decision {
    /// Returns `true` for [`Decision::Admit`].
    #[must_use]
    pub const fn is_admit(self) -> bool {
        matches!(self, Self::Admit)
    }

    /// Converts the decision into a result.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] carrying the reason for a denial.
    pub const fn into_result(self) -> Result<(), AccessDenied> {
        match self {
            Self::Admit => Ok(()),
            Self::Deny(reason) => Err(AccessDenied(reason)),
        }
    }
}

/// Why a principal was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The principal's role is not in the operation's allowed set.
    RoleNotAllowed {
        /// The attempted operation.
        operation: Operation,
        /// Roles the operation admits.
        allowed: &'static [Role],
    },
    /// The target is outside the principal's ownership scope, or does not
    /// exist. The two cases are indistinguishable to the caller.
    NotFoundOrUnauthorized,
    /// The assignee of a task is owned by a different manager.
    ForeignAssignee,
}

impl DenyReason {
    /// Returns `true` when the denial concerns role membership rather than
    /// ownership.
    #[must_use]
    pub const fn is_role_failure(self) -> bool {
        matches!(self, Self::RoleNotAllowed { .. })
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoleNotAllowed { allowed, .. } => {
                f.write_str("access denied: ")?;
                for (index, role) in allowed.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" or ")?;
                    }
                    f.write_str(role.as_str())?;
                }
                f.write_str(" only")
            }
            Self::NotFoundOrUnauthorized => f.write_str("not found or unauthorized"),
            Self::ForeignAssignee => {
                f.write_str("you can only assign tasks to your own employees")
            }
        }
    }
}

/// Error form of a denial.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct AccessDenied(pub DenyReason);

impl AccessDenied {
    /// Returns the underlying reason.
    #[must_use]
    pub const fn reason(self) -> DenyReason {
        self.0
    }
}

/// Checks only the role half of the policy.
///
/// Services call this before loading the target so that callers without the
/// right role learn nothing about which entities exist.
#[must_use]
pub fn authorize_role(principal: &Principal, operation: Operation) -> Decision {
    let allowed = operation.allowed_roles();
    if allowed.contains(&principal.role()) {
        Decision::Admit
    } else {
        Decision::Deny(DenyReason::RoleNotAllowed { operation, allowed })
    }
}

/// Decides whether `principal` may perform `operation` on `target`.
///
/// The role check runs first; the ownership check then requires the target
/// to be reachable from the principal through the ownership graph. A target
/// of the wrong kind for a scoped operation is denied.
#[must_use]
pub fn decide(principal: &Principal, operation: Operation, target: &Target) -> Decision {
    let role_decision = authorize_role(principal, operation);
    if !role_decision.is_admit() {
        return role_decision;
    }
    if operation.is_unscoped() {
        return Decision::Admit;
    }

    let admitted = match (operation, target) {
        (Operation::ReadEmployee, Target::Employee(scope)) => {
            owns_employee(principal, scope) || is_employee_itself(principal, scope)
        }
        (Operation::UpdateEmployee | Operation::DeleteEmployee, Target::Employee(scope)) => {
            owns_employee(principal, scope)
        }
        (Operation::UpdateOwnProfile, Target::Employee(scope)) => {
            is_employee_itself(principal, scope)
        }
        (Operation::AssignTask, Target::Employee(scope)) => {
            if !owns_employee(principal, scope) {
                return Decision::Deny(DenyReason::ForeignAssignee);
            }
            true
        }
        (Operation::UpdateTaskStatus, Target::Task(scope)) => is_assignee(principal, scope),
        (
            Operation::ReviewTask | Operation::EditTask | Operation::DeleteTask,
            Target::Task(scope),
        ) => is_assigner(principal, scope),
        (Operation::ReadTask, Target::Task(scope)) => {
            is_assigner(principal, scope) || is_assignee(principal, scope)
        }
        _ => false,
    };

    if admitted {
        Decision::Admit
    } else {
        Decision::Deny(DenyReason::NotFoundOrUnauthorized)
    }
}

fn owns_employee(principal: &Principal, scope: &EmployeeScope) -> bool {
    principal.manager_id() == Some(scope.owner_id)
}

fn is_employee_itself(principal: &Principal, scope: &EmployeeScope) -> bool {
    principal.employee_id() == Some(scope.employee_id)
}

fn is_assigner(principal: &Principal, scope: &TaskScope) -> bool {
    principal.manager_id() == Some(scope.assigned_by)
}

fn is_assignee(principal: &Principal, scope: &TaskScope) -> bool {
    principal.employee_id() == Some(scope.assigned_to)
}
