//! Authenticated principals and their roles.

use crate::identity::domain::{EmployeeId, ManagerId, ManagerRole};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Closed set of principal roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administrator account. Manager rights within its own scope.
    Admin,
    /// Manager account.
    Manager,
    /// Employee with login access.
    Employee,
}

impl Role {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }

    /// Returns `true` for roles that own employees.
    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ManagerRole> for Role {
    fn from(role: ManagerRole) -> Self {
        match role {
            ManagerRole::Admin => Self::Admin,
            ManagerRole::Manager => Self::Manager,
        }
    }
}

/// Identity making a request. The role is resolved from the identity store,
/// never taken from client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Principal {
    id: Uuid,
    role: Role,
}

impl Principal {
    /// Creates a principal for a manager account.
    #[must_use]
    pub fn manager(id: ManagerId, role: ManagerRole) -> Self {
        Self {
            id: id.into_inner(),
            role: role.into(),
        }
    }

    /// Creates a principal for an employee.
    #[must_use]
    pub const fn employee(id: EmployeeId) -> Self {
        Self {
            id: id.into_inner(),
            role: Role::Employee,
        }
    }

    /// Returns the raw principal identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the principal role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the manager identifier when the principal is a manager or
    /// admin.
    #[must_use]
    pub const fn manager_id(&self) -> Option<ManagerId> {
        if self.role.is_manager() {
            Some(ManagerId::from_uuid(self.id))
        } else {
            None
        }
    }

    /// Returns the employee identifier when the principal is an employee.
    #[must_use]
    pub const fn employee_id(&self) -> Option<EmployeeId> {
        match self.role {
            Role::Employee => Some(EmployeeId::from_uuid(self.id)),
            Role::Admin | Role::Manager => None,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.id)
    }
}
