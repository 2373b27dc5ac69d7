//! Repository ports for manager and employee persistence.

use crate::identity::domain::{EmailAddress, Employee, EmployeeId, Manager, ManagerId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity repository operations.
pub type IdentityRepositoryResult<T> = Result<T, IdentityRepositoryError>;

/// Manager account persistence contract.
#[async_trait]
pub trait ManagerRepository: Send + Sync {
    /// Stores a new manager.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::DuplicateEmail`] when another
    /// manager already uses the email address.
    async fn store(&self, manager: &Manager) -> IdentityRepositoryResult<()>;

    /// Persists changes to an existing manager.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::ManagerNotFound`] when the manager
    /// does not exist.
    async fn update(&self, manager: &Manager) -> IdentityRepositoryResult<()>;

    /// Finds a manager by identifier.
    async fn find_by_id(&self, id: ManagerId) -> IdentityRepositoryResult<Option<Manager>>;

    /// Finds a manager by email address.
    async fn find_by_email(&self, email: &EmailAddress)
    -> IdentityRepositoryResult<Option<Manager>>;
}

/// Employee record persistence contract.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Stores a new employee.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::DuplicateEmail`] when another
    /// employee already uses the email address.
    async fn store(&self, employee: &Employee) -> IdentityRepositoryResult<()>;

    /// Persists changes to an existing employee.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::EmployeeNotFound`] when the
    /// employee does not exist or [`IdentityRepositoryError::DuplicateEmail`]
    /// when the new email belongs to another employee.
    async fn update(&self, employee: &Employee) -> IdentityRepositoryResult<()>;

    /// Removes an employee.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityRepositoryError::EmployeeNotFound`] when the
    /// employee does not exist.
    async fn delete(&self, id: EmployeeId) -> IdentityRepositoryResult<()>;

    /// Finds an employee by identifier.
    async fn find_by_id(&self, id: EmployeeId) -> IdentityRepositoryResult<Option<Employee>>;

    /// Finds an employee by email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> IdentityRepositoryResult<Option<Employee>>;

    /// Returns every employee owned by the manager, oldest first.
    async fn list_by_owner(&self, owner_id: ManagerId) -> IdentityRepositoryResult<Vec<Employee>>;
}

/// Errors returned by identity repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityRepositoryError {
    /// The email address is already registered in the collection.
    #[error("email already registered: {0}")]
    DuplicateEmail(EmailAddress),

    /// The manager was not found.
    #[error("manager not found: {0}")]
    ManagerNotFound(ManagerId),

    /// The employee was not found.
    #[error("employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
