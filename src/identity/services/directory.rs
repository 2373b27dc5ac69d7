//! Service layer for manager registration and employee management.

use crate::authz::{
    AccessDenied, DenyReason, EmployeeScope, Operation, Principal, Target, authorize_role, decide,
};
use crate::identity::{
    domain::{
        EmailAddress, Employee, EmployeeChanges, EmployeeId, IdentityDomainError, Manager,
        ManagerRole, MobileNumber, NewEmployee, Password, PersonName, ProfileChanges,
    },
    ports::{
        CredentialHashError, CredentialHasher, EmployeeRepository, IdentityRepositoryError,
        ManagerRepository,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for registering a manager account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterManagerRequest {
    name: String,
    email: String,
    password: String,
    role: ManagerRole,
}

impl RegisterManagerRequest {
    /// Creates a request for a regular manager account.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: ManagerRole::Manager,
        }
    }

    /// Sets the account role.
    #[must_use]
    pub const fn with_role(mut self, role: ManagerRole) -> Self {
        self.role = role;
        self
    }
}

/// Request payload for changing the caller's own password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePasswordRequest {
    current: String,
    replacement: String,
}

impl ChangePasswordRequest {
    /// Creates a request from the current and replacement passwords.
    #[must_use]
    pub fn new(current: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            replacement: replacement.into(),
        }
    }
}

/// Request payload for creating an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEmployeeRequest {
    name: String,
    email: String,
    job_title: String,
    mobile: Option<String>,
    address: Option<String>,
    salary: Option<u64>,
    password: Option<String>,
}

impl CreateEmployeeRequest {
    /// Creates a request with required employee fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            job_title: job_title.into(),
            mobile: None,
            address: None,
            salary: None,
            password: None,
        }
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }

    /// Sets the postal address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the salary in minor currency units.
    #[must_use]
    pub const fn with_salary(mut self, salary: u64) -> Self {
        self.salary = Some(salary);
        self
    }

    /// Grants login access with the given password.
    #[must_use]
    pub fn with_login(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Manager-side changes to an employee record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateEmployeeRequest {
    name: Option<String>,
    email: Option<String>,
    job_title: Option<String>,
    mobile: Option<String>,
    address: Option<String>,
    salary: Option<u64>,
    has_login_access: Option<bool>,
    password: Option<String>,
}

impl UpdateEmployeeRequest {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Changes the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Changes the job title.
    #[must_use]
    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }

    /// Changes the phone number.
    #[must_use]
    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }

    /// Changes the postal address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Changes the salary.
    #[must_use]
    pub const fn with_salary(mut self, salary: u64) -> Self {
        self.salary = Some(salary);
        self
    }

    /// Grants or revokes login access.
    #[must_use]
    pub const fn with_login_access(mut self, granted: bool) -> Self {
        self.has_login_access = Some(granted);
        self
    }

    /// Sets a new password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Self-service changes an employee may make to its own record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    name: Option<String>,
    mobile: Option<String>,
    address: Option<String>,
}

impl UpdateProfileRequest {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Changes the phone number.
    #[must_use]
    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }

    /// Changes the postal address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Service-level errors for identity operations.
#[derive(Debug, Error)]
pub enum IdentityServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IdentityRepositoryError),
    /// Credential hashing failed.
    #[error(transparent)]
    Hashing(#[from] CredentialHashError),
    /// The authorization guard denied the operation.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    /// The current password supplied for a password change is wrong.
    #[error("current password is incorrect")]
    IncorrectPassword,
}

/// Result type for identity service operations.
pub type IdentityServiceResult<T> = Result<T, IdentityServiceError>;

/// Manager and employee orchestration service.
#[derive(Clone)]
pub struct IdentityService<M, E, H, C>
where
    M: ManagerRepository,
    E: EmployeeRepository,
    H: CredentialHasher,
    C: Clock + Send + Sync,
{
    managers: Arc<M>,
    employees: Arc<E>,
    hasher: Arc<H>,
    clock: Arc<C>,
}

impl<M, E, H, C> IdentityService<M, E, H, C>
where
    M: ManagerRepository,
    E: EmployeeRepository,
    H: CredentialHasher,
    C: Clock + Send + Sync,
{
    /// Creates a new identity service.
    #[must_use]
    pub const fn new(managers: Arc<M>, employees: Arc<E>, hasher: Arc<H>, clock: Arc<C>) -> Self {
        Self {
            managers,
            employees,
            hasher,
            clock,
        }
    }

    /// Registers a manager account.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::Domain`] for malformed input or
    /// [`IdentityServiceError::Repository`] when the email is taken.
    pub async fn register_manager(
        &self,
        request: RegisterManagerRequest,
    ) -> IdentityServiceResult<Manager> {
        let RegisterManagerRequest {
            name,
            email,
            password,
            role,
        } = request;

        let name = PersonName::new(name)?;
        let email = EmailAddress::new(email)?;
        let credential = self.hasher.hash(&Password::new(password)?)?;
        let manager = Manager::register(name, email, credential, role, &*self.clock);
        self.managers.store(&manager).await?;
        info!(manager_id = %manager.id(), role = %manager.role(), "manager registered");
        Ok(manager)
    }

    /// Changes the calling manager's password after verifying the current
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::AccessDenied`] for non-manager
    /// principals and [`IdentityServiceError::IncorrectPassword`] when the
    /// current password does not match.
    pub async fn change_password(
        &self,
        principal: &Principal,
        request: ChangePasswordRequest,
    ) -> IdentityServiceResult<()> {
        let manager_id = principal
            .manager_id()
            .ok_or(AccessDenied(DenyReason::NotFoundOrUnauthorized))?;
        let mut manager = self
            .managers
            .find_by_id(manager_id)
            .await?
            .ok_or(AccessDenied(DenyReason::NotFoundOrUnauthorized))?;

        if !self
            .hasher
            .verify(&Password::submitted(request.current), manager.credential())
        {
            warn!(manager_id = %manager_id, "password change rejected");
            return Err(IdentityServiceError::IncorrectPassword);
        }
        let credential = self.hasher.hash(&Password::new(request.replacement)?)?;
        manager.change_credential(credential, &*self.clock);
        self.managers.update(&manager).await?;
        info!(manager_id = %manager_id, "manager password changed");
        Ok(())
    }

    /// Creates an employee owned by the calling manager.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::AccessDenied`] for non-manager
    /// principals, [`IdentityServiceError::Domain`] for malformed input, or
    /// [`IdentityServiceError::Repository`] when the email is taken.
    pub async fn create_employee(
        &self,
        principal: &Principal,
        request: CreateEmployeeRequest,
    ) -> IdentityServiceResult<Employee> {
        authorize(principal, Operation::CreateEmployee, &Target::None)?;
        let owner_id = principal
            .manager_id()
            .ok_or(AccessDenied(DenyReason::NotFoundOrUnauthorized))?;

        let CreateEmployeeRequest {
            name,
            email,
            job_title,
            mobile,
            address,
            salary,
            password,
        } = request;

        let credential = password
            .map(|raw| Password::new(raw).map_err(IdentityServiceError::from))
            .transpose()?
            .map(|password| self.hasher.hash(&password))
            .transpose()?;

        let params = NewEmployee {
            owner_id,
            name: PersonName::new(name)?,
            email: EmailAddress::new(email)?,
            job_title,
            mobile: mobile.map(MobileNumber::new).transpose()?,
            address,
            salary,
            has_login_access: credential.is_some(),
            credential,
        };
        let employee = Employee::hire(params, &*self.clock)?;
        self.employees.store(&employee).await?;
        info!(
            employee_id = %employee.id(),
            owner_id = %owner_id,
            code = %employee.code(),
            "employee created"
        );
        Ok(employee)
    }

    /// Lists employees owned by the calling manager.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::AccessDenied`] for non-manager
    /// principals or [`IdentityServiceError::Repository`] on lookup failure.
    pub async fn list_employees(
        &self,
        principal: &Principal,
    ) -> IdentityServiceResult<Vec<Employee>> {
        authorize(principal, Operation::ListEmployees, &Target::None)?;
        let owner_id = principal
            .manager_id()
            .ok_or(AccessDenied(DenyReason::NotFoundOrUnauthorized))?;
        Ok(self.employees.list_by_owner(owner_id).await?)
    }

    /// Returns one employee visible to the caller: its owner, or the
    /// employee itself.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::AccessDenied`] when the employee does
    /// not exist or is outside the caller's scope.
    pub async fn get_employee(
        &self,
        principal: &Principal,
        id: EmployeeId,
    ) -> IdentityServiceResult<Employee> {
        self.load_scoped(principal, Operation::ReadEmployee, id)
            .await
    }

    /// Applies manager-side changes to an owned employee.
    ///
    /// `owner_id` is not part of the change set and never changes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::AccessDenied`] when the caller does
    /// not own the employee, [`IdentityServiceError::Domain`] for malformed
    /// input, or [`IdentityServiceError::Repository`] on persistence failure.
    pub async fn update_employee(
        &self,
        principal: &Principal,
        id: EmployeeId,
        request: UpdateEmployeeRequest,
    ) -> IdentityServiceResult<Employee> {
        let mut employee = self
            .load_scoped(principal, Operation::UpdateEmployee, id)
            .await?;

        let UpdateEmployeeRequest {
            name,
            email,
            job_title,
            mobile,
            address,
            salary,
            has_login_access,
            password,
        } = request;

        let credential = password
            .map(|raw| Password::new(raw).map_err(IdentityServiceError::from))
            .transpose()?
            .map(|password| self.hasher.hash(&password))
            .transpose()?;

        let changes = EmployeeChanges {
            name: name.map(PersonName::new).transpose()?,
            email: email.map(EmailAddress::new).transpose()?,
            job_title,
            mobile: mobile.map(MobileNumber::new).transpose()?,
            address,
            salary,
            has_login_access,
            credential,
        };
        employee.apply_changes(changes, &*self.clock)?;
        self.employees.update(&employee).await?;
        info!(employee_id = %id, "employee updated by owner");
        Ok(employee)
    }

    /// Applies self-service changes to the calling employee's own record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::AccessDenied`] for non-employee
    /// principals or [`IdentityServiceError::Domain`] for malformed input.
    pub async fn update_own_profile(
        &self,
        principal: &Principal,
        request: UpdateProfileRequest,
    ) -> IdentityServiceResult<Employee> {
        authorize_role(principal, Operation::UpdateOwnProfile).into_result()?;
        let id = principal
            .employee_id()
            .ok_or(AccessDenied(DenyReason::NotFoundOrUnauthorized))?;
        let mut employee = self
            .load_scoped(principal, Operation::UpdateOwnProfile, id)
            .await?;

        let changes = ProfileChanges {
            name: request.name.map(PersonName::new).transpose()?,
            mobile: request.mobile.map(MobileNumber::new).transpose()?,
            address: request.address,
        };
        employee.apply_profile_changes(changes, &*self.clock);
        self.employees.update(&employee).await?;
        info!(employee_id = %id, "employee profile updated");
        Ok(employee)
    }

    /// Returns an owned employee the caller may delete, without deleting it.
    ///
    /// Lets callers clear dependent records before the employee goes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::AccessDenied`] when the caller does
    /// not own the employee.
    pub async fn authorize_removal(
        &self,
        principal: &Principal,
        id: EmployeeId,
    ) -> IdentityServiceResult<Employee> {
        self.load_scoped(principal, Operation::DeleteEmployee, id)
            .await
    }

    /// Deletes an owned employee and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityServiceError::AccessDenied`] when the caller does
    /// not own the employee.
    pub async fn delete_employee(
        &self,
        principal: &Principal,
        id: EmployeeId,
    ) -> IdentityServiceResult<Employee> {
        let employee = self.authorize_removal(principal, id).await?;
        self.employees.delete(id).await?;
        info!(employee_id = %id, owner_id = %employee.owner_id(), "employee deleted");
        Ok(employee)
    }

    async fn load_scoped(
        &self,
        principal: &Principal,
        operation: Operation,
        id: EmployeeId,
    ) -> IdentityServiceResult<Employee> {
        authorize_role(principal, operation).into_result()?;
        let Some(employee) = self.employees.find_by_id(id).await? else {
            warn!(
                principal = %principal,
                operation = %operation,
                employee_id = %id,
                "employee lookup denied"
            );
            return Err(AccessDenied(DenyReason::NotFoundOrUnauthorized).into());
        };
        authorize(
            principal,
            operation,
            &Target::Employee(EmployeeScope::from(&employee)),
        )?;
        Ok(employee)
    }
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
