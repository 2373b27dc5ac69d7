//! Domain model for managers and employees.
//!
//! Validated scalar types are constructed at the service boundary so the
//! aggregates only ever hold well-formed values.

mod code;
mod contact;
mod credential;
mod employee;
mod error;
mod ids;
mod manager;
mod role;

pub use code::EmployeeCode;
pub use contact::{EmailAddress, MobileNumber, PersonName};
pub use credential::{CredentialHash, MIN_PASSWORD_LENGTH, Password};
pub use employee::{
    Employee, EmployeeChanges, NewEmployee, PersistedEmployeeData, ProfileChanges,
};
pub use error::{IdentityDomainError, ParseManagerRoleError};
pub use ids::{EmployeeId, ManagerId};
pub use manager::{Manager, PersistedManagerData};
pub use role::ManagerRole;
