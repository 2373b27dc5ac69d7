//! Port contracts for the identity store.

pub mod hasher;
pub mod repository;

pub use hasher::{CredentialHashError, CredentialHasher};
pub use repository::{
    EmployeeRepository, IdentityRepositoryError, IdentityRepositoryResult, ManagerRepository,
};
