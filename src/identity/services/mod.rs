//! Application services for the identity store.

mod directory;

pub use directory::{
    ChangePasswordRequest, CreateEmployeeRequest, IdentityService, IdentityServiceError,
    IdentityServiceResult, RegisterManagerRequest, UpdateEmployeeRequest, UpdateProfileRequest,
};
