//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating identity records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The person name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The employee job title is empty after trimming.
    #[error("job title must not be empty")]
    EmptyJobTitle,

    /// The mobile number contains characters other than digits, spaces,
    /// dashes, parentheses and a leading plus sign.
    #[error("invalid mobile number '{0}'")]
    InvalidMobile(String),

    /// The supplied password is shorter than the minimum length.
    #[error("password must be at least {min} characters long")]
    PasswordTooShort {
        /// Minimum accepted password length.
        min: usize,
    },

    /// Login access was granted without a credential on record.
    #[error("login access requires a password")]
    LoginAccessRequiresCredential,

    /// The employee code does not follow the `EMP-XXXXXX` format.
    #[error("invalid employee code '{0}'")]
    InvalidEmployeeCode(String),
}

/// Error returned while parsing manager roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown manager role: {0}")]
pub struct ParseManagerRoleError(pub String);
