//! Caller-facing error taxonomy.

use crate::advisory::services::AdvisoryError;
use crate::auth::{AuthenticationError, TokenError};
use crate::authz::AccessDenied;
use crate::identity::{ports::IdentityRepositoryError, services::IdentityServiceError};
use crate::stats::StatisticsError;
use crate::task::{ports::TaskRepositoryError, services::TaskLifecycleError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error returned by every [`super::Backend`] operation.
///
/// Authentication failures never say whether a token was expired or
/// malformed. Ownership failures never confirm that the target exists.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{message}")]
    Validation {
        /// What to correct.
        message: String,
    },
    /// Missing, invalid, or expired token, or failed login.
    #[error("authentication failed")]
    Authentication,
    /// Role mismatch or target outside the caller's scope.
    #[error("{message}")]
    Authorization {
        /// Either the required roles or "not found or unauthorized".
        message: String,
    },
    /// The entity's current state forbids the change.
    #[error("{message}")]
    StateConflict {
        /// The conflicting state.
        message: String,
    },
    /// A referenced entity does not exist.
    #[error("{message}")]
    NotFound {
        /// What was missing.
        message: String,
    },
    /// The advisory feature is off, throttled, or failing. Core data is
    /// unaffected.
    #[error("feature unavailable: {message}")]
    FeatureUnavailable {
        /// Why the feature could not serve the request.
        message: String,
    },
    /// Persistence failed or timed out.
    #[error("service temporarily unavailable")]
    Unavailable,
}

impl ApiError {
    /// Returns the HTTP status code equivalent.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Authentication => 401,
            Self::Authorization { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::StateConflict { .. } => 409,
            Self::FeatureUnavailable { .. } | Self::Unavailable => 503,
        }
    }

    fn validation(err: &impl ToString) -> Self {
        Self::Validation {
            message: err.to_string(),
        }
    }

    fn state_conflict(err: &impl ToString) -> Self {
        Self::StateConflict {
            message: err.to_string(),
        }
    }

    fn not_found(err: &impl ToString) -> Self {
        Self::NotFound {
            message: err.to_string(),
        }
    }

    fn unavailable(err: &(impl std::fmt::Display + ?Sized)) -> Self {
        error!(error = %err, "backend dependency failed");
        Self::Unavailable
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        Self::Authorization {
            message: denied.to_string(),
        }
    }
}

impl From<IdentityRepositoryError> for ApiError {
    fn from(err: IdentityRepositoryError) -> Self {
        match err {
            IdentityRepositoryError::DuplicateEmail(_) => Self::validation(&err),
            IdentityRepositoryError::ManagerNotFound(_)
            | IdentityRepositoryError::EmployeeNotFound(_) => Self::not_found(&err),
            IdentityRepositoryError::Persistence(source) => Self::unavailable(&*source),
        }
    }
}

impl From<TaskRepositoryError> for ApiError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(_) => Self::not_found(&err),
            TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::VersionConflict { .. } => {
                Self::state_conflict(&err)
            }
            TaskRepositoryError::Persistence(source) => Self::unavailable(&*source),
        }
    }
}

impl From<IdentityServiceError> for ApiError {
    fn from(err: IdentityServiceError) -> Self {
        match err {
            IdentityServiceError::Domain(_) | IdentityServiceError::IncorrectPassword => {
                Self::validation(&err)
            }
            IdentityServiceError::Repository(inner) => inner.into(),
            IdentityServiceError::Hashing(inner) => Self::unavailable(&inner),
            IdentityServiceError::AccessDenied(denied) => denied.into(),
        }
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(inner) if inner.is_state_conflict() => {
                Self::state_conflict(&inner)
            }
            TaskLifecycleError::Domain(_) | TaskLifecycleError::InvalidStatus(_) => {
                Self::validation(&err)
            }
            TaskLifecycleError::Repository(inner) => inner.into(),
            TaskLifecycleError::Identity(inner) => inner.into(),
            TaskLifecycleError::AccessDenied(denied) => denied.into(),
            TaskLifecycleError::AssigneeNotFound(_) => Self::not_found(&err),
        }
    }
}

impl From<StatisticsError> for ApiError {
    fn from(err: StatisticsError) -> Self {
        match err {
            StatisticsError::Repository(inner) => inner.into(),
            StatisticsError::AccessDenied(denied) => denied.into(),
        }
    }
}

impl From<AuthenticationError> for ApiError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::Unauthenticated | AuthenticationError::InvalidCredentials => {
                Self::Authentication
            }
            AuthenticationError::Token(inner) => inner.into(),
            AuthenticationError::Repository(inner) => inner.into(),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid(_) => Self::Authentication,
            TokenError::WeakSecret | TokenError::Generation(_) => Self::unavailable(&err),
        }
    }
}

impl From<AdvisoryError> for ApiError {
    fn from(err: AdvisoryError) -> Self {
        match err {
            AdvisoryError::AccessDenied(denied) => denied.into(),
            AdvisoryError::Disabled
            | AdvisoryError::RateLimited
            | AdvisoryError::Timeout(_)
            | AdvisoryError::Unavailable(_) => Self::FeatureUnavailable {
                message: err.to_string(),
            },
        }
    }
}
