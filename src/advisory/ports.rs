//! Ports consumed by the advisory service.

use super::domain::{AdvisoryRequest, Suggestion};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by an advisory provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("advisory provider failed: {0}")]
pub struct AdvisoryProviderError(pub String);

/// External text-generation capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdvisoryProvider: Send + Sync {
    /// Produces a suggestion for the described task.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryProviderError`] when the upstream call fails.
    async fn suggest(&self, request: &AdvisoryRequest)
    -> Result<Suggestion, AdvisoryProviderError>;
}

/// Per-key admission control.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Records an attempt for `key` and returns `true` if it is admitted.
    async fn check(&self, key: &str) -> bool;
}
