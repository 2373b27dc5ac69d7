//! Gated access to the advisory provider.

use crate::advisory::{
    domain::{AdvisoryRequest, Suggestion},
    ports::{AdvisoryProvider, AdvisoryProviderError, RateLimiter},
};
use crate::authz::{AccessDenied, Operation, Principal, Target, decide};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Runtime switches for the advisory side-call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisorySettings {
    /// Whether suggestions may be requested at all.
    pub enabled: bool,
    /// Upper bound on a single provider call.
    pub timeout: Duration,
}

/// Errors returned by the advisory service.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// The caller may not request advice.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    /// The feature is switched off.
    #[error("advisory suggestions are disabled")]
    Disabled,
    /// The caller exceeded the request allowance.
    #[error("too many advisory requests; try again later")]
    RateLimited,
    /// The provider did not answer in time.
    #[error("advisory provider timed out after {0:?}")]
    Timeout(Duration),
    /// The provider failed.
    #[error(transparent)]
    Unavailable(#[from] AdvisoryProviderError),
}

/// Consults the advisory provider on behalf of a principal.
#[derive(Clone)]
pub struct AdvisoryService<P, L>
where
    P: AdvisoryProvider,
    L: RateLimiter,
{
    provider: Arc<P>,
    limiter: Arc<L>,
    settings: AdvisorySettings,
}

impl<P, L> AdvisoryService<P, L>
where
    P: AdvisoryProvider,
    L: RateLimiter,
{
    /// Creates the service.
    #[must_use]
    pub const fn new(provider: Arc<P>, limiter: Arc<L>, settings: AdvisorySettings) -> Self {
        Self {
            provider,
            limiter,
            settings,
        }
    }

    /// Asks the provider for a suggestion.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::AccessDenied`] for employees, then
    /// [`AdvisoryError::Disabled`], [`AdvisoryError::RateLimited`],
    /// [`AdvisoryError::Timeout`], or [`AdvisoryError::Unavailable`] as each
    /// gate fails.
    pub async fn suggest(
        &self,
        principal: &Principal,
        request: &AdvisoryRequest,
    ) -> Result<Suggestion, AdvisoryError> {
        decide(principal, Operation::RequestAdvice, &Target::None)
            .into_result()
            .inspect_err(|denied| {
                warn!(principal = %principal.id(), reason = %denied, "advice denied");
            })?;
        if !self.settings.enabled {
            return Err(AdvisoryError::Disabled);
        }
        if !self.limiter.check(&principal.id().to_string()).await {
            warn!(principal = %principal.id(), "advice rate limited");
            return Err(AdvisoryError::RateLimited);
        }

        let outcome = tokio::time::timeout(self.settings.timeout, self.provider.suggest(request))
            .await
            .map_err(|_| {
                warn!(timeout = ?self.settings.timeout, "advisory provider timed out");
                AdvisoryError::Timeout(self.settings.timeout)
            })?;
        let suggestion = outcome.inspect_err(|err| {
            warn!(error = %err, "advisory provider failed");
        })?;
        info!(principal = %principal.id(), "advice served");
        Ok(suggestion)
    }
}
