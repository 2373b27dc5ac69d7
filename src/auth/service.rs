//! Login and bearer-token resolution.

use super::{TokenError, TokenService};
use crate::authz::Principal;
use crate::identity::{
    domain::{CredentialHash, EmailAddress, Employee, EmployeeId, ManagerId, Password},
    ports::{CredentialHasher, EmployeeRepository, IdentityRepositoryError, ManagerRepository},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Errors returned by authentication.
///
/// Verification failures collapse into [`AuthenticationError::Unauthenticated`]
/// so callers never learn whether a token was expired, malformed, or names a
/// removed account.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The bearer token could not be resolved to a principal.
    #[error("authentication required")]
    Unauthenticated,
    /// The email and password do not match an account allowed to log in.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// A token could not be issued.
    #[error(transparent)]
    Token(#[from] TokenError),
    /// The identity store failed.
    #[error(transparent)]
    Repository(#[from] IdentityRepositoryError),
}

/// Password hashed once per authenticator to give unknown accounts a
/// credential to verify against.
const DECOY_PASSWORD: &str = "overseer-decoy-credential";

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Bearer token.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// Authenticated principal.
    #[serde(skip)]
    pub principal: Principal,
}

/// Resolves bearer tokens and performs password logins.
///
/// Logins for unknown or disabled accounts still run one hash verification,
/// so response time does not reveal whether an email is registered.
#[derive(Clone)]
pub struct Authenticator<M, E, H, C>
where
    M: ManagerRepository,
    E: EmployeeRepository,
    H: CredentialHasher,
    C: Clock + Send + Sync,
{
    managers: Arc<M>,
    employees: Arc<E>,
    hasher: Arc<H>,
    tokens: Arc<TokenService>,
    clock: Arc<C>,
    decoy: OnceLock<Option<CredentialHash>>,
}

impl<M, E, H, C> Authenticator<M, E, H, C>
where
    M: ManagerRepository,
    E: EmployeeRepository,
    H: CredentialHasher,
    C: Clock + Send + Sync,
{
    /// Creates an authenticator.
    #[must_use]
    pub const fn new(
        managers: Arc<M>,
        employees: Arc<E>,
        hasher: Arc<H>,
        tokens: Arc<TokenService>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            managers,
            employees,
            hasher,
            tokens,
            clock,
            decoy: OnceLock::new(),
        }
    }

    /// Resolves a bearer token to the principal it names.
    ///
    /// The subject is looked up among managers first, then among employees
    /// that still hold login access.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::Unauthenticated`] for any verification
    /// or lookup miss, or [`AuthenticationError::Repository`] when the store
    /// is unavailable.
    pub async fn resolve(&self, token: &str) -> Result<Principal, AuthenticationError> {
        let claims = self.tokens.verify(token).map_err(|err| {
            debug!(reason = %err, "token rejected");
            AuthenticationError::Unauthenticated
        })?;
        let subject = Uuid::parse_str(&claims.sub).map_err(|err| {
            debug!(reason = %err, "token subject is not a UUID");
            AuthenticationError::Unauthenticated
        })?;

        if let Some(manager) = self
            .managers
            .find_by_id(ManagerId::from_uuid(subject))
            .await?
        {
            return Ok(Principal::manager(manager.id(), manager.role()));
        }
        match self
            .employees
            .find_by_id(EmployeeId::from_uuid(subject))
            .await?
        {
            Some(employee) if employee.can_authenticate() => Ok(Principal::employee(employee.id())),
            Some(_) => {
                debug!(subject = %subject, "employee no longer has login access");
                Err(AuthenticationError::Unauthenticated)
            }
            None => {
                debug!(subject = %subject, "token subject not found");
                Err(AuthenticationError::Unauthenticated)
            }
        }
    }

    /// Logs a manager in and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidCredentials`] for an unknown
    /// email or a wrong password.
    pub async fn login_manager(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthenticationError> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(AuthenticationError::InvalidCredentials);
        };
        let account = self.managers.find_by_email(&address).await?;
        let submitted = Password::submitted(password);
        let matched = account.as_ref().map_or_else(
            || self.verify_decoy(&submitted),
            |candidate| self.hasher.verify(&submitted, candidate.credential()),
        );
        let Some(manager) = account.filter(|_| matched) else {
            warn!(email = %address, "manager login rejected");
            return Err(AuthenticationError::InvalidCredentials);
        };

        let principal = Principal::manager(manager.id(), manager.role());
        let session = self.open_session(principal)?;
        info!(manager_id = %manager.id(), "manager logged in");
        Ok(session)
    }

    /// Logs an employee with login access in and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::InvalidCredentials`] for an unknown
    /// email, a wrong password, or an employee without login access.
    pub async fn login_employee(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthenticationError> {
        let Ok(address) = EmailAddress::new(email) else {
            return Err(AuthenticationError::InvalidCredentials);
        };
        let account = self.employees.find_by_email(&address).await?;
        let submitted = Password::submitted(password);
        let matched = account
            .as_ref()
            .filter(|candidate| candidate.has_login_access())
            .and_then(Employee::credential)
            .map_or_else(
                || self.verify_decoy(&submitted),
                |hash| self.hasher.verify(&submitted, hash),
            );
        let Some(employee) = account.filter(|_| matched) else {
            warn!(email = %address, "employee login rejected");
            return Err(AuthenticationError::InvalidCredentials);
        };

        let session = self.open_session(Principal::employee(employee.id()))?;
        info!(employee_id = %employee.id(), "employee logged in");
        Ok(session)
    }

    /// Spends one verification on a login that cannot succeed. Always
    /// returns `false`.
    fn verify_decoy(&self, submitted: &Password) -> bool {
        let decoy = self.decoy.get_or_init(|| {
            self.hasher
                .hash(&Password::submitted(DECOY_PASSWORD))
                .inspect_err(|err| warn!(error = %err, "decoy credential unavailable"))
                .ok()
        });
        if let Some(hash) = decoy {
            self.hasher.verify(submitted, hash);
        }
        false
    }

    fn open_session(&self, principal: Principal) -> Result<Session, AuthenticationError> {
        let issued_at = self.clock.utc();
        let token = self.tokens.issue(principal.id(), issued_at)?;
        Ok(Session {
            token,
            expires_at: issued_at + self.tokens.ttl(),
            principal,
        })
    }
}
