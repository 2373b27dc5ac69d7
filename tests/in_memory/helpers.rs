//! Shared helpers for in-memory backend integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use mockable::DefaultClock;
use overseer::{
    advisory::adapters::{HeuristicAdvisor, SlidingWindowRateLimiter},
    api::{ApiError, Backend, BackendParts},
    config::{self, ServiceConfig},
    identity::{
        adapters::memory::{InMemoryEmployeeRepository, InMemoryManagerRepository},
        domain::{CredentialHash, EmployeeId, Password},
        ports::{CredentialHashError, CredentialHasher},
        services::{CreateEmployeeRequest, RegisterManagerRequest},
    },
    task::{adapters::memory::InMemoryTaskRepository, domain::Task, services::CreateTaskRequest},
};
use rstest::fixture;

/// Reversible hasher that keeps integration tests fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &Password) -> Result<CredentialHash, CredentialHashError> {
        Ok(CredentialHash::from_encoded(format!(
            "plain:{}",
            password.expose()
        )))
    }

    fn verify(&self, password: &Password, hash: &CredentialHash) -> bool {
        hash.as_str()
            .strip_prefix("plain:")
            .is_some_and(|stored| stored == password.expose())
    }
}

/// Backend type used by the integration tests.
pub type TestBackend = Backend<
    InMemoryManagerRepository,
    InMemoryEmployeeRepository,
    InMemoryTaskRepository,
    PlainHasher,
    HeuristicAdvisor<DefaultClock>,
    SlidingWindowRateLimiter<DefaultClock>,
    DefaultClock,
>;

/// Signing secret shared by the integration tests.
pub const SECRET: &str = "integration-tests-signing-secret-0123456789";

/// Builds configuration from the given overrides on top of the secret.
///
/// # Errors
///
/// Returns an error when an override is invalid.
pub fn test_config(overrides: &[(&str, &str)]) -> eyre::Result<ServiceConfig> {
    let mut vars: HashMap<&str, &str> = HashMap::from([(config::TOKEN_SECRET, SECRET)]);
    vars.extend(overrides.iter().copied());
    Ok(ServiceConfig::from_lookup(|key| {
        vars.get(key).map(|value| (*value).to_owned())
    })?)
}

/// Provides a backend over fresh in-memory stores.
#[fixture]
pub fn backend() -> TestBackend {
    let config = test_config(&[(config::ADVISORY_ENABLED, "true")])
        .expect("valid integration configuration");
    let clock = Arc::new(DefaultClock);
    Backend::new(
        BackendParts {
            managers: Arc::new(InMemoryManagerRepository::new()),
            employees: Arc::new(InMemoryEmployeeRepository::new()),
            tasks: Arc::new(InMemoryTaskRepository::new()),
            hasher: Arc::new(PlainHasher),
            advisor: Arc::new(HeuristicAdvisor::new(Arc::clone(&clock))),
            limiter: Arc::new(SlidingWindowRateLimiter::new(
                config.advisory.window,
                Arc::clone(&clock),
            )),
            clock,
        },
        &config,
    )
    .expect("valid integration backend")
}

/// A logged-in manager.
pub struct ManagerAccount {
    /// Bearer token.
    pub token: String,
}

/// A logged-in employee.
pub struct EmployeeAccount {
    /// Employee identifier.
    pub id: EmployeeId,
    /// Bearer token.
    pub token: String,
}

/// Registers a manager and logs it in.
///
/// # Errors
///
/// Returns an error when registration or login fails.
pub async fn manager(backend: &TestBackend, name: &str) -> eyre::Result<ManagerAccount> {
    let email = format!("{}@example.com", name.to_lowercase());
    let password = format!("{name}-password");
    backend
        .register_manager(RegisterManagerRequest::new(name, email.as_str(), password.as_str()))
        .await?;
    let session = backend.login_manager(&email, &password).await?;
    Ok(ManagerAccount {
        token: session.token,
    })
}

/// Creates an employee with login access under `owner` and logs it in.
///
/// # Errors
///
/// Returns an error when creation or login fails.
pub async fn employee(
    backend: &TestBackend,
    owner: &ManagerAccount,
    name: &str,
) -> eyre::Result<EmployeeAccount> {
    let email = format!("{}@example.com", name.to_lowercase());
    let password = format!("{name}-password");
    let record = backend
        .create_employee(
            &owner.token,
            CreateEmployeeRequest::new(name, email.as_str(), "Engineer")
                .with_login(password.as_str()),
        )
        .await?;
    let session = backend.login_employee(&email, &password).await?;
    Ok(EmployeeAccount {
        id: record.id(),
        token: session.token,
    })
}

/// Assigns a task due in three days.
///
/// # Errors
///
/// Returns the facade error when assignment fails.
pub async fn assign(
    backend: &TestBackend,
    owner: &ManagerAccount,
    assignee: EmployeeId,
    title: &str,
) -> Result<Task, ApiError> {
    backend
        .create_task(
            &owner.token,
            CreateTaskRequest::new(title, assignee, Utc::now() + Duration::days(3)),
        )
        .await
}
