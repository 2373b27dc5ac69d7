//! Tests for password login and token resolution.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::token_tests::config;
use crate::auth::{AuthenticationError, Authenticator, TokenService};
use crate::authz::{Principal, Role};
use crate::identity::{
    adapters::memory::{InMemoryEmployeeRepository, InMemoryManagerRepository},
    domain::{CredentialHash, Password},
    ports::{CredentialHashError, CredentialHasher},
    services::{
        CreateEmployeeRequest, IdentityService, RegisterManagerRequest, UpdateEmployeeRequest,
    },
    tests::FakeHasher,
};
use chrono::{Duration, Utc};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use uuid::Uuid;

type TestAuthenticator = Authenticator<
    InMemoryManagerRepository,
    InMemoryEmployeeRepository,
    FakeHasher,
    DefaultClock,
>;
type TestIdentity = IdentityService<
    InMemoryManagerRepository,
    InMemoryEmployeeRepository,
    FakeHasher,
    DefaultClock,
>;

struct Harness {
    auth: TestAuthenticator,
    identity: TestIdentity,
    tokens: Arc<TokenService>,
}

#[fixture]
fn harness() -> Harness {
    let managers = Arc::new(InMemoryManagerRepository::new());
    let employees = Arc::new(InMemoryEmployeeRepository::new());
    let hasher = Arc::new(FakeHasher);
    let clock = Arc::new(DefaultClock);
    let tokens = Arc::new(TokenService::new(config()).expect("valid token config"));
    Harness {
        auth: Authenticator::new(
            Arc::clone(&managers),
            Arc::clone(&employees),
            Arc::clone(&hasher),
            Arc::clone(&tokens),
            Arc::clone(&clock),
        ),
        identity: IdentityService::new(managers, employees, hasher, clock),
        tokens,
    }
}

async fn seed_manager(harness: &Harness) -> eyre::Result<Principal> {
    let manager = harness
        .identity
        .register_manager(RegisterManagerRequest::new(
            "Mona",
            "mona@example.com",
            "mona-password",
        ))
        .await?;
    Ok(Principal::manager(manager.id(), manager.role()))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_login_round_trips_through_resolve(harness: Harness) -> eyre::Result<()> {
    let principal = seed_manager(&harness).await?;

    let session = harness
        .auth
        .login_manager("MONA@example.com", "mona-password")
        .await?;
    let resolved = harness.auth.resolve(&session.token).await?;

    ensure!(resolved == principal);
    ensure!(resolved.role() == Role::Manager);
    ensure!(session.expires_at > Utc::now());
    Ok(())
}

#[rstest]
#[case("mona@example.com", "wrong-password")]
#[case("nobody@example.com", "mona-password")]
#[case("not an email", "mona-password")]
#[tokio::test(flavor = "multi_thread")]
async fn bad_manager_credentials_are_uniform(
    harness: Harness,
    #[case] email: &str,
    #[case] password: &str,
) -> eyre::Result<()> {
    seed_manager(&harness).await?;
    let result = harness.auth.login_manager(email, password).await;
    ensure!(matches!(result, Err(AuthenticationError::InvalidCredentials)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employee_login_requires_login_access(harness: Harness) -> eyre::Result<()> {
    let owner = seed_manager(&harness).await?;
    let employee = harness
        .identity
        .create_employee(
            &owner,
            CreateEmployeeRequest::new("Eli", "eli@example.com", "Ops").with_login("eli-password"),
        )
        .await?;

    let session = harness
        .auth
        .login_employee("eli@example.com", "eli-password")
        .await?;
    ensure!(harness.auth.resolve(&session.token).await? == Principal::employee(employee.id()));

    harness
        .identity
        .update_employee(
            &owner,
            employee.id(),
            UpdateEmployeeRequest::new().with_login_access(false),
        )
        .await?;

    let relogin = harness
        .auth
        .login_employee("eli@example.com", "eli-password")
        .await;
    let stale = harness.auth.resolve(&session.token).await;
    ensure!(matches!(relogin, Err(AuthenticationError::InvalidCredentials)));
    ensure!(matches!(stale, Err(AuthenticationError::Unauthenticated)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employee_without_credential_cannot_log_in(harness: Harness) -> eyre::Result<()> {
    let owner = seed_manager(&harness).await?;
    harness
        .identity
        .create_employee(
            &owner,
            CreateEmployeeRequest::new("Fay", "fay@example.com", "Ops"),
        )
        .await?;

    let result = harness.auth.login_employee("fay@example.com", "").await;
    ensure!(matches!(result, Err(AuthenticationError::InvalidCredentials)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_token_failure_is_unauthenticated(harness: Harness) -> eyre::Result<()> {
    let expired = harness
        .tokens
        .issue(Uuid::new_v4(), Utc::now() - Duration::days(2))?;
    let unknown_subject = harness.tokens.issue(Uuid::new_v4(), Utc::now())?;

    for token in [expired.as_str(), unknown_subject.as_str(), "garbage"] {
        let Err(err) = harness.auth.resolve(token).await else {
            bail!("token {token} should not resolve");
        };
        ensure!(matches!(err, AuthenticationError::Unauthenticated));
        ensure!(err.to_string() == "authentication required");
    }
    Ok(())
}

/// Counts hashing work on top of [`FakeHasher`].
#[derive(Default)]
struct CountingHasher {
    hashes: AtomicUsize,
    verifications: AtomicUsize,
}

impl CredentialHasher for CountingHasher {
    fn hash(&self, password: &Password) -> Result<CredentialHash, CredentialHashError> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        FakeHasher.hash(password)
    }

    fn verify(&self, password: &Password, hash: &CredentialHash) -> bool {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        FakeHasher.verify(password, hash)
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_accounts_still_cost_a_verification() -> eyre::Result<()> {
    let managers = Arc::new(InMemoryManagerRepository::new());
    let employees = Arc::new(InMemoryEmployeeRepository::new());
    let hasher = Arc::new(CountingHasher::default());
    let clock = Arc::new(DefaultClock);
    let identity = IdentityService::new(
        Arc::clone(&managers),
        Arc::clone(&employees),
        Arc::clone(&hasher),
        Arc::clone(&clock),
    );
    let auth = Authenticator::new(
        managers,
        employees,
        Arc::clone(&hasher),
        Arc::new(TokenService::new(config())?),
        clock,
    );
    let manager = identity
        .register_manager(RegisterManagerRequest::new("Nia", "nia@example.com", "nia-password"))
        .await?;
    identity
        .create_employee(
            &Principal::manager(manager.id(), manager.role()),
            CreateEmployeeRequest::new("Oto", "oto@example.com", "Ops"),
        )
        .await?;
    let hashes_before = hasher.hashes.load(Ordering::SeqCst);

    let ghost_manager = auth.login_manager("ghost@example.com", "whatever").await;
    let ghost_employee = auth.login_employee("ghost@example.com", "whatever").await;
    let no_access = auth.login_employee("oto@example.com", "whatever").await;

    for result in [ghost_manager, ghost_employee, no_access] {
        ensure!(matches!(result, Err(AuthenticationError::InvalidCredentials)));
    }
    ensure!(hasher.verifications.load(Ordering::SeqCst) == 3);
    // The decoy credential is hashed once and reused.
    ensure!(hasher.hashes.load(Ordering::SeqCst) == hashes_before + 1);
    Ok(())
}
