//! Logins through the default in-memory wiring with Argon2 hashing.

use super::helpers::test_config;
use overseer::{
    api::{ApiError, InMemoryBackend},
    authz::Role,
    identity::services::{CreateEmployeeRequest, RegisterManagerRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn argon2_backed_logins_round_trip() -> eyre::Result<()> {
    let backend = InMemoryBackend::in_memory(&test_config(&[])?)?;
    backend
        .register_manager(RegisterManagerRequest::new(
            "Ada",
            "ada@example.com",
            "correct horse battery",
        ))
        .await?;

    let session = backend
        .login_manager("ada@example.com", "correct horse battery")
        .await?;
    eyre::ensure!(session.principal.role() == Role::Manager);
    eyre::ensure!(
        backend
            .login_manager("ada@example.com", "incorrect horse")
            .await
            == Err(ApiError::Authentication)
    );

    backend
        .create_employee(
            &session.token,
            CreateEmployeeRequest::new("Bo", "bo@example.com", "Ops")
                .with_login("bo-password"),
        )
        .await?;
    let employee = backend
        .login_employee("bo@example.com", "bo-password")
        .await?;
    eyre::ensure!(employee.principal.role() == Role::Employee);
    Ok(())
}

#[rstest]
fn short_secret_cannot_build_a_backend() -> eyre::Result<()> {
    let mut config = test_config(&[])?;
    config.token.secret = "short".to_owned();
    eyre::ensure!(InMemoryBackend::in_memory(&config).is_err());
    Ok(())
}
