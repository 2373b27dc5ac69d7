//! In-memory integration tests for employee management.

use super::helpers::{TestBackend, backend, employee, manager};
use overseer::{
    api::ApiError,
    identity::services::{
        ChangePasswordRequest, CreateEmployeeRequest, RegisterManagerRequest,
        UpdateEmployeeRequest, UpdateProfileRequest,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn managers_only_see_their_own_employees(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let nils = manager(&backend, "Nils").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    employee(&backend, &nils, "Finn").await?;

    let listed = backend.list_employees(&mona.token).await?;
    eyre::ensure!(listed.len() == 1);
    eyre::ensure!(listed.first().map(|record| record.id()) == Some(eve.id));

    let foreign = backend.get_employee(&nils.token, eve.id).await;
    eyre::ensure!(
        foreign
            == Err(ApiError::Authorization {
                message: "not found or unauthorized".to_owned()
            })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employee_reads_only_itself(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    let gus = employee(&backend, &mona, "Gus").await?;

    eyre::ensure!(backend.get_employee(&eve.token, eve.id).await?.id() == eve.id);
    eyre::ensure!(matches!(
        backend.get_employee(&eve.token, gus.id).await,
        Err(ApiError::Authorization { .. })
    ));
    eyre::ensure!(matches!(
        backend.list_employees(&eve.token).await,
        Err(ApiError::Authorization { .. })
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owner_updates_keep_ownership(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    let before = backend.get_employee(&mona.token, eve.id).await?;

    let updated = backend
        .update_employee(
            &mona.token,
            eve.id,
            UpdateEmployeeRequest::new()
                .with_job_title("Lead Engineer")
                .with_salary(90_000),
        )
        .await?;

    eyre::ensure!(updated.owner_id() == before.owner_id());
    eyre::ensure!(updated.job_title() == "Lead Engineer");
    eyre::ensure!(updated.salary() == Some(90_000));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn profile_updates_are_self_service_only(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let eve = employee(&backend, &mona, "Eve").await?;

    let profile = backend
        .update_own_profile(
            &eve.token,
            UpdateProfileRequest::new().with_mobile("+44 20 7946 0000"),
        )
        .await?;
    eyre::ensure!(profile.mobile().map(|mobile| mobile.as_str()) == Some("+44 20 7946 0000"));

    let by_manager = backend
        .update_own_profile(&mona.token, UpdateProfileRequest::new().with_name("Mona"))
        .await;
    eyre::ensure!(matches!(by_manager, Err(ApiError::Authorization { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_emails_are_rejected(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    employee(&backend, &mona, "Eve").await?;

    let again = backend
        .register_manager(RegisterManagerRequest::new(
            "Mona Two",
            "MONA@example.com",
            "another-password",
        ))
        .await;
    let clash = backend
        .create_employee(
            &mona.token,
            CreateEmployeeRequest::new("Eve Two", "eve@example.com", "Analyst"),
        )
        .await;

    eyre::ensure!(matches!(again, Err(ApiError::Validation { .. })));
    eyre::ensure!(matches!(clash, Err(ApiError::Validation { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn password_change_requires_current_password(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;

    let wrong = backend
        .change_password(
            &mona.token,
            ChangePasswordRequest::new("not-my-password", "brand-new-password"),
        )
        .await;
    eyre::ensure!(matches!(wrong, Err(ApiError::Validation { .. })));

    backend
        .change_password(
            &mona.token,
            ChangePasswordRequest::new("Mona-password", "brand-new-password"),
        )
        .await?;
    eyre::ensure!(
        backend
            .login_manager("mona@example.com", "Mona-password")
            .await
            == Err(ApiError::Authentication)
    );
    backend
        .login_manager("mona@example.com", "brand-new-password")
        .await?;
    Ok(())
}
