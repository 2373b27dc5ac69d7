//! In-memory integration tests for task assignment and lifecycle.

use super::helpers::{TestBackend, assign, backend, employee, manager};
use chrono::{Duration, Utc};
use overseer::{
    api::ApiError,
    task::{
        domain::{Priority, TaskStatus},
        services::{EditTaskRequest, ReviewTaskRequest, UpdateStatusRequest},
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_moves_task_forward_and_assigner_reviews(
    backend: TestBackend,
) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    let task = assign(&backend, &mona, eve.id, "Ship release notes").await?;

    backend
        .update_task_status(&eve.token, task.id(), UpdateStatusRequest::new("in_progress"))
        .await?;
    let completed = backend
        .update_task_status(
            &eve.token,
            task.id(),
            UpdateStatusRequest::new("Completed")
                .with_attachments(["https://files.example.com/notes.pdf".to_owned()]),
        )
        .await?;
    eyre::ensure!(completed.attachments().len() == 1);

    let reviewed = backend
        .review_task(&mona.token, task.id(), ReviewTaskRequest::new("Clear and complete", 5))
        .await?;
    eyre::ensure!(reviewed.status() == TaskStatus::Reviewed);
    eyre::ensure!(reviewed.review().map(|review| review.rating().value()) == Some(5));
    eyre::ensure!(reviewed.version() == 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skipped_and_backward_steps_conflict(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    let task = assign(&backend, &mona, eve.id, "Tidy backlog").await?;

    let skipped = backend
        .update_task_status(&eve.token, task.id(), UpdateStatusRequest::new("completed"))
        .await;
    eyre::ensure!(matches!(skipped, Err(ApiError::StateConflict { .. })));

    let self_review = backend
        .update_task_status(&eve.token, task.id(), UpdateStatusRequest::new("reviewed"))
        .await;
    eyre::ensure!(matches!(self_review, Err(ApiError::StateConflict { .. })));

    let unknown = backend
        .update_task_status(&eve.token, task.id(), UpdateStatusRequest::new("done"))
        .await;
    eyre::ensure!(matches!(unknown, Err(ApiError::Validation { .. })));

    let unchanged = backend.get_task(&mona.token, task.id()).await?;
    eyre::ensure!(unchanged.status() == TaskStatus::Pending);
    eyre::ensure!(unchanged.version() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_requires_completion(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    let task = assign(&backend, &mona, eve.id, "Update wiki").await?;

    let early = backend
        .review_task(&mona.token, task.id(), ReviewTaskRequest::new("Too soon", 3))
        .await;
    eyre::ensure!(matches!(early, Err(ApiError::StateConflict { .. })));

    let out_of_range = backend
        .review_task(&mona.token, task.id(), ReviewTaskRequest::new("Great", 6))
        .await;
    eyre::ensure!(matches!(out_of_range, Err(ApiError::Validation { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_assigner_reviews_edits_and_deletes(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let nils = manager(&backend, "Nils").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    let task = assign(&backend, &mona, eve.id, "Renew certificates").await?;

    let edit = backend
        .edit_task(&nils.token, task.id(), EditTaskRequest::new().with_title("Hijacked"))
        .await;
    let delete = backend.delete_task(&nils.token, task.id()).await;
    let by_employee = backend
        .edit_task(&eve.token, task.id(), EditTaskRequest::new().with_title("Mine now"))
        .await;

    eyre::ensure!(
        edit == Err(ApiError::Authorization {
            message: "not found or unauthorized".to_owned()
        })
    );
    eyre::ensure!(matches!(delete, Err(ApiError::Authorization { .. })));
    eyre::ensure!(
        by_employee
            == Err(ApiError::Authorization {
                message: "access denied: admin or manager only".to_owned()
            })
    );
    eyre::ensure!(backend.get_task(&mona.token, task.id()).await? == task);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edits_validate_deadline_and_reassignment(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let nils = manager(&backend, "Nils").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    let gus = employee(&backend, &mona, "Gus").await?;
    let finn = employee(&backend, &nils, "Finn").await?;
    let task = assign(&backend, &mona, eve.id, "Prepare demo").await?;

    let past = backend
        .edit_task(
            &mona.token,
            task.id(),
            EditTaskRequest::new().with_deadline(Utc::now() - Duration::hours(1)),
        )
        .await;
    eyre::ensure!(matches!(past, Err(ApiError::Validation { .. })));

    let foreign = backend
        .edit_task(&mona.token, task.id(), EditTaskRequest::new().with_assignee(finn.id))
        .await;
    eyre::ensure!(
        foreign
            == Err(ApiError::Authorization {
                message: "you can only assign tasks to your own employees".to_owned()
            })
    );

    let moved = backend
        .edit_task(
            &mona.token,
            task.id(),
            EditTaskRequest::new()
                .with_assignee(gus.id)
                .with_priority(Priority::High),
        )
        .await?;
    eyre::ensure!(moved.assigned_to() == gus.id);
    eyre::ensure!(backend.list_tasks(&eve.token).await?.is_empty());
    eyre::ensure!(backend.list_tasks(&gus.token).await?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reviewed_tasks_are_frozen_but_deletable(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    let task = assign(&backend, &mona, eve.id, "Close quarter").await?;
    for status in ["In Progress", "Completed"] {
        backend
            .update_task_status(&eve.token, task.id(), UpdateStatusRequest::new(status))
            .await?;
    }
    backend
        .review_task(&mona.token, task.id(), ReviewTaskRequest::new("Done well", 4))
        .await?;

    let edit = backend
        .edit_task(&mona.token, task.id(), EditTaskRequest::new().with_title("Reopen"))
        .await;
    eyre::ensure!(matches!(edit, Err(ApiError::StateConflict { .. })));

    backend.delete_task(&mona.token, task.id()).await?;
    eyre::ensure!(backend.list_tasks(&mona.token).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_assignee_is_not_found(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let result = assign(
        &backend,
        &mona,
        overseer::identity::domain::EmployeeId::new(),
        "Orphan",
    )
    .await;
    eyre::ensure!(matches!(result, Err(ApiError::NotFound { .. })));
    Ok(())
}
