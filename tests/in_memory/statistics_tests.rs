//! In-memory integration tests for task statistics.

use super::helpers::{TestBackend, assign, backend, employee, manager};
use overseer::{
    stats::TaskStatistics,
    task::services::{ReviewTaskRequest, UpdateStatusRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_counts_reconcile_with_assigned_tasks(backend: TestBackend) -> eyre::Result<()> {
    let mona = manager(&backend, "Mona").await?;
    let nils = manager(&backend, "Nils").await?;
    let eve = employee(&backend, &mona, "Eve").await?;
    let finn = employee(&backend, &nils, "Finn").await?;

    let pending = assign(&backend, &mona, eve.id, "Pending task").await?;
    let active = assign(&backend, &mona, eve.id, "Active task").await?;
    let done = assign(&backend, &mona, eve.id, "Done task").await?;
    assign(&backend, &nils, finn.id, "Someone else's").await?;

    backend
        .update_task_status(&eve.token, active.id(), UpdateStatusRequest::new("In Progress"))
        .await?;
    for status in ["In Progress", "Completed"] {
        backend
            .update_task_status(&eve.token, done.id(), UpdateStatusRequest::new(status))
            .await?;
    }
    backend
        .review_task(&mona.token, done.id(), ReviewTaskRequest::new("Nice", 4))
        .await?;

    let TaskStatistics::Manager(stats) = backend.task_statistics(&mona.token).await? else {
        eyre::bail!("expected the manager view");
    };
    eyre::ensure!(stats.total_assigned == 3);
    eyre::ensure!(stats.pending == 1 && stats.in_progress == 1);
    eyre::ensure!(stats.pending_review == 0 && stats.completed == 1);
    eyre::ensure!(
        stats.pending + stats.in_progress + stats.pending_review + stats.completed
            == stats.total_assigned
    );

    let TaskStatistics::Employee(mine) = backend.task_statistics(&eve.token).await? else {
        eyre::bail!("expected the employee view");
    };
    eyre::ensure!(mine.total_tasks == 3 && mine.completed == 1);
    eyre::ensure!(backend.get_task(&mona.token, pending.id()).await?.id() == pending.id());
    Ok(())
}
