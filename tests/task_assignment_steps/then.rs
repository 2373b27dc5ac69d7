//! Then steps for task assignment BDD scenarios.

use super::world::{TaskAssignmentWorld, run_async};
use overseer::{
    api::ApiError,
    stats::TaskStatistics,
    task::domain::{Task, TaskStatus},
};
use rstest_bdd_macros::then;

fn load(world: &TaskAssignmentWorld, title: &str) -> eyre::Result<Task> {
    let id = world.task_id(title)?;
    world
        .managers
        .values()
        .find_map(|token| run_async(world.backend.get_task(token, id)).ok())
        .ok_or_else(|| eyre::eyre!("no manager in this scenario can read task {title}"))
}

#[then(r#"task "{title}" is "{status}""#)]
fn task_status_is(
    world: &TaskAssignmentWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = load(world, &title)?;
    eyre::ensure!(
        task.status() == expected,
        "expected {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"task "{title}" was assigned by "{manager}""#)]
fn task_assigned_by(
    world: &TaskAssignmentWorld,
    title: String,
    manager: String,
) -> Result<(), eyre::Report> {
    let token = world.manager_token(&manager)?;
    let id = world.task_id(&title)?;
    let task = run_async(world.backend.get_task(&token, id))?;
    let listed = run_async(world.backend.list_tasks(&token))?;
    eyre::ensure!(
        listed.iter().any(|candidate| candidate.id() == task.id()),
        "task {title} is not in {manager}'s assigned list"
    );
    Ok(())
}

#[then(r#"task "{title}" has rating {rating:u8}"#)]
fn task_has_rating(
    world: &TaskAssignmentWorld,
    title: String,
    rating: u8,
) -> Result<(), eyre::Report> {
    let task = load(world, &title)?;
    let actual = task.review().map(|review| review.rating().value());
    eyre::ensure!(actual == Some(rating), "expected rating {rating}, found {actual:?}");
    Ok(())
}

#[then(r#"the request is denied with "{message}""#)]
fn request_denied(world: &TaskAssignmentWorld, message: String) -> Result<(), eyre::Report> {
    let expected = ApiError::Authorization { message };
    eyre::ensure!(
        world.last_error.as_ref() == Some(&expected),
        "expected {expected:?}, got {:?}",
        world.last_error
    );
    Ok(())
}

#[then("the request fails with a state conflict")]
fn request_conflicts(world: &TaskAssignmentWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        matches!(world.last_error, Some(ApiError::StateConflict { .. })),
        "expected a state conflict, got {:?}",
        world.last_error
    );
    Ok(())
}

#[then(r#"manager "{manager}" has {count:u64} tasks assigned"#)]
fn manager_task_count(
    world: &TaskAssignmentWorld,
    manager: String,
    count: u64,
) -> Result<(), eyre::Report> {
    let token = world.manager_token(&manager)?;
    let listed = run_async(world.backend.list_tasks(&token))?;
    eyre::ensure!(u64::try_from(listed.len())? == count);
    Ok(())
}

#[then("the statistics report {count:u64} tasks assigned")]
fn statistics_total(world: &TaskAssignmentWorld, count: u64) -> Result<(), eyre::Report> {
    let Some(TaskStatistics::Manager(stats)) = world.last_statistics else {
        return Err(eyre::eyre!("expected manager statistics, got {:?}", world.last_statistics));
    };
    eyre::ensure!(u64::try_from(stats.total_assigned)? == count);
    eyre::ensure!(
        stats.pending + stats.in_progress + stats.pending_review + stats.completed
            == stats.total_assigned
    );
    Ok(())
}
