//! When steps for task assignment BDD scenarios.

use super::world::{TaskAssignmentWorld, run_async};
use chrono::{Duration, Utc};
use overseer::task::services::{CreateTaskRequest, ReviewTaskRequest, UpdateStatusRequest};
use rstest_bdd_macros::when;

#[when(r#"manager "{manager}" assigns task "{title}" to "{employee}""#)]
fn assign_task(
    world: &mut TaskAssignmentWorld,
    manager: String,
    title: String,
    employee: String,
) -> Result<(), eyre::Report> {
    let token = world.manager_token(&manager)?;
    let assignee = world.employee(&employee)?.id;
    let result = run_async(world.backend.create_task(
        &token,
        CreateTaskRequest::new(title, assignee, Utc::now() + Duration::days(3)),
    ));
    world.record(result);
    Ok(())
}

#[when(r#"employee "{employee}" sets task "{title}" to "{status}""#)]
fn set_status(
    world: &mut TaskAssignmentWorld,
    employee: String,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let token = world.employee(&employee)?.token.clone();
    let id = world.task_id(&title)?;
    let result = run_async(world.backend.update_task_status(
        &token,
        id,
        UpdateStatusRequest::new(status),
    ));
    world.record(result);
    Ok(())
}

#[when(r#"manager "{manager}" reviews task "{title}" with rating {rating:u8} and feedback "{feedback}""#)]
fn review(
    world: &mut TaskAssignmentWorld,
    manager: String,
    title: String,
    rating: u8,
    feedback: String,
) -> Result<(), eyre::Report> {
    let token = world.manager_token(&manager)?;
    let id = world.task_id(&title)?;
    let result = run_async(world.backend.review_task(
        &token,
        id,
        ReviewTaskRequest::new(feedback, rating),
    ));
    world.record(result);
    Ok(())
}

#[when(r#"manager "{manager}" requests statistics"#)]
fn request_statistics(
    world: &mut TaskAssignmentWorld,
    manager: String,
) -> Result<(), eyre::Report> {
    let token = world.manager_token(&manager)?;
    let statistics = run_async(world.backend.task_statistics(&token))?;
    world.last_statistics = Some(statistics);
    Ok(())
}
