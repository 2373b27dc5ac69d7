//! Given steps for task assignment BDD scenarios.

use super::world::{EmployeeHandle, TaskAssignmentWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use overseer::{
    identity::services::{CreateEmployeeRequest, RegisterManagerRequest},
    task::services::CreateTaskRequest,
};
use rstest_bdd_macros::given;

fn email_for(name: &str) -> String {
    format!("{}@example.com", name.to_lowercase())
}

fn password_for(name: &str) -> String {
    format!("{}-secret-pass", name.to_lowercase())
}

pub(super) fn ensure_manager(world: &mut TaskAssignmentWorld, name: &str) -> eyre::Result<String> {
    if let Some(token) = world.managers.get(name) {
        return Ok(token.clone());
    }
    let email = email_for(name);
    let password = password_for(name);
    run_async(world.backend.register_manager(RegisterManagerRequest::new(
        name,
        email.as_str(),
        password.as_str(),
    )))
    .wrap_err_with(|| format!("register manager {name}"))?;
    let session = run_async(world.backend.login_manager(&email, &password))
        .wrap_err_with(|| format!("log in manager {name}"))?;
    world.managers.insert(name.to_owned(), session.token.clone());
    Ok(session.token)
}

#[given(r#"manager "{name}" is registered"#)]
fn manager_registered(world: &mut TaskAssignmentWorld, name: String) -> Result<(), eyre::Report> {
    ensure_manager(world, &name)?;
    Ok(())
}

#[given(r#"manager "{manager}" employs "{employee}""#)]
fn manager_employs(
    world: &mut TaskAssignmentWorld,
    manager: String,
    employee: String,
) -> Result<(), eyre::Report> {
    let token = ensure_manager(world, &manager)?;
    let email = email_for(&employee);
    let password = password_for(&employee);
    let record = run_async(world.backend.create_employee(
        &token,
        CreateEmployeeRequest::new(employee.as_str(), email.as_str(), "Associate")
            .with_login(password.as_str()),
    ))
    .wrap_err_with(|| format!("create employee {employee}"))?;
    let session = run_async(world.backend.login_employee(&email, &password))
        .wrap_err_with(|| format!("log in employee {employee}"))?;
    world.employees.insert(
        employee,
        EmployeeHandle {
            id: record.id(),
            token: session.token,
        },
    );
    Ok(())
}

#[given(r#"manager "{manager}" has assigned task "{title}" to "{employee}""#)]
fn task_assigned(
    world: &mut TaskAssignmentWorld,
    manager: String,
    title: String,
    employee: String,
) -> Result<(), eyre::Report> {
    let token = world.manager_token(&manager)?;
    let assignee = world.employee(&employee)?.id;
    let task = run_async(world.backend.create_task(
        &token,
        CreateTaskRequest::new(title.as_str(), assignee, Utc::now() + Duration::days(3)),
    ))
    .wrap_err_with(|| format!("assign task {title}"))?;
    world.tasks.insert(title, task.id());
    Ok(())
}
