//! Shared world state for task assignment BDD scenarios.

use std::collections::HashMap;

use overseer::{
    api::{ApiError, InMemoryBackend},
    config::{self, ServiceConfig},
    identity::domain::EmployeeId,
    stats::TaskStatistics,
    task::domain::{Task, TaskId},
};
use rstest::fixture;

/// A registered employee.
pub struct EmployeeHandle {
    /// Employee identifier.
    pub id: EmployeeId,
    /// Bearer token.
    pub token: String,
}

/// Scenario world for task assignment behaviour tests.
pub struct TaskAssignmentWorld {
    pub backend: InMemoryBackend,
    pub managers: HashMap<String, String>,
    pub employees: HashMap<String, EmployeeHandle>,
    pub tasks: HashMap<String, TaskId>,
    pub last_error: Option<ApiError>,
    pub last_statistics: Option<TaskStatistics>,
}

impl TaskAssignmentWorld {
    /// Creates a world over an empty in-memory backend.
    ///
    /// # Panics
    ///
    /// Panics if the fixed test configuration is rejected.
    #[must_use]
    pub fn new() -> Self {
        let config = ServiceConfig::from_lookup(|key| {
            (key == config::TOKEN_SECRET)
                .then(|| "bdd-scenarios-signing-secret-0123456789".to_owned())
        })
        .expect("valid scenario configuration");
        let backend = InMemoryBackend::in_memory(&config).expect("valid scenario backend");

        Self {
            backend,
            managers: HashMap::new(),
            employees: HashMap::new(),
            tasks: HashMap::new(),
            last_error: None,
            last_statistics: None,
        }
    }

    /// Returns the bearer token of a registered manager.
    ///
    /// # Errors
    ///
    /// Returns an error when the manager is unknown to the scenario.
    pub fn manager_token(&self, name: &str) -> eyre::Result<String> {
        self.managers
            .get(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("manager {name} is not registered in this scenario"))
    }

    /// Returns a registered employee.
    ///
    /// # Errors
    ///
    /// Returns an error when the employee is unknown to the scenario.
    pub fn employee(&self, name: &str) -> eyre::Result<&EmployeeHandle> {
        self.employees
            .get(name)
            .ok_or_else(|| eyre::eyre!("employee {name} is not registered in this scenario"))
    }

    /// Returns the identifier of a named task.
    ///
    /// # Errors
    ///
    /// Returns an error when the task was never created.
    pub fn task_id(&self, title: &str) -> eyre::Result<TaskId> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("task {title} was not created in this scenario"))
    }

    /// Records the outcome of a task operation.
    pub fn record(&mut self, result: Result<Task, ApiError>) {
        match result {
            Ok(task) => {
                self.tasks.insert(task.title().as_str().to_owned(), task.id());
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err),
        }
    }
}

impl Default for TaskAssignmentWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskAssignmentWorld {
    TaskAssignmentWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
