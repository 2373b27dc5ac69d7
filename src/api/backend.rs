//! One entry point per caller-visible operation.

use super::ApiError;
use crate::advisory::{
    adapters::{HeuristicAdvisor, SlidingWindowRateLimiter},
    domain::{AdvisoryRequest, Suggestion},
    ports::{AdvisoryProvider, RateLimiter},
    services::AdvisoryService,
};
use crate::auth::{Authenticator, Session, TokenError, TokenService};
use crate::authz::Principal;
use crate::config::ServiceConfig;
use crate::identity::{
    adapters::{
        Argon2CredentialHasher,
        memory::{InMemoryEmployeeRepository, InMemoryManagerRepository},
    },
    domain::{Employee, EmployeeId, Manager},
    ports::{CredentialHasher, EmployeeRepository, ManagerRepository},
    services::{
        ChangePasswordRequest, CreateEmployeeRequest, IdentityService, RegisterManagerRequest,
        UpdateEmployeeRequest, UpdateProfileRequest,
    },
};
use crate::stats::{StatisticsService, TaskStatistics};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId},
    ports::TaskRepository,
    services::{
        CreateTaskRequest, EditTaskRequest, ReviewTaskRequest, TaskLifecycleService,
        UpdateStatusRequest,
    },
};
use mockable::{Clock, DefaultClock};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Collaborators a [`Backend`] is assembled from.
pub struct BackendParts<M, E, T, H, P, L, C> {
    /// Manager store.
    pub managers: Arc<M>,
    /// Employee store.
    pub employees: Arc<E>,
    /// Task store.
    pub tasks: Arc<T>,
    /// Credential hasher.
    pub hasher: Arc<H>,
    /// Advisory provider.
    pub advisor: Arc<P>,
    /// Advisory rate limiter.
    pub limiter: Arc<L>,
    /// Time source.
    pub clock: Arc<C>,
}

/// Outcome of deleting an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeRemoval {
    /// The removed record.
    pub employee: Employee,
    /// Tasks that were assigned to the employee and removed with it.
    pub tasks_removed: usize,
}

/// Backend wired to in-process stores, Argon2, and the offline advisor.
pub type InMemoryBackend = Backend<
    InMemoryManagerRepository,
    InMemoryEmployeeRepository,
    InMemoryTaskRepository,
    Argon2CredentialHasher,
    HeuristicAdvisor<DefaultClock>,
    SlidingWindowRateLimiter<DefaultClock>,
    DefaultClock,
>;

/// Authenticates callers and dispatches to the context services.
///
/// Authenticated operations take a bearer token, with or without the
/// `Bearer ` prefix. Every store access runs under the configured timeout.
pub struct Backend<M, E, T, H, P, L, C>
where
    M: ManagerRepository,
    E: EmployeeRepository,
    T: TaskRepository,
    H: CredentialHasher,
    P: AdvisoryProvider,
    L: RateLimiter,
    C: Clock + Send + Sync,
{
    auth: Authenticator<M, E, H, C>,
    identity: IdentityService<M, E, H, C>,
    tasks: TaskLifecycleService<T, E, C>,
    stats: StatisticsService<T>,
    advisory: AdvisoryService<P, L>,
    store_timeout: Duration,
}

impl InMemoryBackend {
    /// Builds a backend over empty in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::WeakSecret`] for a short signing secret.
    pub fn in_memory(config: &ServiceConfig) -> Result<Self, TokenError> {
        let clock = Arc::new(DefaultClock);
        Self::new(
            BackendParts {
                managers: Arc::new(InMemoryManagerRepository::new()),
                employees: Arc::new(InMemoryEmployeeRepository::new()),
                tasks: Arc::new(InMemoryTaskRepository::new()),
                hasher: Arc::new(Argon2CredentialHasher::new()),
                advisor: Arc::new(HeuristicAdvisor::new(Arc::clone(&clock))),
                limiter: Arc::new(SlidingWindowRateLimiter::new(
                    config.advisory.window,
                    Arc::clone(&clock),
                )),
                clock,
            },
            config,
        )
    }
}

impl<M, E, T, H, P, L, C> Backend<M, E, T, H, P, L, C>
where
    M: ManagerRepository,
    E: EmployeeRepository,
    T: TaskRepository,
    H: CredentialHasher,
    P: AdvisoryProvider,
    L: RateLimiter,
    C: Clock + Send + Sync,
{
    /// Assembles a backend.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::WeakSecret`] for a short signing secret.
    pub fn new(
        parts: BackendParts<M, E, T, H, P, L, C>,
        config: &ServiceConfig,
    ) -> Result<Self, TokenError> {
        let BackendParts {
            managers,
            employees,
            tasks,
            hasher,
            advisor,
            limiter,
            clock,
        } = parts;
        let tokens = Arc::new(TokenService::new(config.token.clone())?);

        Ok(Self {
            auth: Authenticator::new(
                Arc::clone(&managers),
                Arc::clone(&employees),
                Arc::clone(&hasher),
                tokens,
                Arc::clone(&clock),
            ),
            identity: IdentityService::new(
                managers,
                Arc::clone(&employees),
                hasher,
                Arc::clone(&clock),
            ),
            tasks: TaskLifecycleService::new(Arc::clone(&tasks), employees, clock),
            stats: StatisticsService::new(tasks),
            advisory: AdvisoryService::new(advisor, limiter, config.advisory.settings()),
            store_timeout: config.store_timeout,
        })
    }

    /// Registers a manager account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for malformed input or a taken email.
    pub async fn register_manager(
        &self,
        request: RegisterManagerRequest,
    ) -> Result<Manager, ApiError> {
        self.bounded(async { Ok(self.identity.register_manager(request).await?) })
            .await
    }

    /// Logs a manager in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] for wrong credentials.
    pub async fn login_manager(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        self.bounded(async { Ok(self.auth.login_manager(email, password).await?) })
            .await
    }

    /// Logs an employee with login access in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] for wrong credentials or an
    /// employee without login access.
    pub async fn login_employee(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        self.bounded(async { Ok(self.auth.login_employee(email, password).await?) })
            .await
    }

    /// Changes the calling manager's password.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a wrong current password or a
    /// weak replacement.
    pub async fn change_password(
        &self,
        token: &str,
        request: ChangePasswordRequest,
    ) -> Result<(), ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.identity.change_password(&principal, request).await?)
        })
        .await
    }

    /// Creates an employee owned by the calling manager.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authorization`] for employees or
    /// [`ApiError::Validation`] for malformed input.
    pub async fn create_employee(
        &self,
        token: &str,
        request: CreateEmployeeRequest,
    ) -> Result<Employee, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.identity.create_employee(&principal, request).await?)
        })
        .await
    }

    /// Lists the calling manager's employees.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authorization`] for employees.
    pub async fn list_employees(&self, token: &str) -> Result<Vec<Employee>, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.identity.list_employees(&principal).await?)
        })
        .await
    }

    /// Reads one employee: the owner or the employee itself.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authorization`] when the record is outside the
    /// caller's scope or absent.
    pub async fn get_employee(&self, token: &str, id: EmployeeId) -> Result<Employee, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.identity.get_employee(&principal, id).await?)
        })
        .await
    }

    /// Updates an employee owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authorization`] outside the caller's scope or
    /// [`ApiError::Validation`] for malformed input.
    pub async fn update_employee(
        &self,
        token: &str,
        id: EmployeeId,
        request: UpdateEmployeeRequest,
    ) -> Result<Employee, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.identity.update_employee(&principal, id, request).await?)
        })
        .await
    }

    /// Updates the calling employee's self-service fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authorization`] for managers.
    pub async fn update_own_profile(
        &self,
        token: &str,
        request: UpdateProfileRequest,
    ) -> Result<Employee, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.identity.update_own_profile(&principal, request).await?)
        })
        .await
    }

    /// Deletes an employee owned by the caller together with every task
    /// assigned to it.
    ///
    /// Tasks are swept before the employee row goes, so a failed sweep leaves
    /// the employee and its tasks in place. A second sweep afterwards removes
    /// tasks written by assignments that raced the deletion.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authorization`] outside the caller's scope.
    pub async fn delete_employee(
        &self,
        token: &str,
        id: EmployeeId,
    ) -> Result<EmployeeRemoval, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            self.identity.authorize_removal(&principal, id).await?;
            let swept = self.tasks.remove_tasks_for_employee(id).await?;
            let employee = self.identity.delete_employee(&principal, id).await?;
            let stragglers = self.tasks.remove_tasks_for_employee(id).await?;
            let tasks_removed = swept + stragglers;
            Ok(EmployeeRemoval {
                employee,
                tasks_removed,
            })
        })
        .await
    }

    /// Assigns a task to one of the caller's employees.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authorization`] for employees and foreign
    /// assignees, [`ApiError::NotFound`] for an unknown assignee, or
    /// [`ApiError::Validation`] for malformed input.
    pub async fn create_task(
        &self,
        token: &str,
        request: CreateTaskRequest,
    ) -> Result<Task, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.tasks.create_task(&principal, request).await?)
        })
        .await
    }

    /// Lists the caller's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] for a bad token.
    pub async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.tasks.list_tasks(&principal).await?)
        })
        .await
    }

    /// Reads one task visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authorization`] outside the caller's scope.
    pub async fn get_task(&self, token: &str, id: TaskId) -> Result<Task, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.tasks.get_task(&principal, id).await?)
        })
        .await
    }

    /// Records assignee progress on a task.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::StateConflict`] for a disallowed transition or a
    /// concurrent write, and [`ApiError::Authorization`] unless the caller
    /// is the assignee.
    pub async fn update_task_status(
        &self,
        token: &str,
        id: TaskId,
        request: UpdateStatusRequest,
    ) -> Result<Task, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.tasks.update_status(&principal, id, request).await?)
        })
        .await
    }

    /// Reviews a completed task the caller assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::StateConflict`] unless the task is completed.
    pub async fn review_task(
        &self,
        token: &str,
        id: TaskId,
        request: ReviewTaskRequest,
    ) -> Result<Task, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.tasks.review_task(&principal, id, request).await?)
        })
        .await
    }

    /// Edits a task the caller assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::StateConflict`] for reviewed tasks.
    pub async fn edit_task(
        &self,
        token: &str,
        id: TaskId,
        request: EditTaskRequest,
    ) -> Result<Task, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.tasks.edit_task(&principal, id, request).await?)
        })
        .await
    }

    /// Deletes a task the caller assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authorization`] unless the caller is the
    /// assigner.
    pub async fn delete_task(&self, token: &str, id: TaskId) -> Result<(), ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.tasks.delete_task(&principal, id).await?)
        })
        .await
    }

    /// Returns the caller's task statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Authentication`] for a bad token.
    pub async fn task_statistics(&self, token: &str) -> Result<TaskStatistics, ApiError> {
        self.bounded(async {
            let principal = self.authenticate(token).await?;
            Ok(self.stats.for_principal(&principal).await?)
        })
        .await
    }

    /// Asks the advisory provider about a task the caller can read.
    ///
    /// The provider call has its own timeout and never changes the task.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::FeatureUnavailable`] when the feature is off,
    /// throttled, slow, or failing, and [`ApiError::Authorization`] for
    /// employees.
    pub async fn suggest_for_task(&self, token: &str, id: TaskId) -> Result<Suggestion, ApiError> {
        let (principal, task) = self
            .bounded(async {
                let principal = self.authenticate(token).await?;
                let task = self.tasks.get_task(&principal, id).await?;
                Ok((principal, task))
            })
            .await?;
        Ok(self
            .advisory
            .suggest(&principal, &AdvisoryRequest::from(&task))
            .await?)
    }

    async fn authenticate(&self, token: &str) -> Result<Principal, ApiError> {
        let bearer = TokenService::extract_bearer(token).unwrap_or(token);
        Ok(self.auth.resolve(bearer).await?)
    }

    async fn bounded<R>(
        &self,
        operation: impl Future<Output = Result<R, ApiError>>,
    ) -> Result<R, ApiError> {
        tokio::time::timeout(self.store_timeout, operation)
            .await
            .unwrap_or_else(|_| {
                warn!(timeout = ?self.store_timeout, "store call timed out");
                Err(ApiError::Unavailable)
            })
    }
}
