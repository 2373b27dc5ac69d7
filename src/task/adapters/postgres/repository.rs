//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::identity::domain::{EmployeeId, ManagerId};
use crate::task::{
    domain::{
        Attachment, PersistedTaskData, Priority, Rating, Task, TaskId, TaskReview, TaskStatus,
        TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, expected_version: u64) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changes = to_changeset(task)?;
        let expected = to_db_version(expected_version)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::version.eq(expected)),
            )
            .set(&changes)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            if affected > 0 {
                return Ok(());
            }

            let stored = tasks::table
                .filter(tasks::id.eq(task_id.into_inner()))
                .select(tasks::version)
                .first::<i64>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            match stored {
                None => Err(TaskRepositoryError::NotFound(task_id)),
                Some(actual) => Err(TaskRepositoryError::VersionConflict {
                    task_id,
                    expected: expected_version,
                    actual: from_db_version(actual)?,
                }),
            }
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_assigner(&self, manager_id: ManagerId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assigned_by.eq(manager_id.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_by_assignee(&self, employee_id: EmployeeId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assigned_to.eq(employee_id.into_inner()))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete_by_assignee(&self, employee_id: EmployeeId) -> TaskRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            diesel::delete(tasks::table.filter(tasks::assigned_to.eq(employee_id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn to_db_version(version: u64) -> TaskRepositoryResult<i64> {
    i64::try_from(version).map_err(TaskRepositoryError::persistence)
}

fn from_db_version(version: i64) -> TaskRepositoryResult<u64> {
    u64::try_from(version).map_err(TaskRepositoryError::persistence)
}

fn attachments_to_json(task: &Task) -> TaskRepositoryResult<serde_json::Value> {
    serde_json::to_value(task.attachments()).map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        assigned_by: task.assigned_by().into_inner(),
        assigned_to: task.assigned_to().into_inner(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        deadline: task.deadline(),
        attachments: attachments_to_json(task)?,
        version: to_db_version(task.version())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    let review = task.review();
    Ok(TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        assigned_to: task.assigned_to().into_inner(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        deadline: task.deadline(),
        attachments: attachments_to_json(task)?,
        feedback: review.map(|r| r.feedback().to_owned()),
        rating: review.map(|r| i16::from(r.rating().value())),
        reviewed_at: review.map(TaskReview::reviewed_at),
        version: to_db_version(task.version())?,
        updated_at: task.updated_at(),
    })
}

fn row_to_review(
    feedback: Option<String>,
    rating: Option<i16>,
    reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
) -> TaskRepositoryResult<Option<TaskReview>> {
    let (Some(feedback), Some(rating), Some(reviewed_at)) = (feedback, rating, reviewed_at) else {
        return Ok(None);
    };
    let score = u8::try_from(rating).map_err(TaskRepositoryError::persistence)?;
    let validated = Rating::new(score).map_err(TaskRepositoryError::persistence)?;
    let review = TaskReview::new(feedback, validated, reviewed_at)
        .map_err(TaskRepositoryError::persistence)?;
    Ok(Some(review))
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        assigned_by,
        assigned_to,
        priority,
        status,
        deadline,
        attachments: attachments_json,
        feedback,
        rating,
        reviewed_at,
        version,
        created_at,
        updated_at,
    } = row;

    let raw_attachments = serde_json::from_value::<Vec<String>>(attachments_json)
        .map_err(TaskRepositoryError::persistence)?;
    let attachments = raw_attachments
        .into_iter()
        .map(Attachment::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        assigned_by: ManagerId::from_uuid(assigned_by),
        assigned_to: EmployeeId::from_uuid(assigned_to),
        priority: Priority::try_from(priority.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        deadline,
        attachments,
        review: row_to_review(feedback, rating, reviewed_at)?,
        version: from_db_version(version)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
