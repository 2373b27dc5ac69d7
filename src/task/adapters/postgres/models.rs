//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Assigning manager.
    pub assigned_by: uuid::Uuid,
    /// Assignee.
    pub assigned_to: uuid::Uuid,
    /// Priority.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Due date.
    pub deadline: DateTime<Utc>,
    /// Attachment references as a JSON array of strings.
    pub attachments: Value,
    /// Review feedback.
    pub feedback: Option<String>,
    /// Review rating.
    pub rating: Option<i16>,
    /// Review timestamp.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Assigning manager.
    pub assigned_by: uuid::Uuid,
    /// Assignee.
    pub assigned_to: uuid::Uuid,
    /// Priority.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Due date.
    pub deadline: DateTime<Utc>,
    /// Attachment references as a JSON array of strings.
    pub attachments: Value,
    /// Optimistic concurrency version.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Full-row changeset written by version-checked updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Assignee.
    pub assigned_to: uuid::Uuid,
    /// Priority.
    pub priority: String,
    /// Lifecycle status.
    pub status: String,
    /// Due date.
    pub deadline: DateTime<Utc>,
    /// Attachment references.
    pub attachments: Value,
    /// Review feedback.
    pub feedback: Option<String>,
    /// Review rating.
    pub rating: Option<i16>,
    /// Review timestamp.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// New concurrency version.
    pub version: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
