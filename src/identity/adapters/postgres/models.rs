//! Diesel row models for identity persistence.

use super::schema::{employees, managers};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for manager accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = managers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ManagerRow {
    /// Manager identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Unique lowercase email.
    pub email: String,
    /// Encoded credential hash.
    pub credential: String,
    /// Account role.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for manager accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = managers)]
pub struct NewManagerRow {
    /// Manager identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Unique lowercase email.
    pub email: String,
    /// Encoded credential hash.
    pub credential: String,
    /// Account role.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update model for manager accounts.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = managers)]
pub struct ManagerChangeset {
    /// Display name.
    pub name: String,
    /// Unique lowercase email.
    pub email: String,
    /// Encoded credential hash.
    pub credential: String,
    /// Account role.
    pub role: String,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for employee records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmployeeRow {
    /// Employee identifier.
    pub id: uuid::Uuid,
    /// Human-readable employee code.
    pub code: String,
    /// Owning manager identifier.
    pub owner_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Unique lowercase email.
    pub email: String,
    /// Role or title.
    pub job_title: String,
    /// Optional phone number.
    pub mobile: Option<String>,
    /// Optional postal address.
    pub address: Option<String>,
    /// Optional salary in minor currency units.
    pub salary: Option<i64>,
    /// Whether the employee may authenticate.
    pub has_login_access: bool,
    /// Optional encoded credential hash.
    pub credential: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for employee records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = employees)]
pub struct NewEmployeeRow {
    /// Employee identifier.
    pub id: uuid::Uuid,
    /// Human-readable employee code.
    pub code: String,
    /// Owning manager identifier.
    pub owner_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Unique lowercase email.
    pub email: String,
    /// Role or title.
    pub job_title: String,
    /// Optional phone number.
    pub mobile: Option<String>,
    /// Optional postal address.
    pub address: Option<String>,
    /// Optional salary in minor currency units.
    pub salary: Option<i64>,
    /// Whether the employee may authenticate.
    pub has_login_access: bool,
    /// Optional encoded credential hash.
    pub credential: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update model for employee records. `owner_id` and `code` are absent:
/// neither changes after creation.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = employees)]
#[diesel(treat_none_as_null = true)]
pub struct EmployeeChangeset {
    /// Display name.
    pub name: String,
    /// Unique lowercase email.
    pub email: String,
    /// Role or title.
    pub job_title: String,
    /// Optional phone number.
    pub mobile: Option<String>,
    /// Optional postal address.
    pub address: Option<String>,
    /// Optional salary in minor currency units.
    pub salary: Option<i64>,
    /// Whether the employee may authenticate.
    pub has_login_access: bool,
    /// Optional encoded credential hash.
    pub credential: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
