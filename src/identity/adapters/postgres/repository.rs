//! `PostgreSQL` repository implementations for managers and employees.

use super::{
    models::{
        EmployeeChangeset, EmployeeRow, ManagerChangeset, ManagerRow, NewEmployeeRow,
        NewManagerRow,
    },
    schema::{employees, managers},
};
use crate::identity::{
    domain::{
        CredentialHash, EmailAddress, Employee, EmployeeCode, EmployeeId, Manager, ManagerId,
        ManagerRole, MobileNumber, PersistedEmployeeData, PersistedManagerData, PersonName,
    },
    ports::{
        EmployeeRepository, IdentityRepositoryError, IdentityRepositoryResult, ManagerRepository,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by identity adapters.
pub type IdentityPgPool = Pool<ConnectionManager<PgConnection>>;

async fn run_blocking<F, T>(pool: &IdentityPgPool, f: F) -> IdentityRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> IdentityRepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(IdentityRepositoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(IdentityRepositoryError::persistence)?
}

fn is_email_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name.ends_with("_email_key") || name.ends_with("_email_unique"))
}

fn map_write_error(err: DieselError, email: &EmailAddress) -> IdentityRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_email_unique_violation(info.as_ref()) =>
        {
            IdentityRepositoryError::DuplicateEmail(email.clone())
        }
        _ => IdentityRepositoryError::persistence(err),
    }
}

/// `PostgreSQL`-backed manager repository.
#[derive(Debug, Clone)]
pub struct PostgresManagerRepository {
    pool: IdentityPgPool,
}

impl PostgresManagerRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: IdentityPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ManagerRepository for PostgresManagerRepository {
    async fn store(&self, manager: &Manager) -> IdentityRepositoryResult<()> {
        let email = manager.email().clone();
        let row = NewManagerRow {
            id: manager.id().into_inner(),
            name: manager.name().as_str().to_owned(),
            email: email.as_str().to_owned(),
            credential: manager.credential().as_str().to_owned(),
            role: manager.role().as_str().to_owned(),
            created_at: manager.created_at(),
            updated_at: manager.updated_at(),
        };
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(managers::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, &email))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, manager: &Manager) -> IdentityRepositoryResult<()> {
        let id = manager.id();
        let email = manager.email().clone();
        let changes = ManagerChangeset {
            name: manager.name().as_str().to_owned(),
            email: email.as_str().to_owned(),
            credential: manager.credential().as_str().to_owned(),
            role: manager.role().as_str().to_owned(),
            updated_at: manager.updated_at(),
        };
        run_blocking(&self.pool, move |connection| {
            let affected = diesel::update(managers::table.filter(managers::id.eq(id.into_inner())))
                .set(&changes)
                .execute(connection)
                .map_err(|err| map_write_error(err, &email))?;
            if affected == 0 {
                return Err(IdentityRepositoryError::ManagerNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ManagerId) -> IdentityRepositoryResult<Option<Manager>> {
        run_blocking(&self.pool, move |connection| {
            let row = managers::table
                .filter(managers::id.eq(id.into_inner()))
                .select(ManagerRow::as_select())
                .first::<ManagerRow>(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            row.map(row_to_manager).transpose()
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> IdentityRepositoryResult<Option<Manager>> {
        let lookup = email.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = managers::table
                .filter(managers::email.eq(lookup))
                .select(ManagerRow::as_select())
                .first::<ManagerRow>(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            row.map(row_to_manager).transpose()
        })
        .await
    }
}

/// `PostgreSQL`-backed employee repository.
#[derive(Debug, Clone)]
pub struct PostgresEmployeeRepository {
    pool: IdentityPgPool,
}

impl PostgresEmployeeRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: IdentityPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn store(&self, employee: &Employee) -> IdentityRepositoryResult<()> {
        let email = employee.email().clone();
        let row = to_new_employee_row(employee)?;
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(employees::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_write_error(err, &email))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, employee: &Employee) -> IdentityRepositoryResult<()> {
        let id = employee.id();
        let email = employee.email().clone();
        let changes = to_employee_changeset(employee)?;
        run_blocking(&self.pool, move |connection| {
            let affected =
                diesel::update(employees::table.filter(employees::id.eq(id.into_inner())))
                    .set(&changes)
                    .execute(connection)
                    .map_err(|err| map_write_error(err, &email))?;
            if affected == 0 {
                return Err(IdentityRepositoryError::EmployeeNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: EmployeeId) -> IdentityRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let affected =
                diesel::delete(employees::table.filter(employees::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(IdentityRepositoryError::persistence)?;
            if affected == 0 {
                return Err(IdentityRepositoryError::EmployeeNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: EmployeeId) -> IdentityRepositoryResult<Option<Employee>> {
        run_blocking(&self.pool, move |connection| {
            let row = employees::table
                .filter(employees::id.eq(id.into_inner()))
                .select(EmployeeRow::as_select())
                .first::<EmployeeRow>(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            row.map(row_to_employee).transpose()
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> IdentityRepositoryResult<Option<Employee>> {
        let lookup = email.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = employees::table
                .filter(employees::email.eq(lookup))
                .select(EmployeeRow::as_select())
                .first::<EmployeeRow>(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            row.map(row_to_employee).transpose()
        })
        .await
    }

    async fn list_by_owner(&self, owner_id: ManagerId) -> IdentityRepositoryResult<Vec<Employee>> {
        run_blocking(&self.pool, move |connection| {
            let rows = employees::table
                .filter(employees::owner_id.eq(owner_id.into_inner()))
                .order(employees::created_at.asc())
                .select(EmployeeRow::as_select())
                .load::<EmployeeRow>(connection)
                .map_err(IdentityRepositoryError::persistence)?;
            rows.into_iter().map(row_to_employee).collect()
        })
        .await
    }
}

fn row_to_manager(row: ManagerRow) -> IdentityRepositoryResult<Manager> {
    let data = PersistedManagerData {
        id: ManagerId::from_uuid(row.id),
        name: PersonName::new(row.name).map_err(IdentityRepositoryError::persistence)?,
        email: EmailAddress::new(row.email).map_err(IdentityRepositoryError::persistence)?,
        credential: CredentialHash::from_encoded(row.credential),
        role: ManagerRole::try_from(row.role.as_str())
            .map_err(IdentityRepositoryError::persistence)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(Manager::from_persisted(data))
}

fn row_to_employee(row: EmployeeRow) -> IdentityRepositoryResult<Employee> {
    let EmployeeRow {
        id,
        code,
        owner_id,
        name,
        email,
        job_title,
        mobile,
        address,
        salary,
        has_login_access,
        credential,
        created_at,
        updated_at,
    } = row;

    let data = PersistedEmployeeData {
        id: EmployeeId::from_uuid(id),
        code: EmployeeCode::parse(code).map_err(IdentityRepositoryError::persistence)?,
        owner_id: ManagerId::from_uuid(owner_id),
        name: PersonName::new(name).map_err(IdentityRepositoryError::persistence)?,
        email: EmailAddress::new(email).map_err(IdentityRepositoryError::persistence)?,
        job_title,
        mobile: mobile
            .map(MobileNumber::new)
            .transpose()
            .map_err(IdentityRepositoryError::persistence)?,
        address,
        salary: salary
            .map(u64::try_from)
            .transpose()
            .map_err(IdentityRepositoryError::persistence)?,
        has_login_access,
        credential: credential.map(CredentialHash::from_encoded),
        created_at,
        updated_at,
    };
    Ok(Employee::from_persisted(data))
}

fn persisted_salary(employee: &Employee) -> IdentityRepositoryResult<Option<i64>> {
    employee
        .salary()
        .map(i64::try_from)
        .transpose()
        .map_err(IdentityRepositoryError::persistence)
}

fn to_new_employee_row(employee: &Employee) -> IdentityRepositoryResult<NewEmployeeRow> {
    Ok(NewEmployeeRow {
        id: employee.id().into_inner(),
        code: employee.code().as_str().to_owned(),
        owner_id: employee.owner_id().into_inner(),
        name: employee.name().as_str().to_owned(),
        email: employee.email().as_str().to_owned(),
        job_title: employee.job_title().to_owned(),
        mobile: employee.mobile().map(|m| m.as_str().to_owned()),
        address: employee.address().map(str::to_owned),
        salary: persisted_salary(employee)?,
        has_login_access: employee.has_login_access(),
        credential: employee.credential().map(|c| c.as_str().to_owned()),
        created_at: employee.created_at(),
        updated_at: employee.updated_at(),
    })
}

fn to_employee_changeset(employee: &Employee) -> IdentityRepositoryResult<EmployeeChangeset> {
    Ok(EmployeeChangeset {
        name: employee.name().as_str().to_owned(),
        email: employee.email().as_str().to_owned(),
        job_title: employee.job_title().to_owned(),
        mobile: employee.mobile().map(|m| m.as_str().to_owned()),
        address: employee.address().map(str::to_owned),
        salary: persisted_salary(employee)?,
        has_login_access: employee.has_login_access(),
        credential: employee.credential().map(|c| c.as_str().to_owned()),
        updated_at: employee.updated_at(),
    })
}
