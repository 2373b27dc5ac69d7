//! In-memory employee repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{EmailAddress, Employee, EmployeeId, ManagerId},
    ports::{EmployeeRepository, IdentityRepositoryError, IdentityRepositoryResult},
};

/// Thread-safe in-memory employee repository with email and owner indexes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeRepository {
    state: Arc<RwLock<InMemoryEmployeeState>>,
}

#[derive(Debug, Default)]
struct InMemoryEmployeeState {
    employees: HashMap<EmployeeId, Employee>,
    email_index: HashMap<EmailAddress, EmployeeId>,
    owner_index: HashMap<ManagerId, Vec<EmployeeId>>,
}

impl InMemoryEmployeeRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> IdentityRepositoryError {
    IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn store(&self, employee: &Employee) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.email_index.contains_key(employee.email()) {
            return Err(IdentityRepositoryError::DuplicateEmail(
                employee.email().clone(),
            ));
        }
        state
            .email_index
            .insert(employee.email().clone(), employee.id());
        state
            .owner_index
            .entry(employee.owner_id())
            .or_default()
            .push(employee.id());
        state.employees.insert(employee.id(), employee.clone());
        Ok(())
    }

    async fn update(&self, employee: &Employee) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let previous_email = state
            .employees
            .get(&employee.id())
            .ok_or(IdentityRepositoryError::EmployeeNotFound(employee.id()))?
            .email()
            .clone();

        if &previous_email != employee.email() {
            if state.email_index.contains_key(employee.email()) {
                return Err(IdentityRepositoryError::DuplicateEmail(
                    employee.email().clone(),
                ));
            }
            state.email_index.remove(&previous_email);
            state
                .email_index
                .insert(employee.email().clone(), employee.id());
        }
        state.employees.insert(employee.id(), employee.clone());
        Ok(())
    }

    async fn delete(&self, id: EmployeeId) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let removed = state
            .employees
            .remove(&id)
            .ok_or(IdentityRepositoryError::EmployeeNotFound(id))?;
        state.email_index.remove(removed.email());
        if let Some(ids) = state.owner_index.get_mut(&removed.owner_id()) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                state.owner_index.remove(&removed.owner_id());
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, id: EmployeeId) -> IdentityRepositoryResult<Option<Employee>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.employees.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> IdentityRepositoryResult<Option<Employee>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.employees.get(id))
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: ManagerId) -> IdentityRepositoryResult<Vec<Employee>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .owner_index
            .get(&owner_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.employees.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }
}
