//! In-memory manager repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::{
    domain::{EmailAddress, Manager, ManagerId},
    ports::{IdentityRepositoryError, IdentityRepositoryResult, ManagerRepository},
};

/// Thread-safe in-memory manager repository with a unique email index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryManagerRepository {
    state: Arc<RwLock<InMemoryManagerState>>,
}

#[derive(Debug, Default)]
struct InMemoryManagerState {
    managers: HashMap<ManagerId, Manager>,
    email_index: HashMap<EmailAddress, ManagerId>,
}

impl InMemoryManagerRepository {
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
impl ManagerRepository for InMemoryManagerRepository {
    async fn store(&self, manager: &Manager) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.email_index.contains_key(manager.email()) {
            return Err(IdentityRepositoryError::DuplicateEmail(
                manager.email().clone(),
            ));
        }
        state
            .email_index
            .insert(manager.email().clone(), manager.id());
        state.managers.insert(manager.id(), manager.clone());
        Ok(())
    }

    async fn update(&self, manager: &Manager) -> IdentityRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let previous_email = state
            .managers
            .get(&manager.id())
            .ok_or(IdentityRepositoryError::ManagerNotFound(manager.id()))?
            .email()
            .clone();

        if &previous_email != manager.email() {
            if state.email_index.contains_key(manager.email()) {
                return Err(IdentityRepositoryError::DuplicateEmail(
                    manager.email().clone(),
                ));
            }
            state.email_index.remove(&previous_email);
            state
                .email_index
                .insert(manager.email().clone(), manager.id());
        }
        state.managers.insert(manager.id(), manager.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ManagerId) -> IdentityRepositoryResult<Option<Manager>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.managers.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> IdentityRepositoryResult<Option<Manager>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .email_index
            .get(email)
            .and_then(|id| state.managers.get(id))
            .cloned())
    }
}
