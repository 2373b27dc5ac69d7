//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::domain::{EmployeeId, ManagerId};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository with assigner and assignee indexes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    assigner_index: HashMap<ManagerId, Vec<TaskId>>,
    assignee_index: HashMap<EmployeeId, Vec<TaskId>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Removes a task ID from an index, cleaning up the entry if empty.
fn remove_from_index<K>(index: &mut HashMap<K, Vec<TaskId>>, key: &K, task_id: TaskId)
where
    K: Eq + std::hash::Hash,
{
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|id| *id != task_id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

fn collect_indexed<K>(
    state: &InMemoryTaskState,
    index: &HashMap<K, Vec<TaskId>>,
    key: &K,
) -> Vec<Task>
where
    K: Eq + std::hash::Hash,
{
    let mut tasks: Vec<Task> = index
        .get(key)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| state.tasks.get(id).cloned())
                .collect()
        })
        .unwrap_or_default();
    tasks.sort_by_key(Task::created_at);
    tasks
}

fn unlink(state: &mut InMemoryTaskState, task: &Task) {
    remove_from_index(&mut state.assigner_index, &task.assigned_by(), task.id());
    remove_from_index(&mut state.assignee_index, &task.assigned_to(), task.id());
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state
            .assigner_index
            .entry(task.assigned_by())
            .or_default()
            .push(task.id());
        state
            .assignee_index
            .entry(task.assigned_to())
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task, expected_version: u64) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let stored = state
            .tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if stored.version() != expected_version {
            return Err(TaskRepositoryError::VersionConflict {
                task_id: task.id(),
                expected: expected_version,
                actual: stored.version(),
            });
        }

        let previous_assignee = stored.assigned_to();
        if previous_assignee != task.assigned_to() {
            remove_from_index(&mut state.assignee_index, &previous_assignee, task.id());
            state
                .assignee_index
                .entry(task.assigned_to())
                .or_default()
                .push(task.id());
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        unlink(&mut state, &removed);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_by_assigner(&self, manager_id: ManagerId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(collect_indexed(&state, &state.assigner_index, &manager_id))
    }

    async fn list_by_assignee(&self, employee_id: EmployeeId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(collect_indexed(&state, &state.assignee_index, &employee_id))
    }

    async fn delete_by_assignee(&self, employee_id: EmployeeId) -> TaskRepositoryResult<usize> {
        let mut state = self.state.write().map_err(poisoned)?;
        let ids = state
            .assignee_index
            .remove(&employee_id)
            .unwrap_or_default();
        let mut removed = 0;
        for id in ids {
            if let Some(task) = state.tasks.remove(&id) {
                remove_from_index(&mut state.assigner_index, &task.assigned_by(), id);
                removed += 1;
            }
        }
        Ok(removed)
    }
}
