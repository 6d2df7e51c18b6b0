//! Mutex-guarded `TaskRepository` adapter.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{Task, TaskId, UserId};

/// In-memory task store.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<HashMap<TaskId, Task>>,
}

impl InMemoryTaskRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TaskId, Task>>, TaskRepositoryError> {
        self.tasks
            .lock()
            .map_err(|_| TaskRepositoryError::query("task store lock poisoned"))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn save(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        match self.lock()?.entry(task.id().clone()) {
            Entry::Occupied(_) => Err(TaskRepositoryError::duplicate()),
            Entry::Vacant(slot) => {
                slot.insert(task.clone());
                Ok(())
            }
        }
    }

    async fn update(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut tasks = self.lock()?;
        let stored = tasks
            .get_mut(task.id())
            .ok_or_else(TaskRepositoryError::not_found)?;
        *stored = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Task, TaskRepositoryError> {
        self.lock()?
            .get(id)
            .cloned()
            .ok_or_else(TaskRepositoryError::not_found)
    }

    async fn find_all_by_owner(&self, owner: &UserId) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut owned: Vec<Task> = self
            .lock()?
            .values()
            .filter(|task| task.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(owned)
    }

    async fn delete(&self, id: &TaskId) -> Result<(), TaskRepositoryError> {
        self.lock()?
            .remove(id)
            .map(drop)
            .ok_or_else(TaskRepositoryError::not_found)
    }
}
