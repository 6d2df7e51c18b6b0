//! Port abstraction for task persistence adapters and their errors.
//!
//! Adapters must keep `save` and `update` distinct: `save` inserts and fails
//! on a duplicate id, `update` replaces an existing record and fails with
//! [`TaskRepositoryError::NotFound`] when there is nothing to replace.

use async_trait::async_trait;

use crate::domain::{Task, TaskId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by task repository adapters.
    pub enum TaskRepositoryError {
        /// No task matched the identifier.
        NotFound => "task not found",
        /// A task with the same identifier already exists.
        Duplicate => "task already exists",
        /// Repository connection could not be established.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task repository query failed: {message}",
    }
}

/// Port for task storage and retrieval.
///
/// # Ordering
///
/// [`TaskRepository::find_all_by_owner`] returns tasks ordered by
/// `created_at` ascending, ties broken by id, so listings are stable across
/// adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task.
    async fn save(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    /// Replace an existing task.
    async fn update(&self, task: &Task) -> Result<(), TaskRepositoryError>;

    /// Fetch a task by identifier.
    async fn find_by_id(&self, id: &TaskId) -> Result<Task, TaskRepositoryError>;

    /// List every task owned by `owner`.
    async fn find_all_by_owner(&self, owner: &UserId) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Remove a task.
    async fn delete(&self, id: &TaskId) -> Result<(), TaskRepositoryError>;
}
