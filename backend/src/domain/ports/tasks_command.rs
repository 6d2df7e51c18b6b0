//! Driving port for task mutations.
//!
//! Every operation except creation names the caller. Implementations load
//! the task, reject callers that do not own it, and only then mutate and
//! persist.

use async_trait::async_trait;

use crate::domain::{Error, Task, TaskId, UserId};

/// Request to create a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub owner: UserId,
    pub text: String,
    pub order: Option<i64>,
}

/// Domain use-case port for task mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TasksCommand: Send + Sync {
    /// Create and persist a task.
    async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, Error>;

    /// Replace a task's text and, when given, its display order.
    async fn update_task(
        &self,
        id: &TaskId,
        text: &str,
        order: Option<i64>,
        caller: &UserId,
    ) -> Result<Task, Error>;

    /// Flag a task as done.
    async fn mark_completed(&self, id: &TaskId, caller: &UserId) -> Result<Task, Error>;

    /// Flag a task as not done.
    async fn mark_not_completed(&self, id: &TaskId, caller: &UserId) -> Result<Task, Error>;

    /// Remove a task.
    async fn delete_task(&self, id: &TaskId, caller: &UserId) -> Result<(), Error>;
}
