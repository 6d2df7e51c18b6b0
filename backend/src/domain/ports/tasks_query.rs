//! Driving port for task listings.

use async_trait::async_trait;

use crate::domain::{Error, Task, UserId};

/// Domain use-case port for reading tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TasksQuery: Send + Sync {
    /// List the tasks owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Task>, Error>;
}
