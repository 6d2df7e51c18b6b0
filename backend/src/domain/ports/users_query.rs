//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_user_by_id(&self, id: &UserId) -> Result<User, Error>;
}
