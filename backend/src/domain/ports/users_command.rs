//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a new user. Fails with a conflict when the email is taken.
    async fn register_new_user(&self, credentials: &Credentials) -> Result<User, Error>;
}
