//! Port abstraction for user persistence adapters and their errors.
//!
//! `save` is insert-only: registering an id or email that already exists
//! fails with [`UserRepositoryError::Duplicate`]. Lookups report absence as
//! [`UserRepositoryError::NotFound`] rather than an empty option so every
//! adapter surfaces misses the same way.

use async_trait::async_trait;

use crate::domain::{Email, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// No user matched the lookup key.
        NotFound => "user not found",
        /// The id or email is already registered.
        Duplicate => "user already exists",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<User, UserRepositoryError>;

    /// Fetch a user by normalised email address.
    async fn find_by_email(&self, email: &Email) -> Result<User, UserRepositoryError>;
}
