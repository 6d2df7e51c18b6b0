//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing the backing infrastructure, so
//! HTTP handler tests can substitute a test double instead of wiring
//! persistence.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    ///
    /// Unknown emails and wrong passwords fail with the same unauthorized
    /// error so callers cannot discover which addresses are registered.
    async fn authenticate_user(&self, credentials: &Credentials) -> Result<User, Error>;
}
