//! Port for issuing and verifying bearer tokens bound to a user.

use chrono::{DateTime, Utc};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token is malformed, has a bad signature, or names no valid user.
        Invalid => "token is invalid",
        /// The token was well formed but its lifetime has elapsed.
        Expired => "token has expired",
        /// The adapter could not produce a token.
        Issue { message: String } => "failed to issue token: {message}",
    }
}

/// A freshly issued token and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Stateless session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token for `user`.
    fn issue(&self, user: &UserId) -> Result<IssuedToken, TokenError>;

    /// Verify `token` and return the user it was issued for.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
