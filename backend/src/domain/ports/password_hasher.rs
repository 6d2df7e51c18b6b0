//! Port for the password hashing capability.
//!
//! Hashing is CPU-bound and synchronous; services move calls onto a blocking
//! thread before invoking it.

use crate::domain::{Password, PasswordDigest};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// The adapter could not derive a digest.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Derive and verify password digests.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Derive a digest for the given password.
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError>;

    /// Check `candidate` against `digest`. Malformed digests never match.
    fn verify(&self, digest: &PasswordDigest, candidate: &str) -> bool;
}

/// Deterministic, non-cryptographic hasher for tests and local fixtures.
///
/// Digests are the plaintext behind a `fixture$` marker so assertions stay
/// readable. Never wire this into a production server.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        PasswordDigest::new(format!("{FIXTURE_PREFIX}{}", password.expose()))
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    fn verify(&self, digest: &PasswordDigest, candidate: &str) -> bool {
        digest
            .as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .is_some_and(|stored| stored == candidate)
    }
}
