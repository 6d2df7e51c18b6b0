//! bcrypt-backed password hashing.

use tracing::debug;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordDigest};

/// Lowest work factor bcrypt accepts.
pub const BCRYPT_MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts.
pub const BCRYPT_MAX_COST: u32 = 31;

/// `PasswordHasher` adapter producing `$2b$` bcrypt digests.
///
/// Inputs longer than bcrypt's key length are refused rather than silently
/// truncated, so two candidates sharing a long prefix never collide.
///
/// # Examples
/// ```
/// use todo_backend::domain::Password;
/// use todo_backend::domain::ports::PasswordHasher;
/// use todo_backend::outbound::security::BcryptPasswordHasher;
///
/// let hasher = BcryptPasswordHasher::new(4).expect("valid cost");
/// let digest = hasher.hash(&Password::new("secret123").unwrap()).unwrap();
/// assert!(hasher.verify(&digest, "secret123"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with the given work factor.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Hashing`] when `cost` lies outside
    /// [`BCRYPT_MIN_COST`]..=[`BCRYPT_MAX_COST`].
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&cost) {
            return Err(PasswordHashError::hashing(format!(
                "bcrypt cost {cost} outside {BCRYPT_MIN_COST}..={BCRYPT_MAX_COST}"
            )));
        }
        Ok(Self { cost })
    }

    /// Configured work factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordDigest, PasswordHashError> {
        let digest = bcrypt::non_truncating_hash(password.expose(), self.cost)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        PasswordDigest::new(digest).map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    fn verify(&self, digest: &PasswordDigest, candidate: &str) -> bool {
        match bcrypt::non_truncating_verify(candidate, digest.as_str()) {
            Ok(matches) => matches,
            Err(err) => {
                debug!(error = %err, "password candidate could not be verified");
                false
            }
        }
    }
}
