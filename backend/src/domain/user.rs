//! User data model.
//!
//! A [`User`] owns an email identity and a password digest. Plaintext
//! passwords only exist transiently as [`Password`] values, which are zeroed
//! on drop and never stored on the entity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::PasswordHasher;

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length in characters.
pub const PASSWORD_MAX: usize = 100;
/// Maximum accepted password length in UTF-8 bytes. bcrypt keys on at most 72
/// bytes including a terminating NUL.
pub const PASSWORD_MAX_BYTES: usize = 71;
/// Maximum accepted length of a normalised email address (RFC 5321 path limit).
pub const EMAIL_MAX: usize = 254;

/// Validation errors returned by [`User`] constructors and setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    InvalidEmail,
    InvalidPassword { min: usize, max: usize },
    MissingPasswordDigest,
    InvalidTimestamps,
    Hashing { message: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::InvalidPassword { min, max } => {
                write!(
                    f,
                    "password must be between {min} and {max} characters and at most \
                     {PASSWORD_MAX_BYTES} bytes"
                )
            }
            Self::MissingPasswordDigest => write!(f, "user must carry a password digest"),
            Self::InvalidTimestamps => {
                write!(f, "updated timestamp must not precede the creation timestamp")
            }
            Self::Hashing { message } => write!(f, "failed to hash password: {message}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Whether this identifier is the all-zero UUID.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Normalised email address.
///
/// ## Invariants
/// - Parses under the RFC 5322 mailbox grammar.
/// - At most [`EMAIL_MAX`] characters once normalised.
/// - Stored as the bare `local@domain` form; display names are dropped and the
///   domain is lower-cased.
///
/// # Examples
/// ```
/// use todo_backend::domain::Email;
///
/// let email = Email::parse("  Alice <alice@Example.COM> ").expect("valid email");
/// assert_eq!(email.as_ref(), "alice@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Parse and normalise a raw email string.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::InvalidEmail);
        }
        let parsed =
            EmailAddress::from_str(trimmed).map_err(|_| UserValidationError::InvalidEmail)?;
        let normalised = format!(
            "{}@{}",
            parsed.local_part(),
            parsed.domain().to_ascii_lowercase()
        );
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Plaintext password held only while registering or authenticating.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a candidate password against the length policy.
    ///
    /// Length is counted in characters, and the encoded form must also fit
    /// within [`PASSWORD_MAX_BYTES`].
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let length = raw.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) || raw.len() > PASSWORD_MAX_BYTES {
            return Err(UserValidationError::InvalidPassword {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Borrow the plaintext.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Opaque password digest produced by a [`PasswordHasher`].
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest string, rejecting blank values.
    pub fn new(digest: impl Into<String>) -> Result<Self, UserValidationError> {
        let digest = digest.into();
        if digest.trim().is_empty() {
            return Err(UserValidationError::MissingPasswordDigest);
        }
        Ok(Self(digest))
    }

    /// Borrow the encoded digest.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// Raw user fields read back from storage, validated by [`User::from_persisted`].
#[derive(Debug, Clone)]
pub struct PersistedUser {
    pub id: UserId,
    pub email: String,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registered application user.
///
/// ## Invariants
/// - `email` is a valid, normalised address.
/// - `password_digest` is always present.
/// - `updated_at >= created_at`; `created_at` never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    password_digest: PasswordDigest,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Register a new user, hashing the password through `hasher`.
    ///
    /// Email is checked before the password so malformed addresses are
    /// reported even when both fields are invalid.
    pub fn new(
        email: &str,
        password: &str,
        hasher: &dyn PasswordHasher,
        now: DateTime<Utc>,
    ) -> Result<Self, UserValidationError> {
        let email = Email::parse(email)?;
        let password = Password::new(password)?;
        Self::register(email, &password, hasher, now)
    }

    /// Register a user from already validated components.
    pub fn register(
        email: Email,
        password: &Password,
        hasher: &dyn PasswordHasher,
        now: DateTime<Utc>,
    ) -> Result<Self, UserValidationError> {
        let password_digest = hasher
            .hash(password)
            .map_err(|err| UserValidationError::Hashing {
                message: err.to_string(),
            })?;

        Ok(Self {
            id: UserId::random(),
            email,
            password_digest,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a stored record, re-checking every invariant.
    pub fn from_persisted(record: PersistedUser) -> Result<Self, UserValidationError> {
        let user = Self {
            id: record.id,
            email: Email::parse(&record.email)?,
            password_digest: PasswordDigest::new(record.password_digest)?,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        user.validate()?;
        Ok(user)
    }

    /// Re-check field invariants.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.id.is_nil() {
            return Err(UserValidationError::InvalidId);
        }
        if self.password_digest.as_str().trim().is_empty() {
            return Err(UserValidationError::MissingPasswordDigest);
        }
        if self.updated_at < self.created_at {
            return Err(UserValidationError::InvalidTimestamps);
        }
        Ok(())
    }

    /// Check a candidate password against the stored digest.
    pub fn compare_password(&self, hasher: &dyn PasswordHasher, candidate: &str) -> bool {
        hasher.verify(&self.password_digest, candidate)
    }

    /// Re-stamp the modification time ahead of persisting a change.
    pub fn before_update(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored password digest.
    pub fn password_digest(&self) -> &PasswordDigest {
        &self.password_digest
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests;
