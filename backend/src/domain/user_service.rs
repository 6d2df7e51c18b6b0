//! Account domain services.
//!
//! [`UserService`] implements the registration, login, and lookup driving
//! ports on top of a [`UserRepository`] and a [`PasswordHasher`]. Hashing is
//! CPU-bound, so it runs on the blocking thread pool.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHasher, UserRepository, UserRepositoryError, UsersCommand, UsersQuery,
};
use crate::domain::{Credentials, Email, Error, Password, User, UserId, UserValidationError};

const INCORRECT_CREDENTIALS: &str = "incorrect email or password";

fn user_not_found() -> Error {
    Error::not_found("user not found").with_details(json!({ "code": "user_not_found" }))
}

fn user_already_exists() -> Error {
    Error::conflict("user already exists").with_details(json!({ "code": "user_already_exists" }))
}

fn incorrect_credentials() -> Error {
    Error::unauthorized(INCORRECT_CREDENTIALS)
        .with_details(json!({ "code": "incorrect_credentials" }))
}

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::NotFound => user_not_found(),
        UserRepositoryError::Duplicate => user_already_exists(),
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_validation_error(error: UserValidationError) -> Error {
    match error {
        UserValidationError::InvalidEmail => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        UserValidationError::InvalidPassword { min, max } => {
            Error::invalid_request(error.to_string()).with_details(json!({
                "field": "password",
                "code": "invalid_password",
                "min": min,
                "max": max,
            }))
        }
        UserValidationError::Hashing { message } => {
            Error::internal(format!("password hashing failed: {message}"))
        }
        UserValidationError::EmptyId
        | UserValidationError::InvalidId
        | UserValidationError::MissingPasswordDigest
        | UserValidationError::InvalidTimestamps => {
            Error::internal(format!("invalid user record: {error}"))
        }
    }
}

/// Account service implementing the user driving ports.
#[derive(Clone)]
pub struct UserService<R, H> {
    user_repo: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> UserService<R, H> {
    /// Create a new service.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use todo_backend::domain::UserService;
    /// use todo_backend::domain::ports::FixturePasswordHasher;
    /// use todo_backend::outbound::memory::InMemoryUserRepository;
    ///
    /// let service = UserService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(FixturePasswordHasher),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(user_repo: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_repo,
            hasher,
            clock,
        }
    }
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn ensure_email_available(&self, email: &Email) -> Result<(), Error> {
        match self.user_repo.find_by_email(email).await {
            Ok(_) => Err(user_already_exists()),
            Err(UserRepositoryError::NotFound) => Ok(()),
            Err(other) => Err(map_repository_error(other)),
        }
    }

    async fn hash_new_user(&self, email: Email, password: Password) -> Result<User, Error> {
        let hasher = Arc::clone(&self.hasher);
        let now = self.clock.utc();
        tokio::task::spawn_blocking(move || User::register(email, &password, hasher.as_ref(), now))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_validation_error)
    }

    async fn verify_password(&self, user: User, candidate: &str) -> Result<(User, bool), Error> {
        let hasher = Arc::clone(&self.hasher);
        let candidate = Zeroizing::new(candidate.to_owned());
        tokio::task::spawn_blocking(move || {
            let matches = user.compare_password(hasher.as_ref(), &candidate);
            (user, matches)
        })
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
    }
}

#[async_trait]
impl<R, H> UsersCommand for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register_new_user(&self, credentials: &Credentials) -> Result<User, Error> {
        let email = Email::parse(credentials.email()).map_err(map_validation_error)?;
        let password = Password::new(credentials.password()).map_err(map_validation_error)?;

        self.ensure_email_available(&email).await?;

        let user = self.hash_new_user(email, password).await?;
        self.user_repo
            .save(&user)
            .await
            .map_err(map_repository_error)?;

        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }
}

#[async_trait]
impl<R, H> LoginService for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate_user(&self, credentials: &Credentials) -> Result<User, Error> {
        let Ok(email) = Email::parse(credentials.email()) else {
            debug!("login rejected: malformed email");
            return Err(incorrect_credentials());
        };

        let user = match self.user_repo.find_by_email(&email).await {
            Ok(user) => user,
            Err(UserRepositoryError::NotFound) => {
                debug!("login rejected: unknown email");
                return Err(incorrect_credentials());
            }
            Err(other) => return Err(map_repository_error(other)),
        };

        let (user, matches) = self.verify_password(user, credentials.password()).await?;
        if !matches {
            debug!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(incorrect_credentials());
        }

        debug!(user_id = %user.id(), "login accepted");
        Ok(user)
    }
}

#[async_trait]
impl<R, H> UsersQuery for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn find_user_by_id(&self, id: &UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
