//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that orchestrate them. Entities
//! validate their own invariants; services enforce ownership and map every
//! failure into the transport agnostic [`Error`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User (alias to `user::User`) — registered account with a password digest.
//! - Task (alias to `task::Task`) — a user's to-do item.
//! - UserService / TaskService — driving port implementations.

pub mod auth;
pub mod error;
pub mod ports;
pub mod task;
pub mod task_service;
pub mod user;
pub mod user_service;

pub use self::auth::{Credentials, CredentialsValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::task::{
    PersistedTask, TASK_TEXT_MAX, Task, TaskId, TaskOrder, TaskText, TaskValidationError,
};
pub use self::task_service::TaskService;
pub use self::user::{
    EMAIL_MAX, Email, PASSWORD_MAX, PASSWORD_MAX_BYTES, PASSWORD_MIN, Password, PasswordDigest,
    PersistedUser, User, UserId, UserValidationError,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use todo_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
