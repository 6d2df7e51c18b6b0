//! Shared Diesel error mapping for the user and task repositories.

use tracing::debug;

use super::pool::PoolError;

/// Constructors a repository supplies for each failure category.
pub(crate) struct RepositoryErrorKinds<E> {
    pub not_found: fn() -> E,
    pub duplicate: fn() -> E,
    pub connection: fn(String) -> E,
    pub query: fn(String) -> E,
}

/// Map pool errors into the repository's connection error.
pub(crate) fn map_basic_pool_error<E>(error: PoolError, kinds: &RepositoryErrorKinds<E>) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    (kinds.connection)(message)
}

/// Map common Diesel error variants into repository errors.
///
/// Unique violations become duplicates and closed connections become
/// connection errors; everything else is a query failure.
pub(crate) fn map_basic_diesel_error<E>(
    error: diesel::result::Error,
    kinds: &RepositoryErrorKinds<E>,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => (kinds.not_found)(),
        DieselError::QueryBuilderError(_) => (kinds.query)("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => (kinds.duplicate)(),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (kinds.connection)("database connection error".to_owned())
        }
        _ => (kinds.query)("database error".to_owned()),
    }
}
