//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Rows are rehydrated through `User::from_persisted`, so a record that no
//! longer satisfies the entity invariants surfaces as a query error instead
//! of leaking into the domain.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Email, PersistedUser, User, UserId};

use super::diesel_basic_error_mapping::{
    RepositoryErrorKinds, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const USER_ERRORS: RepositoryErrorKinds<UserRepositoryError> = RepositoryErrorKinds {
    not_found: UserRepositoryError::not_found,
    duplicate: UserRepositoryError::duplicate,
    connection: |message| UserRepositoryError::connection(message),
    query: |message| UserRepositoryError::query(message),
};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, &USER_ERRORS)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(error, &USER_ERRORS)
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let id = row.id;
    User::from_persisted(PersistedUser {
        id: UserId::from_uuid(row.id),
        email: row.email,
        password_digest: row.password_digest,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(|err| {
        warn!(user_id = %id, error = %err, "stored user record failed validation");
        UserRepositoryError::query(format!("invalid stored user: {err}"))
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn save(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            password_digest: user.password_digest().as_str(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }
}
