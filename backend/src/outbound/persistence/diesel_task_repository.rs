//! PostgreSQL-backed `TaskRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{PersistedTask, Task, TaskId, UserId};

use super::diesel_basic_error_mapping::{
    RepositoryErrorKinds, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewTaskRow, TaskRow, TaskUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::tasks;

const TASK_ERRORS: RepositoryErrorKinds<TaskRepositoryError> = RepositoryErrorKinds {
    not_found: TaskRepositoryError::not_found,
    duplicate: TaskRepositoryError::duplicate,
    connection: |message| TaskRepositoryError::connection(message),
    query: |message| TaskRepositoryError::query(message),
};

/// Diesel-backed implementation of the `TaskRepository` port.
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TaskRepositoryError {
    map_basic_pool_error(error, &TASK_ERRORS)
}

fn map_diesel_error(error: diesel::result::Error) -> TaskRepositoryError {
    map_basic_diesel_error(error, &TASK_ERRORS)
}

fn row_to_task(row: TaskRow) -> Result<Task, TaskRepositoryError> {
    let id = row.id;
    Task::from_persisted(PersistedTask {
        id: TaskId::from_uuid(row.id),
        text: row.text,
        order: i64::from(row.task_order),
        completed: row.completed,
        owner: UserId::from_uuid(row.user_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(|err| {
        warn!(task_id = %id, error = %err, "stored task record failed validation");
        TaskRepositoryError::query(format!("invalid stored task: {err}"))
    })
}

/// Zero affected rows means the task vanished between load and write.
fn expect_one_row(affected: usize) -> Result<(), TaskRepositoryError> {
    if affected == 0 {
        Err(TaskRepositoryError::not_found())
    } else {
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn save(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewTaskRow {
            id: *task.id().as_uuid(),
            text: task.text().as_ref(),
            task_order: task.order().value(),
            completed: task.is_completed(),
            user_id: *task.owner().as_uuid(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        };

        diesel::insert_into(tasks::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = TaskUpdate {
            text: task.text().as_ref(),
            task_order: task.order().value(),
            completed: task.is_completed(),
            updated_at: task.updated_at(),
        };

        let affected = diesel::update(tasks::table.find(task.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        expect_one_row(affected)
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Task, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = tasks::table
            .find(id.as_uuid())
            .select(TaskRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_task(row)
    }

    async fn find_all_by_owner(&self, owner: &UserId) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TaskRow> = tasks::table
            .filter(tasks::user_id.eq(owner.as_uuid()))
            .order((tasks::created_at.asc(), tasks::id.asc()))
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_task).collect()
    }

    async fn delete(&self, id: &TaskId) -> Result<(), TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(tasks::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        expect_one_row(affected)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for row conversion.
    use super::*;
    use crate::test_support::fixture_timestamp;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(text: &str, task_order: i32, user_id: Uuid) -> TaskRow {
        TaskRow {
            id: Uuid::new_v4(),
            text: text.to_owned(),
            task_order,
            completed: true,
            user_id,
            created_at: fixture_timestamp(),
            updated_at: fixture_timestamp(),
        }
    }

    #[rstest]
    fn valid_rows_become_tasks() {
        let owner = Uuid::new_v4();
        let source = row("water the plants", 3, owner);
        let task = row_to_task(source.clone()).expect("valid row");

        assert_eq!(task.id().as_uuid(), &source.id);
        assert_eq!(task.text().as_ref(), "water the plants");
        assert_eq!(task.order().value(), 3);
        assert!(task.is_completed());
        assert_eq!(task.owner().as_uuid(), &owner);
    }

    #[rstest]
    #[case(row("   ", 0, Uuid::new_v4()))]
    #[case(row("negative order", -1, Uuid::new_v4()))]
    #[case(row("nil owner", 0, Uuid::nil()))]
    fn corrupt_rows_are_query_errors(#[case] source: TaskRow) {
        let err = row_to_task(source).expect_err("corrupt row");
        assert!(matches!(err, TaskRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    fn affected_row_counts(#[case] affected: usize, #[case] ok: bool) {
        let result = expect_one_row(affected);
        assert_eq!(result.is_ok(), ok);
        if !ok {
            assert_eq!(result, Err(TaskRepositoryError::NotFound));
        }
    }
}
