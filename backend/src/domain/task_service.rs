//! Task domain services.
//!
//! Every mutating operation follows the same protocol: load the task, reject
//! callers who do not own it, and only then apply the change and persist it.
//! A rejected caller never causes a write.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateTaskRequest, TaskRepository, TaskRepositoryError, TasksCommand, TasksQuery,
};
use crate::domain::{Error, Task, TaskId, TaskValidationError, UserId};

fn task_not_found() -> Error {
    Error::not_found("task not found").with_details(json!({ "code": "task_not_found" }))
}

fn unauthorized_action() -> Error {
    Error::forbidden("unauthorized action").with_details(json!({ "code": "unauthorized_action" }))
}

fn map_repository_error(error: TaskRepositoryError) -> Error {
    match error {
        TaskRepositoryError::NotFound => task_not_found(),
        TaskRepositoryError::Duplicate => Error::conflict("task already exists")
            .with_details(json!({ "code": "task_already_exists" })),
        TaskRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("task repository unavailable: {message}"))
        }
        TaskRepositoryError::Query { message } => {
            Error::internal(format!("task repository error: {message}"))
        }
    }
}

fn map_validation_error(error: TaskValidationError) -> Error {
    let (field, code) = match error {
        TaskValidationError::EmptyText | TaskValidationError::TextTooLong { .. } => {
            ("text", "invalid_text")
        }
        TaskValidationError::NegativeOrder | TaskValidationError::OrderOutOfRange => {
            ("order", "invalid_order")
        }
        TaskValidationError::NilOwner => ("owner", "invalid_owner"),
        TaskValidationError::EmptyId
        | TaskValidationError::InvalidId
        | TaskValidationError::InvalidTimestamps => {
            return Error::internal(format!("invalid task record: {error}"));
        }
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// Task service implementing the task driving ports.
#[derive(Clone)]
pub struct TaskService<R> {
    task_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TaskService<R> {
    /// Create a new service with the task repository and clock.
    pub fn new(task_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { task_repo, clock }
    }
}

impl<R> TaskService<R>
where
    R: TaskRepository,
{
    async fn load_owned(&self, id: &TaskId, caller: &UserId) -> Result<Task, Error> {
        let task = self
            .task_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?;
        if !task.is_owned_by(caller) {
            debug!(task_id = %id, caller = %caller, "rejected task access by non-owner");
            return Err(unauthorized_action());
        }
        Ok(task)
    }

    async fn mutate<F>(&self, id: &TaskId, caller: &UserId, change: F) -> Result<Task, Error>
    where
        F: FnOnce(&mut Task, DateTime<Utc>) -> Result<(), TaskValidationError> + Send,
    {
        let mut task = self.load_owned(id, caller).await?;
        change(&mut task, self.clock.utc()).map_err(map_validation_error)?;
        self.task_repo
            .update(&task)
            .await
            .map_err(map_repository_error)?;
        Ok(task)
    }
}

#[async_trait]
impl<R> TasksCommand for TaskService<R>
where
    R: TaskRepository,
{
    async fn create_task(&self, request: CreateTaskRequest) -> Result<Task, Error> {
        let task = Task::new(
            &request.text,
            request.order,
            request.owner,
            self.clock.utc(),
        )
        .map_err(map_validation_error)?;

        self.task_repo
            .save(&task)
            .await
            .map_err(map_repository_error)?;

        info!(task_id = %task.id(), owner = %task.owner(), "created task");
        Ok(task)
    }

    async fn update_task(
        &self,
        id: &TaskId,
        text: &str,
        order: Option<i64>,
        caller: &UserId,
    ) -> Result<Task, Error> {
        self.mutate(id, caller, |task, now| {
            task.set_text(text, now)?;
            match order {
                Some(order) => task.set_order(order, now),
                None => Ok(()),
            }
        })
        .await
    }

    async fn mark_completed(&self, id: &TaskId, caller: &UserId) -> Result<Task, Error> {
        self.mutate(id, caller, |task, now| {
            task.mark_completed(now);
            Ok(())
        })
        .await
    }

    async fn mark_not_completed(&self, id: &TaskId, caller: &UserId) -> Result<Task, Error> {
        self.mutate(id, caller, |task, now| {
            task.mark_not_completed(now);
            Ok(())
        })
        .await
    }

    async fn delete_task(&self, id: &TaskId, caller: &UserId) -> Result<(), Error> {
        let task = self.load_owned(id, caller).await?;
        self.task_repo
            .delete(task.id())
            .await
            .map_err(map_repository_error)?;
        info!(task_id = %id, "deleted task");
        Ok(())
    }
}

#[async_trait]
impl<R> TasksQuery for TaskService<R>
where
    R: TaskRepository,
{
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Task>, Error> {
        self.task_repo
            .find_all_by_owner(owner)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "task_service_tests.rs"]
mod tests;
