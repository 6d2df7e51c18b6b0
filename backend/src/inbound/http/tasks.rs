//! Tasks API handlers.
//!
//! Every route requires an authenticated caller and only ever touches the
//! caller's own tasks.
//!
//! ```text
//! GET /api/v1/tasks
//! POST /api/v1/tasks {"text":"buy milk","order":2}
//! PUT /api/v1/tasks/{id} {"text":"buy oat milk"}
//! DELETE /api/v1/tasks/{id}
//! PUT /api/v1/tasks/{id}/mark-completed
//! PUT /api/v1/tasks/{id}/mark-not-completed
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::CreateTaskRequest;
use crate::domain::{Error, Task, TaskId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/tasks`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    #[schema(example = "buy milk")]
    pub text: String,
    /// Display position; defaults to 0.
    #[serde(default)]
    #[schema(example = 2, minimum = 0)]
    pub order: Option<i64>,
}

/// Body for `PUT /api/v1/tasks/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskBody {
    #[schema(example = "buy oat milk")]
    pub text: String,
    /// New display position; the current one is kept when omitted.
    #[serde(default)]
    #[schema(example = 3, minimum = 0)]
    pub order: Option<i64>,
}

/// Public view of a task.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[schema(example = "0b9ad4a4-9c0e-4b35-9f0c-5bb5d9a3d6b1")]
    pub id: String,
    #[schema(example = "buy milk")]
    pub text: String,
    pub order: i32,
    pub completed: bool,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            text: task.text().to_string(),
            order: task.order().value(),
            completed: task.is_completed(),
            user_id: task.owner().to_string(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

fn parse_task_id(raw: &str) -> Result<TaskId, Error> {
    TaskId::new(raw).map_err(|err| {
        Error::invalid_request(format!("invalid task id: {err}"))
            .with_details(json!({ "field": "id", "code": "invalid_task_id" }))
    })
}

/// List the caller's tasks, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    responses(
        (status = 200, description = "Tasks", body = [TaskResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<TaskResponse>>> {
    let tasks = state.tasks_query.list_by_owner(user.id()).await?;
    Ok(web::Json(tasks.iter().map(TaskResponse::from).collect()))
}

/// Create a task owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTaskBody,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid text or order", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateTaskBody>,
) -> ApiResult<HttpResponse> {
    let CreateTaskBody { text, order } = payload.into_inner();
    let task = state
        .tasks
        .create_task(CreateTaskRequest {
            owner: user.into_inner(),
            text,
            order,
        })
        .await?;
    Ok(HttpResponse::Created().json(TaskResponse::from(&task)))
}

/// Replace a task's text and optionally its order.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = UpdateTaskBody,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid id, text or order", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Task belongs to another user", body = Error),
        (status = 404, description = "Task not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[put("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateTaskBody>,
) -> ApiResult<web::Json<TaskResponse>> {
    let id = parse_task_id(&path)?;
    let task = state
        .tasks
        .update_task(&id, &payload.text, payload.order, user.id())
        .await?;
    Ok(web::Json(TaskResponse::from(&task)))
}

/// Delete a task.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Task belongs to another user", body = Error),
        (status = 404, description = "Task not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_task_id(&path)?;
    state.tasks.delete_task(&id, user.id()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark a task completed.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}/mark-completed",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task completed", body = TaskResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Task belongs to another user", body = Error),
        (status = 404, description = "Task not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "markTaskCompleted"
)]
#[put("/tasks/{id}/mark-completed")]
pub async fn mark_completed(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<TaskResponse>> {
    let id = parse_task_id(&path)?;
    let task = state.tasks.mark_completed(&id, user.id()).await?;
    Ok(web::Json(TaskResponse::from(&task)))
}

/// Mark a task not completed.
#[utoipa::path(
    put,
    path = "/api/v1/tasks/{id}/mark-not-completed",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task reopened", body = TaskResponse),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Task belongs to another user", body = Error),
        (status = 404, description = "Task not found", body = Error)
    ),
    tags = ["tasks"],
    operation_id = "markTaskNotCompleted"
)]
#[put("/tasks/{id}/mark-not-completed")]
pub async fn mark_not_completed(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<TaskResponse>> {
    let id = parse_task_id(&path)?;
    let task = state.tasks.mark_not_completed(&id, user.id()).await?;
    Ok(web::Json(TaskResponse::from(&task)))
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
