//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint in the inbound layer, the request
//! and response bodies they exchange, and the two ways a session token can be
//! presented: the `jwt-token` cookie or an `Authorization: Bearer` header.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::session::SESSION_COOKIE_NAME;
use crate::inbound::http::tasks::{CreateTaskBody, TaskResponse, UpdateTaskBody};
use crate::inbound::http::users::{CredentialsRequest, LoginResponse, UserResponse};

/// Enrich the generated document with the session security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session token set by POST /api/v1/users/login.",
            ))),
        );
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "To-do list backend API",
        description = "Account registration, session login, and per-user task management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = []), ("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::tasks::mark_completed,
        crate::inbound::http::tasks::mark_not_completed,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CredentialsRequest,
        LoginResponse,
        UserResponse,
        CreateTaskBody,
        UpdateTaskBody,
        TaskResponse
    )),
    tags(
        (name = "users", description = "Registration and sessions"),
        (name = "tasks", description = "The caller's to-do items"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
