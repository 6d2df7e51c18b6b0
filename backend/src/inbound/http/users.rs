//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"email":"ada@example.com","password":"correct horse"}
//! POST /api/v1/users/login {"email":"ada@example.com","password":"correct horse"}
//! POST /api/v1/users/logout
//! GET /api/v1/users/current
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::TokenError;
use crate::domain::{Credentials, CredentialsValidationError, Error, ErrorCode, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Credentials body shared by registration and login.
///
/// Example JSON:
/// `{"email":"ada@example.com","password":"correct horse"}`
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "correct horse")]
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = CredentialsValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Public view of an account. The password digest never leaves the domain.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Token returned by a successful login; also set as the session cookie.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        CredentialsValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "invalid_password" }))
        }
    }
}

fn map_issue_error(err: TokenError) -> Error {
    Error::internal(format!("session token could not be issued: {err}"))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid email or password", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let user = state.users.register_new_user(&credentials).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Authenticate and establish a session.
///
/// Unknown emails and wrong passwords produce the same response.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie `jwt-token`"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Incorrect email or password", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let user = state.login.authenticate_user(&credentials).await?;
    let issued = state.tokens.issue(user.id()).map_err(map_issue_error)?;
    let cookie = state
        .session
        .issue(&issued.token, issued.expires_at, state.clock.utc());

    info!(user_id = %user.id(), "session established");
    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        token: issued.token,
    }))
}

/// Clear the session cookie. Tokens stay valid until they expire.
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses((status = 200, description = "Session cookie cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/users/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(state.session.expire())
        .json(json!({}))
}

/// Return the authenticated account.
#[utoipa::path(
    get,
    path = "/api/v1/users/current",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/current")]
pub async fn current_user(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let found = state
        .users_query
        .find_user_by_id(user.id())
        .await
        .map_err(|err| {
            if err.code() == ErrorCode::NotFound {
                Error::unauthorized("authentication required")
            } else {
                err
            }
        })?;
    Ok(web::Json(UserResponse::from(&found)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
