//! Request authentication for protected handlers.
//!
//! [`AuthenticatedUser`] resolves the caller from the session cookie or an
//! `Authorization: Bearer` header, verifies the token, and confirms the
//! account still exists. Any failure is a `401 Unauthorized`.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::TokenError;
use crate::domain::{Error, ErrorCode, UserId};

use super::session::SESSION_COOKIE_NAME;
use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller behind a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    pub fn id(&self) -> &UserId {
        &self.0
    }

    pub fn into_inner(self) -> UserId {
        self.0
    }
}

fn unauthorized(code: &str) -> Error {
    Error::unauthorized("authentication required").with_details(json!({ "code": code }))
}

/// Prefer an explicit bearer header over the cookie.
fn token_from_request(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned);

    bearer.or_else(|| {
        req.cookie(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
    })
}

fn map_token_error(error: TokenError) -> Error {
    debug!(%error, "session token rejected");
    match error {
        TokenError::Expired => unauthorized("token_expired"),
        TokenError::Invalid | TokenError::Issue { .. } => unauthorized("invalid_token"),
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = token_from_request(req);

        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state missing from application"))?;
            let token = token.ok_or_else(|| unauthorized("missing_token"))?;
            let user_id = state.tokens.verify(&token).map_err(map_token_error)?;

            match state.users_query.find_user_by_id(&user_id).await {
                Ok(user) => Ok(Self(user.id().clone())),
                Err(error) if error.code() == ErrorCode::NotFound => {
                    debug!(user_id = %user_id, "token names an unknown user");
                    Err(unauthorized("invalid_token"))
                }
                Err(error) => Err(error),
            }
        })
    }
}
