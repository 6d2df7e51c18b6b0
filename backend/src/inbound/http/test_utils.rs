//! Test helpers for inbound HTTP components.
//!
//! Builds an [`HttpState`] over the in-memory repositories, the fixture
//! password hasher, and a JWT service driven by a [`MutableClock`].

use std::sync::Arc;

use actix_web::web;
use chrono::TimeDelta;

use crate::domain::ports::FixturePasswordHasher;
use crate::domain::{Credentials, TaskService, UserId, UserService};
use crate::outbound::memory::{InMemoryTaskRepository, InMemoryUserRepository};
use crate::outbound::security::JwtTokenService;
use crate::test_support::MutableClock;

use super::session::SessionCookieSettings;
use super::state::{HttpState, HttpStatePorts};

pub(crate) const TEST_PASSWORD: &str = "correct horse";
const TEST_SIGNING_KEY: &[u8] = b"http-test-signing-key";

/// Wired adapter state plus the clock that drives it.
pub(crate) struct TestContext {
    pub state: HttpState,
    pub clock: Arc<MutableClock>,
}

impl TestContext {
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::at_fixture_time());
        let users = Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(FixturePasswordHasher),
            clock.clone(),
        ));
        let tasks = Arc::new(TaskService::new(
            Arc::new(InMemoryTaskRepository::default()),
            clock.clone(),
        ));
        let tokens = Arc::new(JwtTokenService::new(
            TEST_SIGNING_KEY,
            TimeDelta::minutes(60),
            clock.clone(),
        ));

        let state = HttpState::new(
            HttpStatePorts {
                users: users.clone(),
                users_query: users.clone(),
                login: users,
                tasks: tasks.clone(),
                tasks_query: tasks,
                tokens,
            },
            SessionCookieSettings::new(false),
            clock.clone(),
        );
        Self { state, clock }
    }

    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.state.clone())
    }
}

/// A registered account and a token issued for it.
pub(crate) struct TestSession {
    pub user_id: UserId,
    pub token: String,
}

/// Register `email` with [`TEST_PASSWORD`] and issue a token directly.
pub(crate) async fn register_and_login(ctx: &TestContext, email: &str) -> TestSession {
    let credentials = Credentials::try_from_parts(email, TEST_PASSWORD).expect("credentials");
    let user = ctx
        .state
        .users
        .register_new_user(&credentials)
        .await
        .expect("registration succeeds");
    let issued = ctx.state.tokens.issue(user.id()).expect("token issues");
    TestSession {
        user_id: user.id().clone(),
        token: issued.token,
    }
}
