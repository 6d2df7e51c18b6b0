//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    LoginService, TasksCommand, TasksQuery, TokenService, UsersCommand, UsersQuery,
};

use super::session::SessionCookieSettings;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub login: Arc<dyn LoginService>,
    pub tasks: Arc<dyn TasksCommand>,
    pub tasks_query: Arc<dyn TasksQuery>,
    pub tokens: Arc<dyn TokenService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub login: Arc<dyn LoginService>,
    pub tasks: Arc<dyn TasksCommand>,
    pub tasks_query: Arc<dyn TasksQuery>,
    pub tokens: Arc<dyn TokenService>,
    pub session: SessionCookieSettings,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from a ports bundle and session cookie policy.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use chrono::TimeDelta;
    /// use mockable::DefaultClock;
    /// use todo_backend::domain::ports::FixturePasswordHasher;
    /// use todo_backend::domain::{TaskService, UserService};
    /// use todo_backend::inbound::http::session::SessionCookieSettings;
    /// use todo_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use todo_backend::outbound::memory::{InMemoryTaskRepository, InMemoryUserRepository};
    /// use todo_backend::outbound::security::JwtTokenService;
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(UserService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(FixturePasswordHasher),
    ///     clock.clone(),
    /// ));
    /// let tasks = Arc::new(TaskService::new(
    ///     Arc::new(InMemoryTaskRepository::default()),
    ///     clock.clone(),
    /// ));
    /// let tokens = Arc::new(JwtTokenService::new(b"secret", TimeDelta::minutes(60), clock.clone()));
    ///
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         users: users.clone(),
    ///         users_query: users.clone(),
    ///         login: users,
    ///         tasks: tasks.clone(),
    ///         tasks_query: tasks,
    ///         tokens,
    ///     },
    ///     SessionCookieSettings::new(false),
    ///     clock,
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(
        ports: HttpStatePorts,
        session: SessionCookieSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let HttpStatePorts {
            users,
            users_query,
            login,
            tasks,
            tasks_query,
            tokens,
        } = ports;
        Self {
            users,
            users_query,
            login,
            tasks,
            tasks_query,
            tokens,
            session,
            clock,
        }
    }
}
