//! Builders for the HTTP adapter state.
//!
//! The same services are wired over either the Diesel repositories or the
//! in-memory ones, depending on whether a pool was configured.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;
use tracing::info;

use todo_backend::domain::ports::{PasswordHasher, TaskRepository, TokenService, UserRepository};
use todo_backend::domain::{TaskService, UserService};
use todo_backend::inbound::http::state::{HttpState, HttpStatePorts};
use todo_backend::outbound::memory::{InMemoryTaskRepository, InMemoryUserRepository};
use todo_backend::outbound::persistence::{DieselTaskRepository, DieselUserRepository};

use super::ServerConfig;

/// Wire both services over the given repositories.
fn build_ports<U, T, H>(
    user_repo: Arc<U>,
    task_repo: Arc<T>,
    hasher: Arc<H>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
    H: PasswordHasher + 'static,
{
    let users = Arc::new(UserService::new(user_repo, hasher, clock.clone()));
    let tasks = Arc::new(TaskService::new(task_repo, clock));
    HttpStatePorts {
        users: users.clone(),
        users_query: users.clone(),
        login: users,
        tasks: tasks.clone(),
        tasks_query: tasks,
        tokens,
    }
}

/// Build the shared HTTP state from the server configuration.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(config.hasher);
    let tokens = config.tokens.clone();
    let clock = config.clock.clone();

    let ports = match &config.db_pool {
        Some(pool) => {
            info!(storage = "postgres", "wiring repositories");
            build_ports(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselTaskRepository::new(pool.clone())),
                hasher,
                tokens,
                clock.clone(),
            )
        }
        None => {
            info!(storage = "memory", "wiring repositories");
            build_ports(
                Arc::new(InMemoryUserRepository::default()),
                Arc::new(InMemoryTaskRepository::default()),
                hasher,
                tokens,
                clock.clone(),
            )
        }
    };

    web::Data::new(HttpState::new(ports, config.session.clone(), clock))
}
