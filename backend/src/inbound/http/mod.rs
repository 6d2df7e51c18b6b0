//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod session;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Route JSON body and path extraction failures through the shared error
/// envelope.
pub fn configure_json(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler));
}

/// Versioned REST API.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use todo_backend::inbound::http::{api_scope, configure_json};
///
/// let _app = App::new().configure(configure_json).service(api_scope());
/// ```
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api/v1")
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(tasks::list_tasks)
        .service(tasks::create_task)
        .service(tasks::update_task)
        .service(tasks::delete_task)
        .service(tasks::mark_completed)
        .service(tasks::mark_not_completed)
}
