//! Backend entry-point: loads settings, wires adapters, and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use todo_backend::inbound::http::health::HealthState;
use todo_backend::inbound::http::session::SessionCookieSettings;
use todo_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use todo_backend::outbound::security::{BcryptPasswordHasher, JwtTokenService};
use todo_backend::settings::{AppSettings, BuildMode};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).wrap_err("failed to load settings")?;
    let config = build_server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting http server");
    let server = create_server(health_state.clone(), config).wrap_err("failed to bind")?;
    server.await.wrap_err("http server failed")?;
    health_state.mark_draining();
    Ok(())
}

async fn build_server_config(settings: &AppSettings) -> Result<ServerConfig> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let signing_key = settings.signing_key(BuildMode::from_debug_assertions())?;
    let tokens = Arc::new(JwtTokenService::new(
        &signing_key,
        settings.session_lifetime()?,
        clock.clone(),
    ));
    let hasher = BcryptPasswordHasher::new(settings.bcrypt_cost()?)?;
    let session = SessionCookieSettings::new(settings.cookie_secure())
        .with_domain(settings.cookie_domain());

    let config = ServerConfig::new(settings.bind_addr()?, session, hasher, tokens, clock);

    let Some(database_url) = settings.database_url() else {
        warn!("no database url configured; data lives in memory only");
        return Ok(config);
    };

    let applied = run_pending_migrations(database_url)
        .await
        .wrap_err("failed to migrate database")?;
    info!(applied = ?applied, "database schema is current");

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("failed to build database pool")?;
    Ok(config.with_db_pool(pool))
}
