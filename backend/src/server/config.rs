//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::Clock;
use todo_backend::domain::ports::TokenService;
use todo_backend::inbound::http::session::SessionCookieSettings;
use todo_backend::outbound::persistence::DbPool;
use todo_backend::outbound::security::BcryptPasswordHasher;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session: SessionCookieSettings,
    pub(crate) hasher: BcryptPasswordHasher,
    pub(crate) tokens: Arc<dyn TokenService>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration backed by in-memory storage.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        session: SessionCookieSettings,
        hasher: BcryptPasswordHasher,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bind_addr,
            session,
            hasher,
            tokens,
            clock,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, the user and task repositories are Diesel-backed;
    /// otherwise they live in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
