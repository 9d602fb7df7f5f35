//! HTTP server configuration object.
//!
//! Everything the server needs is constructed explicitly in `main` and
//! carried here; there are no module-level globals and no hidden singletons.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use chrono::Duration;

use crate::domain::AuthMode;
use crate::outbound::llm::CompletionClientConfig;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) auth_mode: AuthMode,
    pub(crate) token_secret: Vec<u8>,
    pub(crate) token_ttl: Duration,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) completion: Option<CompletionClientConfig>,
}

impl ServerConfig {
    /// Construct a server configuration from the required pieces.
    ///
    /// Persistence and the completion provider default to the in-memory and
    /// fixture adapters until attached.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        bind_addr: SocketAddr,
        auth_mode: AuthMode,
        token_secret: Vec<u8>,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site: SameSite::Lax,
            bind_addr,
            auth_mode,
            token_secret,
            token_ttl: crate::domain::default_token_ttl(),
            db_pool: None,
            completion: None,
        }
    }

    /// Attach a database connection pool for the Diesel adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach a completion provider configuration.
    #[must_use]
    pub fn with_completion(mut self, completion: CompletionClientConfig) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Override the bearer-token lifetime.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Override the session cookie `SameSite` policy.
    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
