//! Backend entry-point: reads the environment, wires adapters, serves HTTP.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use chrono::Duration;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::AuthMode;
use backend::outbound::llm::CompletionClientConfig;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{self, ServerConfig};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply pending migrations over a short-lived synchronous connection.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    use diesel::Connection;

    let mut conn = diesel::PgConnection::establish(database_url)
        .map_err(|e| std::io::Error::other(format!("migration connection failed: {e}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    if !applied.is_empty() {
        info!(count = applied.len(), "applied pending migrations");
    }
    Ok(())
}

/// Read secret bytes from a file path, with a dev-only ephemeral fallback.
fn read_secret(path_var: &str, default_path: &str) -> std::io::Result<Vec<u8>> {
    let path = env::var(path_var).unwrap_or_else(|_| default_path.into());
    match std::fs::read(&path) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            let allow_dev = env::var("SECRETS_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %path, error = %e, "using temporary secret (dev only)");
                Ok(Key::generate().master().to_vec())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read secret at {path}: {e}"
                )))
            }
        }
    }
}

fn parse_bind_addr() -> std::io::Result<SocketAddr> {
    let raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    raw.parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR {raw}: {e}")))
}

fn parse_auth_mode() -> std::io::Result<AuthMode> {
    let raw = env::var("AUTH_MODE").unwrap_or_else(|_| "bearer".into());
    AuthMode::parse(&raw)
        .ok_or_else(|| std::io::Error::other(format!("invalid AUTH_MODE {raw} (bearer|cookie)")))
}

fn parse_token_ttl() -> std::io::Result<Duration> {
    match env::var("TOKEN_TTL_MINUTES") {
        Ok(raw) => {
            let minutes: i64 = raw
                .parse()
                .map_err(|e| std::io::Error::other(format!("invalid TOKEN_TTL_MINUTES: {e}")))?;
            Ok(Duration::minutes(minutes))
        }
        Err(_) => Ok(backend::domain::default_token_ttl()),
    }
}

fn completion_config() -> std::io::Result<Option<CompletionClientConfig>> {
    let Ok(endpoint) = env::var("LLM_API_URL") else {
        return Ok(None);
    };
    let endpoint = Url::parse(&endpoint)
        .map_err(|e| std::io::Error::other(format!("invalid LLM_API_URL: {e}")))?;
    let api_key = env::var("LLM_API_KEY")
        .map_err(|_| std::io::Error::other("LLM_API_KEY required when LLM_API_URL is set"))?;
    let model = env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o".into());
    Ok(Some(CompletionClientConfig::new(endpoint, api_key, model)))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let session_secret = read_secret("SESSION_KEY_FILE", "/var/run/secrets/session_key")?;
    let key = Key::derive_from(&session_secret);
    let token_secret = read_secret("TOKEN_SECRET_FILE", "/var/run/secrets/token_secret")?;

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let mut config = ServerConfig::new(
        key,
        cookie_secure,
        parse_bind_addr()?,
        parse_auth_mode()?,
        token_secret,
    )
    .with_token_ttl(parse_token_ttl()?);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        let url = database_url.clone();
        tokio::task::spawn_blocking(move || run_migrations(&url))
            .await
            .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))??;

        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
        config = config.with_db_pool(pool);
    }

    if let Some(completion) = completion_config()? {
        config = config.with_completion(completion);
    }

    let (server, health_state) = server::run(&config)?;
    info!(addr = %config.bind_addr(), "listening");
    health_state.mark_ready();
    server.await
}
