use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::warn;

/// Default bind address for the HTTP server.
const DEFAULT_BIND: &str = "127.0.0.1:4000";

/// Default browser origin allowed to send credentialed requests.
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Default session lifetime: 7 days.
const DEFAULT_SESSION_TTL_HOURS: &str = "168";

/// Default connection pool size. Small service, small pool.
const DEFAULT_POOL_SIZE: &str = "5";

/// Runtime configuration for the murmur service.
///
/// Everything comes from the environment; the binary loads `.env` first
/// so local setups keep their values next to the code.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to (`MURMUR_BIND`).
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string (`DATABASE_URL`, required).
    pub database_url: String,
    /// Browser origin allowed by CORS with credentials (`CORS_ORIGIN`).
    pub cors_origin: String,
    /// Session lifetime in hours (`SESSION_TTL_HOURS`).
    pub session_ttl_hours: i64,
    /// Mark the session cookie `Secure` (`COOKIE_SECURE`).
    pub cookie_secure: bool,
    /// Maximum connections in the sqlx pool (`MURMUR_DB_POOL`).
    pub max_connections: u32,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Fails with an actionable message when `DATABASE_URL` is missing;
    /// every other value falls back to a default with a logged warning.
    pub fn load() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context(
            "DATABASE_URL is not set\n\nSet it in the environment or a .env file, e.g.\n  DATABASE_URL=postgres://localhost/murmur",
        )?;

        let bind_addr: SocketAddr = env_or("MURMUR_BIND", DEFAULT_BIND)?;
        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());
        let session_ttl_hours: i64 = env_or("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?;
        let cookie_secure: bool = env_or("COOKIE_SECURE", "false")?;
        let max_connections: u32 = env_or("MURMUR_DB_POOL", DEFAULT_POOL_SIZE)?;

        if session_ttl_hours <= 0 {
            anyhow::bail!("SESSION_TTL_HOURS must be positive, got {session_ttl_hours}");
        }

        Ok(Self {
            bind_addr,
            database_url,
            cors_origin,
            session_ttl_hours,
            cookie_secure,
            max_connections,
        })
    }
}

/// Read an env var, falling back to `default` when unset, and parse it.
///
/// An unset variable is routine; a present-but-unparsable one is a
/// configuration error and fails the load.
fn env_or<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        warn!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("invalid {key} value '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_uses_default_when_unset() {
        let port: u16 = env_or("MURMUR_TEST_UNSET_PORT", "4000").unwrap();
        assert_eq!(port, 4000);
    }

    #[test]
    fn env_or_rejects_garbage() {
        std::env::set_var("MURMUR_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = env_or("MURMUR_TEST_BAD_PORT", "4000");
        assert!(result.is_err());
        std::env::remove_var("MURMUR_TEST_BAD_PORT");
    }

    #[test]
    fn default_bind_parses() {
        let addr: SocketAddr = DEFAULT_BIND.parse().unwrap();
        assert_eq!(addr.port(), 4000);
    }
}
