//! Environment-driven configuration for the API server.

use std::str::FromStr;

use crate::auth::jwt::AuthConfig;

/// Read `key`, falling back to `default` when unset, and parse it.
///
/// Panics with a message naming the variable when the value does not parse;
/// configuration errors abort startup.
fn env_parse<T>(key: &str, default: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}"))
}

/// HTTP server settings.
///
/// | Env Var                 | Default                 |
/// |-------------------------|-------------------------|
/// | `HOST`                  | `0.0.0.0`               |
/// | `PORT`                  | `3000`                  |
/// | `CORS_ORIGINS`          | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
/// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
///
/// Credential settings are described on [`AuthConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`; blanks are dropped.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Upper bound on closing the database pool after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("PORT", "3000"),
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", "30"),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", "30"),
            auth: AuthConfig::from_env(),
        }
    }
}

/// Database settings, read before the server config so the pool can be
/// opened and migrated first.
///
/// | Env Var                    | Required | Default |
/// |----------------------------|----------|---------|
/// | `DATABASE_URL`             | **yes**  | --      |
/// | `DATABASE_MAX_CONNECTIONS` | no       | `10`    |
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS", "10"),
        }
    }
}
