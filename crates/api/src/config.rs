use std::str::FromStr;

use crate::auth::jwt::JwtConfig;
use crate::auth::password::PasswordPolicy;

/// Everything the server reads from its environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    pub db_max_connections: u32,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
    /// Requests running longer than this are answered with 408.
    pub request_timeout_secs: u64,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    pub jwt: JwtConfig,
    /// Rules a new account's password must satisfy.
    pub password: PasswordPolicy,
}

impl ServerConfig {
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `DATABASE_URL`         | (required)                 |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_BODY_BYTES`       | `1048576`                  |
    ///
    /// JWT and password settings are documented on [`JwtConfig::from_env`]
    /// and [`PasswordPolicy::from_env`].
    ///
    /// # Panics
    ///
    /// On a missing `DATABASE_URL` or a value that does not parse.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").unwrap_or_default();
        assert!(!database_url.is_empty(), "DATABASE_URL must be set");

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            max_body_bytes: env_or("MAX_BODY_BYTES", 1024 * 1024),
            jwt: JwtConfig::from_env(),
            password: PasswordPolicy::from_env(),
        }
    }
}

/// Parse `name` from the environment, or fall back to `default` when unset.
///
/// # Panics
///
/// If the variable is set but does not parse as `T`.
pub(crate) fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value {raw:?}: {e}")),
        Err(_) => default,
    }
}
