//! Application configuration

use std::env;

use account_service::AccountServiceConfig;
use common::db::DEFAULT_DATABASE_URL;
use common::error::{Error, Result};

/// Minimum length of the cookie signing secret in bytes
pub const MIN_SECRET_KEY_LEN: usize = 32;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address
    pub host: String,
    /// Listening port
    pub port: u16,
    /// Cookie signing secret
    pub secret_key: String,
    /// Database URL
    pub database_url: String,
    /// Database connection pool size
    pub db_pool_size: u32,
    /// Session lifetime in seconds
    pub session_ttl_secs: i64,
    /// Interval between expired session sweeps
    pub session_purge_interval_secs: u64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Accept collector and admin roles on the public signup form
    pub allow_privileged_signup: bool,
    /// Mark the session cookie Secure
    pub cookie_secure: bool,
    /// Debug logging
    pub debug: bool,
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create a new configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("SECRET_KEY")
            .ok_or_else(|| Error::ConfigurationError("SECRET_KEY must be set".to_string()))?;
        if secret_key.len() < MIN_SECRET_KEY_LEN {
            return Err(Error::ConfigurationError(format!(
                "SECRET_KEY must be at least {} bytes",
                MIN_SECRET_KEY_LEN
            )));
        }

        let config = Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 10000)?,
            secret_key,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            db_pool_size: parse_or(&lookup, "DB_POOL_SIZE", 5)?,
            session_ttl_secs: parse_or(&lookup, "SESSION_TTL_SECS", 86_400)?,
            session_purge_interval_secs: parse_or(&lookup, "SESSION_PURGE_INTERVAL_SECS", 600)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", 12)?,
            allow_privileged_signup: flag(&lookup, "ALLOW_PRIVILEGED_SIGNUP"),
            cookie_secure: flag(&lookup, "COOKIE_SECURE"),
            debug: lookup("DEBUG").map(|v| v == "1").unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail once the server is running
    pub fn validate(&self) -> Result<()> {
        self.account_config().validate()?;
        if self.session_purge_interval_secs == 0 {
            return Err(Error::ConfigurationError(
                "SESSION_PURGE_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings handed to the account service
    pub fn account_config(&self) -> AccountServiceConfig {
        AccountServiceConfig::new(
            self.database_url.clone(),
            self.db_pool_size,
            self.session_ttl_secs,
            self.bcrypt_cost,
        )
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::ConfigurationError(format!("Invalid value for {}: {}", key, raw))),
        None => Ok(default),
    }
}

fn flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    matches!(
        lookup(key).as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}
