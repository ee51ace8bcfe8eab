//! Configuration for the account service

use std::env;

use common::db::DEFAULT_DATABASE_URL;
use common::error::{Error, Result};

use crate::password::{MAX_COST, MIN_COST};

/// Longest session lifetime accepted, one year
pub const MAX_SESSION_TTL_SECS: i64 = 365 * 86_400;

/// Configuration for the account service
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Database URL
    pub database_url: String,
    /// Database connection pool size
    pub db_pool_size: u32,
    /// Session lifetime in seconds
    pub session_ttl_secs: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            db_pool_size: env::var("DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(86_400),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),
        }
    }
}

impl AccountServiceConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a new configuration with custom values
    pub fn new(database_url: String, db_pool_size: u32, session_ttl_secs: i64, bcrypt_cost: u32) -> Self {
        Self {
            database_url,
            db_pool_size,
            session_ttl_secs,
            bcrypt_cost,
        }
    }

    /// Check that every value is usable before any service is built
    pub fn validate(&self) -> Result<()> {
        if self.db_pool_size == 0 {
            return Err(Error::ConfigurationError("DB_POOL_SIZE must be at least 1".to_string()));
        }
        if !(1..=MAX_SESSION_TTL_SECS).contains(&self.session_ttl_secs) {
            return Err(Error::ConfigurationError(format!(
                "SESSION_TTL_SECS must be between 1 and {}, got {}",
                MAX_SESSION_TTL_SECS, self.session_ttl_secs
            )));
        }
        if !(MIN_COST..=MAX_COST).contains(&self.bcrypt_cost) {
            return Err(Error::ConfigurationError(format!(
                "BCRYPT_COST must be between {} and {}, got {}",
                MIN_COST, MAX_COST, self.bcrypt_cost
            )));
        }
        Ok(())
    }
}
