//! Error types for the loan tracking services
//!
//! This module provides a unified error handling system shared by the account
//! service, the loan ledger and the HTTP gateway. Storage failures keep their
//! own variant so they are never confused with domain outcomes such as a
//! duplicate phone number.

use std::fmt::Display;
use thiserror::Error;

/// Service error type
#[derive(Debug, Error)]
pub enum Error {
    /// A user with the same identifying field (phone number) already exists
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// Phone number unknown or password mismatch
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session-gated action attempted without an active session
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Authenticated, but the role does not allow the action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Generic validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Storage error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the error is a storage failure rather than a domain outcome
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Migration(_))
    }
}

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::DuplicateIdentifier(msg) => Error::DuplicateIdentifier(format!("{}: {}", context, msg)),
                Error::Forbidden(msg) => Error::Forbidden(format!("{}: {}", context, msg)),
                Error::ValidationError(msg) => Error::ValidationError(format!("{}: {}", context, msg)),
                Error::ConfigurationError(msg) => Error::ConfigurationError(format!("{}: {}", context, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
                // Unit and wrapped variants carry no message to prefix
                other => other,
            }
        })
    }
}

/// Trait for converting other error types to our Error type
pub trait IntoError {
    /// Convert to Error
    fn into_error(self, message: &str) -> Error;
}

impl<E: std::error::Error> IntoError for E {
    fn into_error(self, message: &str) -> Error {
        Error::Internal(format!("{}: {}", message, self))
    }
}

/// Returns true when a sqlx error is a UNIQUE constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
