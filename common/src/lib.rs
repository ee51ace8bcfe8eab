//! Common types and utilities for the loan tracking services
//!
//! This library contains shared types used by the account service, the loan
//! ledger and the HTTP gateway: the error taxonomy, domain models, and access
//! to the shared SQLite store.

pub mod error;
pub mod model;
pub mod db;

/// Re-export important types
pub use error::{Error, Result, ErrorExt, IntoError};

// Re-export database types
pub use db::DbPool;
