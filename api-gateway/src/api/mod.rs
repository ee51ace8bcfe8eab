//! HTTP handlers
//!
//! Page handlers return HTML or a 303 redirect; failures go through
//! [`crate::error::ApiError`] as plain-text responses.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod session;
pub mod views;
