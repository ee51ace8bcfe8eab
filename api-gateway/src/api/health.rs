//! Health check endpoint for deployment probes

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Health report
#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok` or `degraded`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Time of the check
    pub timestamp: DateTime<Utc>,
    /// Seconds since startup
    pub uptime_secs: u64,
    /// `up`, `down`, or `none` when running without a database
    pub database: &'static str,
}

/// Report process and database health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let database = match &state.pool {
        Some(pool) => match common::db::check_health(pool).await {
            Ok(()) => "up",
            Err(e) => {
                tracing::error!("Database health check failed: {}", e);
                "down"
            }
        },
        None => "none",
    };

    let (code, status) = if database == "down" {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    } else {
        (StatusCode::OK, "ok")
    };

    let report = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        database,
    };

    (code, Json(report))
}
