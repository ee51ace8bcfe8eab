//! Web front end for Azar Finance
//!
//! Serves the login, signup and dashboard pages on top of the account
//! service and the loan ledger.

pub mod api;
pub mod config;
pub mod error;

use std::sync::Arc;
use std::time::{Duration, Instant};

use account_service::AccountService;
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Key;
use common::db::DbPool;
use loan_ledger::LoanLedger;
use tokio::task::JoinHandle;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{error, Level};

use crate::api::{auth, dashboard, health, session};
use crate::config::AppConfig;

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Account service
    pub account_service: Arc<AccountService>,
    /// Loan ledger
    pub loan_ledger: Arc<LoanLedger>,
    /// Database pool, absent when running on in-memory storage
    pub pool: Option<DbPool>,
    /// Cookie signing key
    pub key: Key,
    /// Accept collector and admin roles on the public signup form
    pub allow_privileged_signup: bool,
    /// Mark the session cookie Secure
    pub cookie_secure: bool,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create app state from services and configuration
    pub fn new(
        account_service: Arc<AccountService>,
        loan_ledger: Arc<LoanLedger>,
        pool: Option<DbPool>,
        config: &AppConfig,
    ) -> Self {
        Self {
            account_service,
            loan_ledger,
            pool,
            key: session::signing_key(&config.secret_key),
            allow_privileged_signup: config.allow_privileged_signup,
            cookie_secure: config.cookie_secure,
            started_at: Instant::now(),
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

/// Build the application router
pub fn app(state: AppState, log_level: Level) -> Router {
    Router::new()
        .route("/", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/apply", post(dashboard::apply))
        .route("/logout", get(auth::logout))
        .route("/health", get(health::health))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(log_level))
                .on_request(DefaultOnRequest::new().level(log_level))
                .on_response(DefaultOnResponse::new().level(log_level)),
        )
        .with_state(state)
}

/// Periodically drop expired sessions
pub fn spawn_session_purger(service: Arc<AccountService>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(e) = service.purge_expired_sessions().await {
                error!("Session purge failed: {}", e);
            }
        }
    })
}
