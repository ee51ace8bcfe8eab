//! Server-side session storage
//!
//! A session maps an opaque client-held token to the authenticated user and
//! role. Stores are looked up explicitly by the caller; nothing here is
//! ambient process state.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use common::db::{format_timestamp, DbPool, DbSession};
use common::error::Result;
use common::model::session::Session;
use dashmap::DashMap;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

/// Number of random bytes in a session token
const TOKEN_BYTES: usize = 32;

/// Generate a new opaque session token
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Session store mapping tokens to session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a session
    async fn insert(&self, session: &Session) -> Result<()>;

    /// Get a session by token, expired or not
    async fn get(&self, token: &str) -> Result<Option<Session>>;

    /// Remove a session, returning whether it existed
    async fn remove(&self, token: &str) -> Result<bool>;

    /// Remove every session expired at `now`, returning how many were removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// In-memory session store
pub struct InMemorySessionStore {
    /// Sessions by token
    pub sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    /// Create a new in-memory session store
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: &Session) -> Result<()> {
        self.sessions.insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(token).map(|s| s.clone()))
    }

    async fn remove(&self, token: &str) -> Result<bool> {
        Ok(self.sessions.remove(token).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        Ok((before - self.sessions.len()) as u64)
    }
}

/// SQLite session store
///
/// Sessions survive process restarts as long as the database file does.
pub struct SqliteSessionStore {
    pool: DbPool,
}

impl SqliteSessionStore {
    /// Create a new SQLite session store
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn insert(&self, session: &Session) -> Result<()> {
        debug!("Storing session for user {}", session.user_id);

        sqlx::query(
            "INSERT INTO sessions (token, user_id, role, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(session.user_id.to_string())
        .bind(session.role.as_str())
        .bind(format_timestamp(&session.created_at))
        .bind(format_timestamp(&session.expires_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        let row: Option<DbSession> = sqlx::query_as(
            "SELECT token, user_id, role, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Session::try_from).transpose()
    }

    async fn remove(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(format_timestamp(&now))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
