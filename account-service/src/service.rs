//! Account service implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::db::{self, DbPool};
use common::error::{Error, ErrorExt, Result};
use common::model::session::Session;
use common::model::user::{Role, User};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::password::{hash_password, verify_password};
use crate::repository::{InMemoryUserRepository, SqliteUserRepository, UserRepository};
use crate::session::{generate_token, InMemorySessionStore, SessionStore, SqliteSessionStore};

/// Default session lifetime
const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;

/// Account service for registering users and managing their sessions
pub struct AccountService {
    /// Repository for user data
    users: Arc<dyn UserRepository>,
    /// Token to session mapping
    sessions: Arc<dyn SessionStore>,
    /// Session lifetime
    session_ttl: Duration,
    /// bcrypt work factor for new hashes
    bcrypt_cost: u32,
    /// Hash checked when the phone is unknown, so both failure paths cost the same
    dummy_hash: OnceCell<String>,
}

/// Repository Type
pub enum RepositoryType {
    /// In-memory repositories
    InMemory,
    /// SQLite repositories sharing an existing pool
    Sqlite(DbPool),
}

impl AccountService {
    /// Create a new account service backed by in-memory repositories
    pub fn new() -> Self {
        Self::from_parts(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySessionStore::new()),
        )
    }

    /// Create a new account service with a specific repository type
    pub fn with_repository(repo_type: RepositoryType) -> Self {
        match repo_type {
            RepositoryType::InMemory => Self::new(),
            RepositoryType::Sqlite(pool) => Self::from_parts(
                Arc::new(SqliteUserRepository::new(pool.clone())),
                Arc::new(SqliteSessionStore::new(pool)),
            ),
        }
    }

    /// Create a new account service with a configuration
    ///
    /// Validates the settings, opens the database, applies migrations and
    /// uses SQLite storage for both users and sessions.
    pub async fn with_config(config: &crate::config::AccountServiceConfig) -> Result<Self> {
        config.validate()?;
        let pool = db::init_db_pool(&config.database_url, config.db_pool_size).await?;
        db::run_migrations(&pool).await?;

        Ok(Self::with_repository(RepositoryType::Sqlite(pool))
            .with_session_ttl(Duration::seconds(config.session_ttl_secs))
            .with_bcrypt_cost(config.bcrypt_cost))
    }

    /// Create a new account service from explicit storage components
    pub fn from_parts(users: Arc<dyn UserRepository>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            users,
            sessions,
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            dummy_hash: OnceCell::new(),
        }
    }

    /// Set the session lifetime
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Set the bcrypt work factor
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Register a new user from untrusted input
    ///
    /// The role string must name one of the known roles.
    pub async fn register(&self, name: &str, phone: &str, password: &str, role: &str) -> Result<Uuid> {
        let role = role.parse::<Role>()?;
        self.register_with_role(name, phone, password, role).await
    }

    /// Register a new user with an already validated role
    pub async fn register_with_role(&self, name: &str, phone: &str, password: &str, role: Role) -> Result<Uuid> {
        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let user = User::new(name.to_string(), phone.to_string(), password_hash, role);

        self.users
            .create_user(&user)
            .await
            .with_context(|| "Failed to register user")?;

        info!("Registered user {} with role {}", user.id, role);
        Ok(user.id)
    }

    /// Authenticate by phone and password and open a session
    ///
    /// Unknown phone and wrong password fail with the same error.
    pub async fn authenticate(&self, phone: &str, password: &str) -> Result<(User, Session)> {
        let user = match self.users.find_by_phone(phone).await? {
            Some(user) => user,
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| hash_password("placeholder-password", self.bcrypt_cost))
                    .await?;
                let _ = verify_password(password, dummy).await?;
                warn!("Login attempt for unknown phone number");
                return Err(Error::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash).await? {
            warn!("Failed login for user {}", user.id);
            return Err(Error::InvalidCredentials);
        }

        let session = Session::new(generate_token(), user.id, user.role, self.session_ttl);
        self.sessions
            .insert(&session)
            .await
            .with_context(|| format!("Failed to store session for user {}", user.id))?;

        info!("User {} logged in", user.id);
        Ok((user, session))
    }

    /// Resolve a token to its live session
    ///
    /// Expired sessions are dropped from the store and reported as absent.
    pub async fn resolve_session(&self, token: &str) -> Result<Option<Session>> {
        let session = match self.sessions.get(token).await? {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired() {
            debug!("Session for user {} expired", session.user_id);
            self.sessions.remove(token).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// End a session; unknown tokens are ignored
    pub async fn logout(&self, token: &str) -> Result<()> {
        if self.sessions.remove(token).await? {
            info!("Session closed");
        }
        Ok(())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.users.get_user(id).await
    }

    /// Number of registered users
    pub async fn count_users(&self) -> Result<u64> {
        self.users.count_users().await
    }

    /// Remove expired sessions from the store
    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        let removed = self.sessions.purge_expired(Utc::now()).await?;
        if removed > 0 {
            debug!("Purged {} expired sessions", removed);
        }
        Ok(removed)
    }
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new()
    }
}
