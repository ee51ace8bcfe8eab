//! Repository for user data

use async_trait::async_trait;
use common::db::{format_timestamp, DbPool, DbUser};
use common::error::{is_unique_violation, Error, Result};
use common::model::user::User;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// User repository trait defining the interface for user data storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    ///
    /// Fails with `DuplicateIdentifier` when the phone number is taken and
    /// leaves no partial record behind.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Get a user by phone number
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>>;

    /// Number of stored users
    async fn count_users(&self) -> Result<u64>;
}

/// In-memory repository for user data
pub struct InMemoryUserRepository {
    /// Users by ID
    pub users: DashMap<Uuid, User>,
    /// Phone number index
    pub phones: DashMap<String, Uuid>,
}

impl InMemoryUserRepository {
    /// Create a new in-memory user repository
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            phones: DashMap::new(),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> Result<()> {
        // The entry lock on the phone index serializes concurrent signups
        match self.phones.entry(user.phone.clone()) {
            Entry::Occupied(_) => Err(Error::DuplicateIdentifier(format!(
                "Phone number already registered: {}",
                user.phone
            ))),
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(())
            }
        }
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        let id = match self.phones.get(phone) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.users.len() as u64)
    }
}

/// SQLite repository for user data
pub struct SqliteUserRepository {
    /// Database connection pool
    pool: DbPool,
}

impl SqliteUserRepository {
    /// Create a new SQLite user repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &User) -> Result<()> {
        debug!("Inserting user {} into database", user.id);

        sqlx::query(
            "INSERT INTO users (id, name, phone, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(format_timestamp(&user.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateIdentifier(format!("Phone number already registered: {}", user.phone))
            } else {
                Error::Database(e)
            }
        })?;

        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        debug!("Getting user from database: {}", id);

        let row: Option<DbUser> = sqlx::query_as(
            "SELECT id, name, phone, password_hash, role, created_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>> {
        debug!("Looking up user by phone");

        let row: Option<DbUser> = sqlx::query_as(
            "SELECT id, name, phone, password_hash, role, created_at FROM users WHERE phone = ?",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn count_users(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
