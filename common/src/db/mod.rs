use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::error::Result;

pub mod models;

pub use models::{format_timestamp, DbLoan, DbSession, DbUser};

/// Database pool type
pub type DbPool = Pool<Sqlite>;

/// Default database location, a single file next to the process
pub const DEFAULT_DATABASE_URL: &str = "sqlite://azar.db?mode=rwc";

/// Initialize the database connection pool
///
/// Creates the database file when missing and turns on foreign key
/// enforcement so every loan references an existing user.
pub async fn init_db_pool(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    info!("Connected to SQLite database with pool size: {}", max_connections);

    Ok(pool)
}

/// Open a private in-memory database with the schema applied
///
/// Every SQLite `:memory:` connection is its own database, so the pool is
/// pinned to a single connection that is never recycled.
pub async fn init_memory_pool() -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Run migrations on the database
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("../migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Check database connectivity (for health checks)
pub async fn check_health(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
