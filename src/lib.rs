// This is a metapackage for tests
// Re-export crates as modules
pub use account_service;
pub use api_gateway;
pub use common;
pub use loan_ledger;

// Test helpers and utilities
pub mod test_helpers {
    use std::sync::Arc;

    use account_service::{AccountService, RepositoryType as AccountRepositoryType};
    use api_gateway::config::AppConfig;
    use api_gateway::{app, AppState};
    use axum::Router;
    use common::db::{self, DbPool};
    use common::error::Result;
    use loan_ledger::{LoanLedger, RepositoryType as LoanRepositoryType};
    use tracing::Level;

    /// Signing secret shared by every test stack
    pub const TEST_SECRET: &str = "end-to-end-test-secret-0123456789abcdef";

    /// The full web application over one SQLite database
    pub struct TestStack {
        pub router: Router,
        pub accounts: Arc<AccountService>,
        pub ledger: Arc<LoanLedger>,
        pub pool: DbPool,
    }

    /// Build the application the way the server binary does, against
    /// `database_url` and with a cheap bcrypt cost
    pub async fn sqlite_stack(database_url: &str, allow_privileged_signup: bool) -> Result<TestStack> {
        let config = AppConfig::from_lookup(|key| match key {
            "SECRET_KEY" => Some(TEST_SECRET.to_string()),
            "DATABASE_URL" => Some(database_url.to_string()),
            "ALLOW_PRIVILEGED_SIGNUP" => Some(allow_privileged_signup.to_string()),
            "BCRYPT_COST" => Some("4".to_string()),
            _ => None,
        })?;

        let pool = db::init_db_pool(&config.database_url, config.db_pool_size).await?;
        db::run_migrations(&pool).await?;

        let accounts = Arc::new(
            AccountService::with_repository(AccountRepositoryType::Sqlite(pool.clone()))
                .with_bcrypt_cost(config.bcrypt_cost),
        );
        let ledger = Arc::new(LoanLedger::with_repository(LoanRepositoryType::Sqlite(pool.clone())));

        let state = AppState::new(accounts.clone(), ledger.clone(), Some(pool.clone()), &config);
        Ok(TestStack {
            router: app(state, Level::DEBUG),
            accounts,
            ledger,
            pool,
        })
    }
}
