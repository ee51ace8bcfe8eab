//! Repository for loan data

use async_trait::async_trait;
use common::db::{format_timestamp, DbLoan, DbPool};
use common::error::Result;
use common::model::loan::Loan;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Loan repository trait defining the interface for loan storage
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Insert a new loan
    async fn insert_loan(&self, loan: &Loan) -> Result<()>;

    /// Loans owned by one user, oldest first
    async fn list_loans_for_user(&self, user_id: Uuid) -> Result<Vec<Loan>>;

    /// Every loan, oldest first
    async fn list_all_loans(&self) -> Result<Vec<Loan>>;

    /// Number of stored loans
    async fn count_loans(&self) -> Result<u64>;
}

/// In-memory repository for loan data
pub struct InMemoryLoanRepository {
    /// Loans by ID
    pub loans: DashMap<Uuid, Loan>,
}

impl InMemoryLoanRepository {
    /// Create a new in-memory loan repository
    pub fn new() -> Self {
        Self {
            loans: DashMap::new(),
        }
    }

    fn collect<F>(&self, keep: F) -> Vec<Loan>
    where
        F: Fn(&Loan) -> bool,
    {
        let mut loans: Vec<Loan> = self
            .loans
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        loans.sort_by_key(|loan| loan.created_at);
        loans
    }
}

impl Default for InMemoryLoanRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanRepository for InMemoryLoanRepository {
    async fn insert_loan(&self, loan: &Loan) -> Result<()> {
        self.loans.insert(loan.id, loan.clone());
        Ok(())
    }

    async fn list_loans_for_user(&self, user_id: Uuid) -> Result<Vec<Loan>> {
        Ok(self.collect(|loan| loan.user_id == user_id))
    }

    async fn list_all_loans(&self) -> Result<Vec<Loan>> {
        Ok(self.collect(|_| true))
    }

    async fn count_loans(&self) -> Result<u64> {
        Ok(self.loans.len() as u64)
    }
}

/// SQLite repository for loan data
pub struct SqliteLoanRepository {
    /// Database connection pool
    pool: DbPool,
}

impl SqliteLoanRepository {
    /// Create a new SQLite loan repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepository for SqliteLoanRepository {
    async fn insert_loan(&self, loan: &Loan) -> Result<()> {
        debug!("Inserting loan {} into database", loan.id);

        sqlx::query(
            "INSERT INTO loans (id, user_id, amount, status, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(loan.id.to_string())
        .bind(loan.user_id.to_string())
        .bind(loan.amount)
        .bind(loan.status.as_str())
        .bind(format_timestamp(&loan.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_loans_for_user(&self, user_id: Uuid) -> Result<Vec<Loan>> {
        debug!("Getting loans for user from database: {}", user_id);

        let rows: Vec<DbLoan> = sqlx::query_as(
            "SELECT id, user_id, amount, status, created_at FROM loans
             WHERE user_id = ? ORDER BY created_at, rowid",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Loan::try_from).collect()
    }

    async fn list_all_loans(&self) -> Result<Vec<Loan>> {
        debug!("Getting all loans from database");

        let rows: Vec<DbLoan> = sqlx::query_as(
            "SELECT id, user_id, amount, status, created_at FROM loans ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Loan::try_from).collect()
    }

    async fn count_loans(&self) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM loans")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
