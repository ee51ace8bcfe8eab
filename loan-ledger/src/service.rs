//! Loan ledger service implementation

use std::sync::Arc;

use common::db::DbPool;
use common::error::{Error, ErrorExt, Result};
use common::model::loan::Loan;
use common::model::session::Session;
use tracing::{debug, info};

use crate::repository::{InMemoryLoanRepository, LoanRepository, SqliteLoanRepository};

/// Loan ledger for recording applications and listing loans by role
pub struct LoanLedger {
    /// Repository for loan data
    repository: Arc<dyn LoanRepository>,
}

/// Repository Type
pub enum RepositoryType {
    /// In-memory repository
    InMemory,
    /// SQLite repository sharing an existing pool
    Sqlite(DbPool),
}

impl LoanLedger {
    /// Create a new loan ledger backed by an in-memory repository
    pub fn new() -> Self {
        Self::from_parts(Arc::new(InMemoryLoanRepository::new()))
    }

    /// Create a new loan ledger with a specific repository type
    pub fn with_repository(repo_type: RepositoryType) -> Self {
        match repo_type {
            RepositoryType::InMemory => Self::new(),
            RepositoryType::Sqlite(pool) => Self::from_parts(Arc::new(SqliteLoanRepository::new(pool))),
        }
    }

    /// Create a new loan ledger from an explicit repository
    pub fn from_parts(repository: Arc<dyn LoanRepository>) -> Self {
        Self { repository }
    }

    /// Record a loan application for the session's user
    ///
    /// Only clients may apply. The loan starts out pending.
    pub async fn apply_loan(&self, session: Option<&Session>, amount: i64) -> Result<Loan> {
        let session = session.ok_or(Error::Unauthenticated)?;

        if !session.role.can_apply_for_loan() {
            return Err(Error::Forbidden(format!(
                "Role {} cannot apply for loans",
                session.role
            )));
        }

        let loan = Loan::new(session.user_id, amount);
        self.repository
            .insert_loan(&loan)
            .await
            .with_context(|| format!("Failed to record loan for user {}", session.user_id))?;

        info!("User {} applied for loan {} of {}", session.user_id, loan.id, amount);
        Ok(loan)
    }

    /// Loans visible to the session's role
    ///
    /// Clients see their own loans; collectors and admins see every loan.
    pub async fn list_loans(&self, session: Option<&Session>) -> Result<Vec<Loan>> {
        let session = session.ok_or(Error::Unauthenticated)?;

        let loans = if session.role.can_view_all_loans() {
            self.repository.list_all_loans().await?
        } else {
            self.repository.list_loans_for_user(session.user_id).await?
        };

        debug!("Listed {} loans for user {}", loans.len(), session.user_id);
        Ok(loans)
    }

    /// Number of recorded loans
    pub async fn count_loans(&self) -> Result<u64> {
        self.repository.count_loans().await
    }
}

impl Default for LoanLedger {
    fn default() -> Self {
        Self::new()
    }
}
