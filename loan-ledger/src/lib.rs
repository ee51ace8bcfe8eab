//! Loan ledger: loan applications and role-scoped loan listings

pub mod repository;
pub mod service;

pub use repository::{InMemoryLoanRepository, LoanRepository, SqliteLoanRepository};
pub use service::{LoanLedger, RepositoryType};
