//! Domain models for the loan tracking services

pub mod user;
pub mod loan;
pub mod session;

pub use loan::{Loan, LoanStatus};
pub use session::Session;
pub use user::{Role, User};
