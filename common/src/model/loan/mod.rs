//! Loan models and related types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Loan status
///
/// Loans are only ever created in `Pending`; no transition exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum LoanStatus {
    /// Submitted and awaiting a decision
    Pending,
}

impl LoanStatus {
    /// Stored and displayed form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LoanStatus::Pending),
            other => Err(Error::Internal(format!("Unknown loan status: {}", other))),
        }
    }
}

/// Loan model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    /// Unique loan ID
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Requested amount
    pub amount: i64,
    /// Current status
    pub status: LoanStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Loan {
    /// Create a new pending loan request
    pub fn new(user_id: Uuid, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            status: LoanStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
