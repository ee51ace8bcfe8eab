//! Row types for the SQLite tables
//!
//! Identifiers and timestamps are stored as TEXT (hyphenated UUIDs and
//! RFC 3339 strings) and converted into domain models here.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{Loan, Role, Session, User};

/// Database model for the users table
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
}

/// Database model for the loans table
#[derive(Debug, Clone, FromRow)]
pub struct DbLoan {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub status: String,
    pub created_at: String,
}

/// Database model for the sessions table
#[derive(Debug, Clone, FromRow)]
pub struct DbSession {
    pub token: String,
    pub user_id: String,
    pub role: String,
    pub created_at: String,
    pub expires_at: String,
}

/// Format a timestamp for storage
///
/// Fixed-width UTC strings so that TEXT comparison in SQL follows time order.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Internal(format!("Invalid id {}: {}", value, e)))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid timestamp {}: {}", value, e)))
}

impl TryFrom<DbUser> for User {
    type Error = Error;

    fn try_from(row: DbUser) -> Result<Self> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            name: row.name,
            phone: row.phone,
            password_hash: row.password_hash,
            // A stored role outside the enum is corrupt data, not bad input
            role: row
                .role
                .parse::<Role>()
                .map_err(|_| Error::Internal(format!("Unknown stored role: {}", row.role)))?,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

impl TryFrom<DbLoan> for Loan {
    type Error = Error;

    fn try_from(row: DbLoan) -> Result<Self> {
        Ok(Loan {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            amount: row.amount,
            status: row.status.parse()?,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

impl TryFrom<DbSession> for Session {
    type Error = Error;

    fn try_from(row: DbSession) -> Result<Self> {
        Ok(Session {
            token: row.token,
            user_id: parse_uuid(&row.user_id)?,
            role: row
                .role
                .parse::<Role>()
                .map_err(|_| Error::Internal(format!("Unknown stored role: {}", row.role)))?,
            created_at: parse_timestamp(&row.created_at)?,
            expires_at: parse_timestamp(&row.expires_at)?,
        })
    }
}
