//! User models and related types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Borrower who submits loan requests
    Client,
    /// Staff member who follows up on loans
    Collector,
    /// Administrator
    Admin,
}

impl Role {
    /// Stored and displayed form of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Collector => "collector",
            Role::Admin => "admin",
        }
    }

    /// Whether the role sees loans of every user
    pub fn can_view_all_loans(&self) -> bool {
        matches!(self, Role::Collector | Role::Admin)
    }

    /// Whether the role may submit loan requests
    pub fn can_apply_for_loan(&self) -> bool {
        matches!(self, Role::Client)
    }

    /// Whether the role needs an operator to assign it
    pub fn is_privileged(&self) -> bool {
        !matches!(self, Role::Client)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "collector" => Ok(Role::Collector),
            "admin" => Ok(Role::Admin),
            other => Err(Error::ValidationError(format!("Unknown role: {}", other))),
        }
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Phone number, unique across users and used to log in
    pub phone: String,
    /// Salted one-way hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role
    pub role: Role,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record with a fresh identifier
    pub fn new(name: String, phone: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }
}
