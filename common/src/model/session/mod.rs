//! Session models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::user::Role;

/// Server-side session bound to an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque token held by the client
    pub token: String,
    /// Authenticated user
    pub user_id: Uuid,
    /// Role of the user at login time
    pub role: Role,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session valid for `ttl` from now
    pub fn new(token: String, user_id: Uuid, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token,
            user_id,
            role,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the session has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_expiry() {
        let session = Session::new("tok".into(), Uuid::new_v4(), Role::Client, Duration::seconds(60));
        assert!(!session.is_expired());
        assert!(session.is_expired_at(session.expires_at));
        assert!(session.is_expired_at(Utc::now() + Duration::seconds(61)));
    }
}
