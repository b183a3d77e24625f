//! Staff accounts and sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated staff member.
///
/// Only obtainable through [`Database::authenticate`](crate::db::Database::authenticate)
/// or [`Database::login`](crate::db::Database::login), so holding one proves
/// the caller passed the session gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    username: String,
}

impl Actor {
    pub(crate) fn new(username: String) -> Self {
        Self { username }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// A login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            token: "t".into(),
            username: "admin".into(),
            expires_at: now + Duration::hours(1),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(1)));
    }
}
