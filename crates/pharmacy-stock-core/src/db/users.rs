//! Staff account and session operations.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};

use super::{Database, DbError, DbResult};
use crate::models::{Actor, Session};

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

impl Database {
    /// Create a staff account.
    pub fn create_user(&self, username: &str, password: &str) -> DbResult<()> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DbError::Constraint(
                "username and password are required".into(),
            ));
        }
        if self.user_exists(username)? {
            return Err(DbError::Constraint(format!(
                "user {} already exists",
                username
            )));
        }

        let salt = uuid::Uuid::new_v4().simple().to_string();
        let password_hash = hash_password(&salt, password);
        self.conn.execute(
            "INSERT INTO users (username, password_hash, salt) VALUES (?1, ?2, ?3)",
            params![username, password_hash, salt],
        )?;
        Ok(())
    }

    pub fn user_exists(&self, username: &str) -> DbResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE username = ?",
                [username],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Check a username/password pair.
    pub fn verify_password(&self, username: &str, password: &str) -> DbResult<bool> {
        let stored: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT password_hash, salt FROM users WHERE username = ?",
                [username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(match stored {
            Some((hash, salt)) => hash_password(&salt, password) == hash,
            None => false,
        })
    }

    /// Open a session for valid credentials. Returns `None` on bad credentials.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        ttl: Duration,
    ) -> DbResult<Option<(Session, Actor)>> {
        if !self.verify_password(username, password)? {
            return Ok(None);
        }
        self.purge_expired_sessions()?;

        let session = Session {
            token: uuid::Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            expires_at: Utc::now() + ttl,
        };
        self.conn.execute(
            "INSERT INTO sessions (token, username, expires_at) VALUES (?1, ?2, ?3)",
            params![session.token, session.username, session.expires_at],
        )?;

        let actor = Actor::new(session.username.clone());
        Ok(Some((session, actor)))
    }

    /// Resolve a session token into the acting user.
    ///
    /// Expired sessions are removed and treated as absent.
    pub fn authenticate(&self, token: &str) -> DbResult<Option<Actor>> {
        let found: Option<(String, DateTime<Utc>)> = self
            .conn
            .query_row(
                "SELECT username, expires_at FROM sessions WHERE token = ?",
                [token],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match found {
            Some((username, expires_at)) if Utc::now() < expires_at => {
                Ok(Some(Actor::new(username)))
            }
            Some(_) => {
                self.logout(token)?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Drop every session past its expiry. Returns how many were removed.
    pub fn purge_expired_sessions(&self) -> DbResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM sessions WHERE expires_at < ?", [Utc::now()])?;
        if removed > 0 {
            tracing::debug!(removed, "Purged expired sessions");
        }
        Ok(removed)
    }

    /// End a session. Returns false when the token was unknown.
    pub fn logout(&self, token: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?", [token])?;
        Ok(rows_affected > 0)
    }
}
