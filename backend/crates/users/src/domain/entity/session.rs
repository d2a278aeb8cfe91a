//! Session Entity
//!
//! Server-side login session. The cookie only carries the signed id.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{SessionId, UserId};

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    /// Display name at login time, for the nav bar
    pub user_name: String,
    /// Expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// TTL comes from config, not from here
    pub fn new(user_id: UserId, user_name: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: SessionId::new(),
            user_id,
            user_name: user_name.into(),
            expires_at_ms: (now + ttl).timestamp_millis(),
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}
