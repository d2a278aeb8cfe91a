//! Credential Entity
//!
//! Password hash for a user, kept apart from the profile so that profile
//! reads never load it.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{UserId, user_password::UserPassword};

#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: UserId,
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(user_id: UserId, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
