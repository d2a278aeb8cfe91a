//! User Entity
//!
//! Profile data only. The password hash lives in [`Credential`].
//!
//! [`Credential`]: crate::domain::entity::credential::Credential

use chrono::{DateTime, Utc};

use crate::domain::value_object::{UserId, email::Email, user_name::UserName};

/// Candidate user submitted at signup, before any validation
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub username: String,
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, stored lowercased
    pub email: Email,
    /// Unique, compared case-insensitively
    pub user_name: UserName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: Email, user_name: UserName) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            user_name,
            created_at: now,
            updated_at: now,
        }
    }
}
