//! In-Memory Repository Implementation
//!
//! Process-local store with the same contract as the Postgres one. Used by
//! tests and when the server runs without `DATABASE_URL`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::entity::{credential::Credential, session::Session, user::User};
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{SessionId, UserId, email::Email, user_name::UserName};
use crate::error::{UsersError, UsersResult};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    credentials: HashMap<UserId, Credential>,
    sessions: HashMap<SessionId, Session>,
}

/// Clones share the same tables
#[derive(Clone, Default)]
pub struct InMemoryUsersRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // Every write completes under one guard, so a poisoned lock is still usable
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    pub fn session_count(&self) -> usize {
        self.tables().sessions.len()
    }

    pub fn has_credential(&self, user_id: &UserId) -> bool {
        self.tables().credentials.contains_key(user_id)
    }
}

impl UserRepository for InMemoryUsersRepository {
    async fn create_with_credential(
        &self,
        user: &User,
        credential: &Credential,
    ) -> UsersResult<()> {
        let mut tables = self.tables();

        let canonical = user.user_name.canonical();
        if tables
            .users
            .values()
            .any(|u| u.user_name.canonical() == canonical)
        {
            return Err(UsersError::UserNameTaken);
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(UsersError::EmailTaken);
        }
        if credential.user_id != user.user_id || tables.credentials.contains_key(&user.user_id) {
            return Err(UsersError::Internal(
                "Credential does not belong to the new user".to_string(),
            ));
        }

        tables.users.insert(user.user_id, user.clone());
        tables
            .credentials
            .insert(credential.user_id, credential.clone());
        Ok(())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> UsersResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.user_name.canonical() == user_name.canonical())
            .cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> UsersResult<bool> {
        Ok(self
            .tables()
            .users
            .values()
            .any(|u| u.user_name.canonical() == user_name.canonical()))
    }

    async fn exists_by_email(&self, email: &Email) -> UsersResult<bool> {
        Ok(self.tables().users.values().any(|u| &u.email == email))
    }
}

impl CredentialRepository for InMemoryUsersRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> UsersResult<Option<Credential>> {
        Ok(self.tables().credentials.get(user_id).cloned())
    }
}

impl SessionRepository for InMemoryUsersRepository {
    async fn create(&self, session: &Session) -> UsersResult<()> {
        self.tables()
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: &SessionId) -> UsersResult<Option<Session>> {
        Ok(self.tables().sessions.get(session_id).cloned())
    }

    async fn delete(&self, session_id: &SessionId) -> UsersResult<()> {
        self.tables().sessions.remove(session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> UsersResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut tables = self.tables();
        let before = tables.sessions.len();
        tables.sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::{RawPassword, UserPassword};

    fn user(email: &str, name: &str) -> User {
        User::new(Email::new(email).unwrap(), UserName::new(name).unwrap())
    }

    fn credential_for(user: &User) -> Credential {
        let raw = RawPassword::new("s3cret-passphrase".to_string()).unwrap();
        Credential::new(user.user_id, UserPassword::from_raw(&raw, None).unwrap())
    }

    async fn insert(repo: &InMemoryUsersRepository, user: &User) -> UsersResult<()> {
        repo.create_with_credential(user, &credential_for(user)).await
    }

    #[tokio::test]
    async fn test_unique_keys_enforced_on_create() {
        let repo = InMemoryUsersRepository::new();
        insert(&repo, &user("a@example.com", "ana")).await.unwrap();

        let dup_name = insert(&repo, &user("b@example.com", "ANA")).await;
        assert!(matches!(dup_name, Err(UsersError::UserNameTaken)));

        let dup_email = insert(&repo, &user("a@example.com", "bea")).await;
        assert!(matches!(dup_email, Err(UsersError::EmailTaken)));

        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_rejected_credential_leaves_no_user() {
        let repo = InMemoryUsersRepository::new();
        let ana = user("a@example.com", "ana");
        let stray = credential_for(&user("b@example.com", "bea"));

        let result = repo.create_with_credential(&ana, &stray).await;
        assert!(matches!(result, Err(UsersError::Internal(_))));
        assert_eq!(repo.user_count(), 0);
        assert!(!repo.has_credential(&ana.user_id));

        insert(&repo, &ana).await.unwrap();
        assert!(repo.has_credential(&ana.user_id));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let repo = InMemoryUsersRepository::new();
        let other = repo.clone();
        insert(&other, &user("a@example.com", "ana")).await.unwrap();
        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let repo = InMemoryUsersRepository::new();
        let live = Session::new(UserId::new(), "ana", chrono::Duration::hours(1));
        let dead = Session::new(UserId::new(), "bea", chrono::Duration::hours(-1));
        SessionRepository::create(&repo, &live).await.unwrap();
        SessionRepository::create(&repo, &dead).await.unwrap();

        let removed = repo.cleanup_expired().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(repo.session_count(), 1);
    }
}
