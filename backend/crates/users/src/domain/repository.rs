//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use crate::domain::entity::{credential::Credential, session::Session, user::User};
use crate::domain::value_object::{SessionId, UserId, email::Email, user_name::UserName};
use crate::error::UsersResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user together with its credential
    ///
    /// Both rows are written or neither is. Fails with
    /// `UserNameTaken`/`EmailTaken` if a unique key is already in use, even
    /// when the caller checked beforehand.
    async fn create_with_credential(
        &self,
        user: &User,
        credential: &Credential,
    ) -> UsersResult<()>;

    /// Case-insensitive lookup
    async fn find_by_user_name(&self, user_name: &UserName) -> UsersResult<Option<User>>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> UsersResult<bool>;

    async fn exists_by_email(&self, email: &Email) -> UsersResult<bool>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> UsersResult<Option<Credential>>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &Session) -> UsersResult<()>;

    /// Find a session by id, expired or not. Callers check expiry.
    async fn find_by_id(&self, session_id: &SessionId) -> UsersResult<Option<Session>>;

    /// Delete a session. Deleting an unknown id is not an error.
    async fn delete(&self, session_id: &SessionId) -> UsersResult<()>;

    /// Clean up expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> UsersResult<u64>;
}

/// Everything the HTTP layer needs from one store
pub trait UsersStore:
    UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static
{
}

impl<T> UsersStore for T where
    T: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static
{
}
