//! Session Use Case
//!
//! `login(user)` / `logout()` plus lookup of the current session. The
//! cookie token is `session_id.signature` (HMAC-SHA256 over the id).

use std::sync::Arc;

use uuid::Uuid;

use crate::application::config::UsersConfig;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::SessionId;
use crate::error::{UsersError, UsersResult};

/// Session use case
pub struct SessionUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<UsersConfig>,
}

impl<S> SessionUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<UsersConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Establish a session for `user` and return the cookie token
    pub async fn login(&self, user: &User) -> UsersResult<String> {
        let session = Session::new(
            user.user_id,
            user.user_name.as_str(),
            self.config.session_ttl_chrono(),
        );

        self.session_repo.create(&session).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User logged in"
        );

        Ok(self.generate_session_token(&session.session_id))
    }

    /// Establish a session for `user`, first ending the one behind
    /// `previous` so a pre-login session id never survives authentication
    pub async fn login_replacing(
        &self,
        previous: Option<&str>,
        user: &User,
    ) -> UsersResult<String> {
        if let Some(previous) = previous {
            self.logout(previous).await?;
        }
        self.login(user).await
    }

    /// Resolve a token to its live session
    pub async fn current(&self, session_token: &str) -> UsersResult<Session> {
        let session_id = self.parse_session_token(session_token)?;

        let session = self
            .session_repo
            .find_by_id(&session_id)
            .await?
            .ok_or(UsersError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete(&session_id).await?;
            return Err(UsersError::SessionInvalid);
        }

        Ok(session)
    }

    /// End the session behind `session_token`
    ///
    /// A forged or stale token has nothing to end and counts as success;
    /// only store failures are reported.
    pub async fn logout(&self, session_token: &str) -> UsersResult<()> {
        let Ok(session_id) = self.parse_session_token(session_token) else {
            tracing::debug!("Logout with unverifiable session token");
            return Ok(());
        };

        self.session_repo.delete(&session_id).await?;

        tracing::info!(session_id = %session_id, "User logged out");
        Ok(())
    }

    fn generate_session_token(&self, session_id: &SessionId) -> String {
        platform::crypto::sign(&self.config.cookie_secret, &session_id.to_string())
    }

    fn parse_session_token(&self, token: &str) -> UsersResult<SessionId> {
        let payload = platform::crypto::verify(&self.config.cookie_secret, token)
            .ok_or(UsersError::SessionInvalid)?;

        payload
            .parse::<Uuid>()
            .map(SessionId::from_uuid)
            .map_err(|_| UsersError::SessionInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{email::Email, user_name::UserName};
    use crate::infra::memory::InMemoryUsersRepository;

    fn user() -> User {
        User::new(
            Email::new("ana@example.com").unwrap(),
            UserName::new("ana").unwrap(),
        )
    }

    fn sessions(repo: &InMemoryUsersRepository) -> SessionUseCase<InMemoryUsersRepository> {
        SessionUseCase::new(Arc::new(repo.clone()), Arc::new(UsersConfig::development()))
    }

    #[tokio::test]
    async fn test_login_then_current() {
        let repo = InMemoryUsersRepository::new();
        let uc = sessions(&repo);
        let user = user();

        let token = uc.login(&user).await.unwrap();
        let session = uc.current(&token).await.unwrap();

        assert_eq!(session.user_id, user.user_id);
        assert_eq!(session.user_name, "ana");
        assert_eq!(repo.session_count(), 1);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let repo = InMemoryUsersRepository::new();
        let uc = sessions(&repo);

        let token = uc.login(&user()).await.unwrap();
        uc.logout(&token).await.unwrap();

        assert_eq!(repo.session_count(), 0);
        assert!(matches!(
            uc.current(&token).await,
            Err(UsersError::SessionInvalid)
        ));
    }

    #[tokio::test]
    async fn test_login_replacing_ends_previous_session() {
        let repo = InMemoryUsersRepository::new();
        let uc = sessions(&repo);
        let user = user();

        let first = uc.login_replacing(None, &user).await.unwrap();
        let second = uc.login_replacing(Some(&first), &user).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(repo.session_count(), 1);
        assert!(uc.current(&first).await.is_err());
        assert!(uc.current(&second).await.is_ok());

        // an unverifiable previous token does not block the new login
        assert!(uc.login_replacing(Some("junk"), &user).await.is_ok());
    }

    #[tokio::test]
    async fn test_forged_token_is_rejected_but_logout_succeeds() {
        let repo = InMemoryUsersRepository::new();
        let uc = sessions(&repo);
        let token = uc.login(&user()).await.unwrap();

        let forged = format!("{}.AAAA", Uuid::new_v4());
        assert!(uc.current(&forged).await.is_err());
        assert!(uc.logout(&forged).await.is_ok());

        // the real session is untouched
        assert!(uc.current(&token).await.is_ok());
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let repo = InMemoryUsersRepository::new();
        let token = sessions(&repo).login(&user()).await.unwrap();

        // development() draws a fresh random secret each time
        assert!(sessions(&repo).current(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let repo = InMemoryUsersRepository::new();
        let config = Arc::new(UsersConfig {
            session_ttl: std::time::Duration::ZERO,
            ..UsersConfig::development()
        });
        let uc = SessionUseCase::new(Arc::new(repo.clone()), config);

        let token = uc.login(&user()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        assert!(matches!(
            uc.current(&token).await,
            Err(UsersError::SessionInvalid)
        ));
        assert_eq!(repo.session_count(), 0);
    }
}
