//! Sign In Use Case
//!
//! Checks a username/password pair. Session creation is separate, see
//! [`SessionUseCase::login`](crate::application::session::SessionUseCase::login).

use std::sync::Arc;

use crate::application::config::UsersConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{UsersError, UsersResult};

/// Sign in input
pub struct SignInInput {
    pub username: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    user_repo: Arc<U>,
    credential_repo: Arc<C>,
    config: Arc<UsersConfig>,
}

impl<U, C> SignInUseCase<U, C>
where
    U: UserRepository,
    C: CredentialRepository,
{
    pub fn new(user_repo: Arc<U>, credential_repo: Arc<C>, config: Arc<UsersConfig>) -> Self {
        Self {
            user_repo,
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> UsersResult<User> {
        if input.username.trim().is_empty() || input.password.is_empty() {
            return Err(UsersError::MissingCredentials);
        }

        // A name that could never be registered cannot match anyone
        let user_name =
            UserName::new(&input.username).map_err(|_| UsersError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(UsersError::InvalidCredentials)?;

        let credential = self
            .credential_repo
            .find_by_user_id(&user.user_id)
            .await?
            .ok_or_else(|| UsersError::Internal("Credential not found".to_string()))?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| UsersError::InvalidCredentials)?;

        if !credential
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            return Err(UsersError::InvalidCredentials);
        }

        tracing::debug!(user_id = %user.user_id, "Credentials verified");

        Ok(user)
    }
}
