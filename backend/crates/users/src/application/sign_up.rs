//! Sign Up Use Case
//!
//! `register(candidate, password)`: validates the candidate, checks
//! uniqueness, hashes the password and persists user and credential in one
//! write.

use std::sync::Arc;

use crate::application::config::UsersConfig;
use crate::domain::entity::{credential::Credential, user::NewUser, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{UsersError, UsersResult};

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<UsersConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<UsersConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, candidate: NewUser, password: String) -> UsersResult<User> {
        // Presence first, in the order the form is usually filled wrong
        if candidate.username.trim().is_empty() {
            return Err(UsersError::MissingField("username"));
        }
        if password.is_empty() {
            return Err(UsersError::MissingField("password"));
        }
        if candidate.email.trim().is_empty() {
            return Err(UsersError::MissingField("email"));
        }

        let user_name = UserName::new(&candidate.username)?;
        let email = Email::new(candidate.email)?;
        let raw_password = RawPassword::new(password)?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(UsersError::UserNameTaken);
        }
        if self.user_repo.exists_by_email(&email).await? {
            return Err(UsersError::EmailTaken);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = User::new(email, user_name);
        let credential = Credential::new(user.user_id, password_hash);

        self.user_repo
            .create_with_credential(&user, &credential)
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed up"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUsersRepository;

    fn use_case(repo: &InMemoryUsersRepository) -> SignUpUseCase<InMemoryUsersRepository> {
        SignUpUseCase::new(Arc::new(repo.clone()), Arc::new(UsersConfig::default()))
    }

    fn candidate(email: &str, username: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn test_registers_user_and_credential() {
        let repo = InMemoryUsersRepository::new();
        let user = use_case(&repo)
            .execute(candidate("ana@example.com", "ana"), "s3cret-passphrase".into())
            .await
            .unwrap();

        assert_eq!(user.user_name.as_str(), "ana");
        assert_eq!(repo.user_count(), 1);
        assert!(repo.has_credential(&user.user_id));
    }

    #[tokio::test]
    async fn test_missing_fields_in_order() {
        let repo = InMemoryUsersRepository::new();
        let uc = use_case(&repo);

        let err = uc.execute(candidate("", ""), String::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "No username was given");

        let err = uc.execute(candidate("", "ana"), String::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "No password was given");

        let err = uc
            .execute(candidate(" ", "ana"), "s3cret-passphrase".into())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No email was given");

        assert_eq!(repo.user_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicates_are_rejected_case_insensitively() {
        let repo = InMemoryUsersRepository::new();
        let uc = use_case(&repo);
        uc.execute(candidate("ana@example.com", "ana"), "s3cret-passphrase".into())
            .await
            .unwrap();

        let err = uc
            .execute(candidate("other@example.com", "ANA"), "s3cret-passphrase".into())
            .await
            .unwrap_err();
        assert!(matches!(err, UsersError::UserNameTaken));

        let err = uc
            .execute(candidate("Ana@Example.com", "ana2"), "s3cret-passphrase".into())
            .await
            .unwrap_err();
        assert!(matches!(err, UsersError::EmailTaken));

        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_carries_message() {
        let repo = InMemoryUsersRepository::new();
        let err = use_case(&repo)
            .execute(candidate("not-an-email", "ana"), "s3cret-passphrase".into())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email format");

        let err = use_case(&repo)
            .execute(candidate("ana@example.com", "ana"), "short".into())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Password must be at least 8"));
    }
}
