//! Users Error Types
//!
//! Users-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::user_name::UserNameError;

pub type UsersResult<T> = Result<T, UsersError>;

/// Shown instead of the real message for server-side failures
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum UsersError {
    /// A signup field was left empty
    #[error("No {0} was given")]
    MissingField(&'static str),

    /// A signup field failed validation
    #[error("{0}")]
    InvalidInput(String),

    #[error("A user with the given username is already registered")]
    UserNameTaken,

    #[error("A user with the given email is already registered")]
    EmailTaken,

    /// Login form submitted without username or password
    #[error("Missing credentials")]
    MissingCredentials,

    /// Unknown user or wrong password; the two are deliberately indistinguishable
    #[error("Password or username is incorrect")]
    InvalidCredentials,

    #[error("Session not found or expired")]
    SessionInvalid,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UsersError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UsersError::MissingField(_)
            | UsersError::InvalidInput(_)
            | UsersError::MissingCredentials => ErrorKind::BadRequest,
            UsersError::UserNameTaken | UsersError::EmailTaken => ErrorKind::Conflict,
            UsersError::InvalidCredentials | UsersError::SessionInvalid => {
                ErrorKind::Unauthorized
            }
            UsersError::Database(_) | UsersError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Text safe to put in a flash notice
    pub fn user_message(&self) -> String {
        if self.kind().is_server_error() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            UsersError::Database(e) => {
                tracing::error!(error = %e, "Users database error");
            }
            UsersError::Internal(msg) => {
                tracing::error!(message = %msg, "Users internal error");
            }
            UsersError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Users error");
            }
        }
    }
}

/// Value objects report through `AppError`; client-side kinds become
/// validation failures, everything else stays internal.
impl From<AppError> for UsersError {
    fn from(err: AppError) -> Self {
        if err.is_server_error() {
            UsersError::Internal(err.to_string())
        } else {
            UsersError::InvalidInput(err.message().to_string())
        }
    }
}

impl From<UserNameError> for UsersError {
    fn from(err: UserNameError) -> Self {
        match err {
            UserNameError::Empty => UsersError::MissingField("username"),
            other => UsersError::InvalidInput(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_messages() {
        assert_eq!(
            UsersError::MissingField("password").to_string(),
            "No password was given"
        );
        assert_eq!(
            UsersError::UserNameTaken.to_string(),
            "A user with the given username is already registered"
        );
        assert_eq!(
            UsersError::EmailTaken.to_string(),
            "A user with the given email is already registered"
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = UsersError::Internal("pool exhausted on db-3".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        assert!(err.kind().is_server_error());
    }

    #[test]
    fn test_from_app_error() {
        let err: UsersError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, UsersError::InvalidInput(ref m) if m == "Invalid email format"));

        let err: UsersError = AppError::internal("Failed to hash password").into();
        assert!(matches!(err, UsersError::Internal(_)));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(UsersError::EmailTaken.kind(), ErrorKind::Conflict);
        assert_eq!(UsersError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(UsersError::MissingCredentials.kind(), ErrorKind::BadRequest);
    }
}
