//! User Name Value Object
//!
//! The public handle used to log in and shown in the nav bar.
//!
//! Input is NFKC-normalized and trimmed, then validated. The original
//! casing is kept for display, and uniqueness uses the lowercase canonical
//! form.

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

/// Allowed special characters in user name
const ALLOWED_SPECIAL_CHARS: &[char] = &['_', '.', '-'];

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserNameError {
    #[error("Username cannot be empty")]
    Empty,

    #[error("Username must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Username may only contain letters, digits, '_', '.' and '-'")]
    InvalidCharacter(char),
}

/// Validated user name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserNameError> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(UserNameError::Empty);
        }

        let char_count = trimmed.chars().count();
        if char_count > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: USER_NAME_MAX_LENGTH,
                actual: char_count,
            });
        }

        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(c)))
        {
            return Err(UserNameError::InvalidCharacter(bad));
        }

        Ok(Self {
            original: trimmed.to_string(),
            canonical: trimmed.to_ascii_lowercase(),
        })
    }

    /// Rebuild from a stored value
    pub fn from_db(original: impl Into<String>) -> Self {
        let original = original.into();
        let canonical = original.to_ascii_lowercase();
        Self {
            original,
            canonical,
        }
    }

    /// As typed at signup
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lowercased form used for lookups and uniqueness
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_names() {
        assert!(UserName::new("wanderer").is_ok());
        assert!(UserName::new("a").is_ok());
        assert!(UserName::new("jane.doe-92_x").is_ok());
    }

    #[test]
    fn test_canonical_is_lowercase() {
        let name = UserName::new("  JaneDoe ").unwrap();
        assert_eq!(name.original(), "JaneDoe");
        assert_eq!(name.canonical(), "janedoe");
    }

    #[test]
    fn test_fullwidth_input_is_normalized() {
        // NFKC folds fullwidth Latin to ASCII
        let name = UserName::new("ｊａｎｅ").unwrap();
        assert_eq!(name.original(), "jane");
    }

    #[test]
    fn test_invalid_user_names() {
        assert_eq!(UserName::new("   ").unwrap_err(), UserNameError::Empty);
        assert_eq!(
            UserName::new("has space").unwrap_err(),
            UserNameError::InvalidCharacter(' ')
        );
        assert!(matches!(
            UserName::new("x".repeat(31)),
            Err(UserNameError::TooLong { max: 30, actual: 31 })
        ));
    }
}
