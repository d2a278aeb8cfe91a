//! Application Configuration
//!
//! Configuration for the users application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Users application configuration
#[derive(Debug, Clone)]
pub struct UsersConfig {
    /// Login session cookie name
    pub session_cookie_name: String,
    /// One-shot notice cookie name
    pub flash_cookie_name: String,
    /// Cookie holding the page to return to after login
    pub return_to_cookie_name: String,
    /// HMAC key for every signed cookie (32 bytes)
    pub cookie_secret: [u8; 32],
    /// Session lifetime (one week)
    pub session_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "session".to_string(),
            flash_cookie_name: "flash".to_string(),
            return_to_cookie_name: "return_to".to_string(),
            cookie_secret: [0u8; 32],
            session_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }
}

impl UsersConfig {
    /// Create config with a random cookie secret (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        let len = secret.len();
        secret.copy_from_slice(&platform::crypto::random_bytes(len));
        Self {
            cookie_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.session_ttl).unwrap_or(chrono::Duration::MAX)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    fn base_cookie(&self, name: &str) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }

    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            max_age_secs: Some(self.session_ttl.as_secs()),
            ..self.base_cookie(&self.session_cookie_name)
        }
    }

    /// Browser-session cookie; cleared as soon as it is read
    pub fn flash_cookie(&self) -> CookieConfig {
        self.base_cookie(&self.flash_cookie_name)
    }

    pub fn return_to_cookie(&self) -> CookieConfig {
        self.base_cookie(&self.return_to_cookie_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_is_insecure_with_secret() {
        let config = UsersConfig::development();
        assert!(!config.cookie_secure);
        assert_ne!(config.cookie_secret, [0u8; 32]);
    }

    #[test]
    fn test_session_cookie_carries_ttl() {
        let config = UsersConfig::default();
        let cookie = config.session_cookie().build_set_cookie("t");
        assert!(cookie.starts_with("session=t"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn test_flash_cookie_is_browser_session() {
        let config = UsersConfig::default();
        let cookie = config.flash_cookie().build_set_cookie("n");
        assert!(cookie.starts_with("flash=n"));
        assert!(!cookie.contains("Max-Age"));
    }
}
