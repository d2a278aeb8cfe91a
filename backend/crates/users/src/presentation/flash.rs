//! Flash Notices
//!
//! One-shot messages that survive a redirect. The queue lives in a signed
//! cookie whose value is `base64url(json).signature`.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use axum::response::{IntoResponseParts, ResponseParts};
use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use platform::cookie::{SetCookies, extract_cookie};
use platform::crypto;
use serde::{Deserialize, Serialize};

use crate::application::config::UsersConfig;
use crate::domain::repository::UsersStore;
use crate::presentation::handlers::UsersAppState;

/// Notice category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    #[display("success")]
    Success,
    #[display("error")]
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: FlashKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

fn encode(config: &UsersConfig, notices: &[Notice]) -> AppResult<String> {
    let json = serde_json::to_vec(notices)?;
    Ok(crypto::sign(
        &config.cookie_secret,
        &crypto::to_base64url(&json),
    ))
}

fn decode(config: &UsersConfig, value: &str) -> AppResult<Vec<Notice>> {
    let payload = crypto::verify(&config.cookie_secret, value)
        .ok_or_else(|| AppError::bad_request("Flash cookie signature mismatch"))?;
    let json = crypto::from_base64url(payload)
        .map_err(|e| AppError::bad_request("Flash cookie is not base64url").with_source(e))?;
    Ok(serde_json::from_slice(&json)?)
}

/// Queue `notice` for the next page the browser renders
///
/// Replaces any notice that has not been shown yet.
pub fn set_flash(config: &UsersConfig, notice: Notice) -> SetCookies {
    match encode(config, std::slice::from_ref(&notice)) {
        Ok(value) => SetCookies::new().with(config.flash_cookie().build_set_cookie(&value)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode flash notice");
            SetCookies::new()
        }
    }
}

/// Pending notices carried by the request, without consuming them
pub fn read_notices(headers: &HeaderMap, config: &UsersConfig) -> Vec<Notice> {
    let Some(value) = extract_cookie(headers, &config.flash_cookie_name) else {
        return Vec::new();
    };

    decode(config, &value).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Discarding unreadable flash cookie");
        Vec::new()
    })
}

/// Notices pending for this request
///
/// As a response part it clears the flash cookie, so whatever page renders
/// them shows them exactly once.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    items: Vec<Notice>,
    clear: Option<String>,
}

impl Notices {
    pub fn from_headers(headers: &HeaderMap, config: &UsersConfig) -> Self {
        let present = extract_cookie(headers, &config.flash_cookie_name).is_some();

        Self {
            items: read_notices(headers, config),
            clear: present.then(|| config.flash_cookie().build_delete_cookie()),
        }
    }

    pub fn as_slice(&self) -> &[Notice] {
        &self.items
    }
}

impl IntoResponseParts for Notices {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let mut cookies = SetCookies::new();
        if let Some(clear) = self.clear {
            cookies.push(clear);
        }
        cookies.into_response_parts(res)
    }
}

impl<R> FromRequestParts<UsersAppState<R>> for Notices
where
    R: UsersStore,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &UsersAppState<R>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, &state.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};
    use axum::response::IntoResponse;

    fn request_headers(set_cookie: &str) -> HeaderMap {
        // "flash=<value>; HttpOnly; ..." -> "flash=<value>"
        let pair = set_cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        headers
    }

    fn set_cookie_values(cookies: SetCookies) -> Vec<String> {
        let res = (cookies, "").into_response();
        res.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_queued_notice_is_read_back() {
        let config = UsersConfig::development();
        let values = set_cookie_values(set_flash(&config, Notice::error("No email was given")));
        assert_eq!(values.len(), 1);

        let notices = read_notices(&request_headers(&values[0]), &config);
        assert_eq!(notices, vec![Notice::error("No email was given")]);
    }

    #[test]
    fn test_foreign_or_tampered_cookie_is_ignored() {
        let config = UsersConfig::development();
        let values = set_cookie_values(set_flash(&config, Notice::success("hi")));

        let other = UsersConfig::development();
        assert!(read_notices(&request_headers(&values[0]), &other).is_empty());

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=garbage"));
        assert!(read_notices(&headers, &config).is_empty());
    }

    #[test]
    fn test_notices_clear_the_cookie_when_present() {
        let config = UsersConfig::development();

        let none = Notices::from_headers(&HeaderMap::new(), &config);
        let res = (none, "").into_response();
        assert!(res.headers().get(header::SET_COOKIE).is_none());

        let values = set_cookie_values(set_flash(&config, Notice::success("hi")));
        let some = Notices::from_headers(&request_headers(&values[0]), &config);
        assert_eq!(some.as_slice().len(), 1);
        let res = (some, "").into_response();
        let cleared = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cleared.starts_with("flash=;"));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FlashKind::Success.to_string(), "success");
        assert_eq!(FlashKind::Error.to_string(), "error");
    }
}
