//! Users Middleware
//!
//! Session lookup for every page, a guard for pages that need a login, and
//! capture of the page to return to once the login succeeds.

use std::convert::Infallible;

use axum::extract::{OptionalFromRequestParts, Request, State};
use axum::http::{Method, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use platform::cookie::extract_cookie;
use platform::crypto;

use crate::application::SessionUseCase;
use crate::application::config::UsersConfig;
use crate::domain::repository::UsersStore;
use crate::domain::value_object::UserId;
use crate::error::UsersError;
use crate::presentation::flash::{Notice, set_flash};
use crate::presentation::handlers::{LOGIN_PATH, UsersAppState};

/// Where to send the browser after a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget(pub String);

/// Logged-in user for the current request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub username: String,
}

impl<S> OptionalFromRequestParts<S> for RedirectTarget
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Option<Self>, Infallible> {
        Ok(parts.extensions.get::<RedirectTarget>().cloned())
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Option<Self>, Infallible> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}

/// Same-site absolute path, e.g. `/listings/42`
///
/// `//host` is protocol-relative and would leave the site.
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Signed `return_to` value; the path is base64url-encoded so it stays a
/// valid cookie value
pub(crate) fn encode_return_to(config: &UsersConfig, path: &str) -> String {
    crypto::sign(&config.cookie_secret, &crypto::to_base64url(path.as_bytes()))
}

pub(crate) fn decode_return_to(config: &UsersConfig, value: &str) -> Option<String> {
    let payload = crypto::verify(&config.cookie_secret, value)?;
    let bytes = crypto::from_base64url(payload).ok()?;
    let path = String::from_utf8(bytes).ok()?;
    is_local_path(&path).then_some(path)
}

async fn lookup_current_user<R>(state: &UsersAppState<R>, token: &str) -> Option<CurrentUser>
where
    R: UsersStore,
{
    let sessions = SessionUseCase::new(state.repo.clone(), state.config.clone());

    match sessions.current(token).await {
        Ok(session) => Some(CurrentUser {
            user_id: session.user_id,
            username: session.user_name,
        }),
        Err(UsersError::SessionInvalid) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Session lookup failed");
            None
        }
    }
}

/// Reuse what an outer layer found, otherwise look the session up
async fn resolve_current_user<R>(
    state: &UsersAppState<R>,
    known: Option<CurrentUser>,
    token: Option<String>,
) -> Option<CurrentUser>
where
    R: UsersStore,
{
    if known.is_some() {
        return known;
    }
    lookup_current_user(state, &token?).await
}

/// Put [`CurrentUser`] into request extensions when the session cookie is valid
pub async fn load_current_user<R>(
    State(state): State<UsersAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UsersStore,
{
    let known = req.extensions().get::<CurrentUser>().cloned();
    let token = extract_cookie(req.headers(), &state.config.session_cookie_name);

    if let Some(user) = resolve_current_user(&state, known, token).await {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

/// Redirect anonymous visitors to the login page
///
/// For GET requests the original path is remembered so that login can send
/// the visitor back.
pub async fn require_login<R>(
    State(state): State<UsersAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UsersStore,
{
    let known = req.extensions().get::<CurrentUser>().cloned();
    let token = extract_cookie(req.headers(), &state.config.session_cookie_name);

    if let Some(user) = resolve_current_user(&state, known, token).await {
        req.extensions_mut().insert(user);
        return next.run(req).await;
    }

    let mut cookies = set_flash(&state.config, Notice::error("You must be logged in first"));

    if req.method() == Method::GET {
        let path = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        if is_local_path(path) {
            cookies.push(
                state
                    .config
                    .return_to_cookie()
                    .build_set_cookie(&encode_return_to(&state.config, path)),
            );
        }
    }

    tracing::debug!(path = %req.uri().path(), "Login required");

    (cookies, Redirect::to(LOGIN_PATH)).into_response()
}

/// Expose a remembered `return_to` path as a [`RedirectTarget`] extension
pub async fn save_redirect_url<R>(
    State(state): State<UsersAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UsersStore,
{
    let target = extract_cookie(req.headers(), &state.config.return_to_cookie_name)
        .and_then(|value| decode_return_to(&state.config, &value));

    if let Some(path) = target {
        req.extensions_mut().insert(RedirectTarget(path));
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_paths() {
        assert!(is_local_path("/listings/42"));
        assert!(is_local_path("/listings?page=2"));
        assert!(!is_local_path("//evil.example/"));
        assert!(!is_local_path("https://evil.example/"));
        assert!(!is_local_path("/\\evil.example"));
        assert!(!is_local_path("listings"));
    }

    #[test]
    fn test_return_to_is_signed() {
        let config = UsersConfig::development();
        let value = encode_return_to(&config, "/listings/42?tab=photos");
        assert_eq!(
            decode_return_to(&config, &value).as_deref(),
            Some("/listings/42?tab=photos")
        );

        let other = UsersConfig::development();
        assert_eq!(decode_return_to(&other, &value), None);
    }

    #[test]
    fn test_foreign_path_is_dropped_even_when_signed() {
        let config = UsersConfig::development();
        let value = encode_return_to(&config, "//evil.example/");
        assert_eq!(decode_return_to(&config, &value), None);
    }
}
