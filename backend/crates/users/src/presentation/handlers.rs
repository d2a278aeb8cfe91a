//! HTTP Handlers
//!
//! Signup, login and logout for the server-rendered site. Handlers only
//! sequence use case calls and translate the outcome into a redirect plus a
//! flash notice; they never check credentials themselves.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use kernel::error::app_error::AppError;
use platform::cookie::extract_cookie;

use crate::application::config::UsersConfig;
use crate::application::{SessionUseCase, SignUpUseCase};
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UsersStore;
use crate::error::UsersError;
use crate::presentation::extract::LocalAuth;
use crate::presentation::flash::{Notice, Notices, set_flash};
use crate::presentation::form::SignupForm;
use crate::presentation::middleware::{CurrentUser, RedirectTarget};
use crate::presentation::view::{Page, View};

pub const LISTINGS_PATH: &str = "/listings";
pub const SIGNUP_PATH: &str = "/signup";
pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";

/// Shared state for users handlers
#[derive(Clone)]
pub struct UsersAppState<R>
where
    R: UsersStore,
{
    pub repo: Arc<R>,
    pub config: Arc<UsersConfig>,
}

impl<R> UsersAppState<R>
where
    R: UsersStore,
{
    pub fn new(repo: R, config: UsersConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }
}

/// Queue `notice` and redirect to `to`
pub(crate) fn flash_redirect(config: &UsersConfig, notice: Notice, to: &str) -> Response {
    (set_flash(config, notice), Redirect::to(to)).into_response()
}

/// Session failures are not shown to the user; the request falls through
/// to the not-found page as if no route had matched.
pub(crate) fn defer_to_next(err: UsersError) -> Response {
    tracing::warn!(error = %err, "Session failure, deferring to the next handler");
    not_found_response()
}

fn not_found_response() -> Response {
    AppError::not_found("Page Not Found").into_response()
}

/// Router fallback
pub async fn page_not_found() -> Response {
    not_found_response()
}

// ============================================================================
// Sign Up
// ============================================================================

/// GET /signup
pub async fn render_signup_form(notices: Notices, current_user: Option<CurrentUser>) -> Page {
    Page {
        view: View::Signup,
        notices,
        current_user,
    }
}

/// POST /signup
pub async fn signup<R>(
    State(state): State<UsersAppState<R>>,
    headers: HeaderMap,
    Form(form): Form<SignupForm>,
) -> Response
where
    R: UsersStore,
{
    let register = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let candidate = NewUser {
        email: form.email,
        username: form.username,
    };

    let user = match register.execute(candidate, form.password).await {
        Ok(user) => user,
        Err(e) => {
            e.log();
            return flash_redirect(&state.config, Notice::error(e.user_message()), SIGNUP_PATH);
        }
    };

    let previous = extract_cookie(&headers, &state.config.session_cookie_name);
    let sessions = SessionUseCase::new(state.repo.clone(), state.config.clone());
    let session_token = match sessions.login_replacing(previous.as_deref(), &user).await {
        Ok(token) => token,
        Err(e) => return defer_to_next(e),
    };

    let cookies = set_flash(&state.config, Notice::success("Welcome to Destination Place"))
        .with(state.config.session_cookie().build_set_cookie(&session_token));

    (cookies, Redirect::to(LISTINGS_PATH)).into_response()
}

// ============================================================================
// Log In
// ============================================================================

/// GET /login
pub async fn render_login_form(notices: Notices, current_user: Option<CurrentUser>) -> Page {
    Page {
        view: View::Login,
        notices,
        current_user,
    }
}

/// POST /login
///
/// [`LocalAuth`] has already checked the credentials and opened the session
/// by the time this runs.
pub async fn login<R>(
    State(state): State<UsersAppState<R>>,
    target: Option<RedirectTarget>,
    auth: LocalAuth,
) -> Response
where
    R: UsersStore,
{
    let destination = target
        .map(|RedirectTarget(path)| path)
        .unwrap_or_else(|| LISTINGS_PATH.to_string());

    tracing::debug!(
        user_id = %auth.user.user_id,
        destination = %destination,
        "Redirecting after login"
    );

    let cookies = set_flash(&state.config, Notice::success("You're logged in"))
        .with(state.config.session_cookie().build_set_cookie(&auth.session_token))
        .with(state.config.return_to_cookie().build_delete_cookie());

    (cookies, Redirect::to(&destination)).into_response()
}

// ============================================================================
// Log Out
// ============================================================================

/// GET|POST /logout
pub async fn logout<R>(State(state): State<UsersAppState<R>>, headers: HeaderMap) -> Response
where
    R: UsersStore,
{
    if let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) {
        let sessions = SessionUseCase::new(state.repo.clone(), state.config.clone());
        if let Err(e) = sessions.logout(&token).await {
            return defer_to_next(e);
        }
    }

    let cookies = set_flash(&state.config, Notice::success("You're logged out!"))
        .with(state.config.session_cookie().build_delete_cookie());

    (cookies, Redirect::to(LISTINGS_PATH)).into_response()
}
