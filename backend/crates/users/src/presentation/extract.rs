//! Local (username/password) authentication extractor

use axum::Form;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use platform::cookie::extract_cookie;

use crate::application::{SessionUseCase, SignInInput, SignInUseCase};
use crate::domain::entity::user::User;
use crate::domain::repository::UsersStore;
use crate::presentation::flash::Notice;
use crate::presentation::form::LoginForm;
use crate::presentation::handlers::{LOGIN_PATH, UsersAppState, defer_to_next, flash_redirect};

/// A request whose login form checked out, with its new session token
///
/// Rejected requests never reach the handler: bad credentials go back to
/// the login page with an error notice. Any session the browser already
/// carried is ended before the new one is issued.
pub struct LocalAuth {
    pub user: User,
    pub session_token: String,
}

impl<R> FromRequest<UsersAppState<R>> for LocalAuth
where
    R: UsersStore,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &UsersAppState<R>) -> Result<Self, Self::Rejection> {
        let previous = extract_cookie(req.headers(), &state.config.session_cookie_name);

        let Form(form) = Form::<LoginForm>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let sign_in =
            SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

        let input = SignInInput {
            username: form.username,
            password: form.password,
        };

        let user = match sign_in.execute(input).await {
            Ok(user) => user,
            Err(e) => {
                e.log();
                return Err(flash_redirect(
                    &state.config,
                    Notice::error(e.user_message()),
                    LOGIN_PATH,
                ));
            }
        };

        let sessions = SessionUseCase::new(state.repo.clone(), state.config.clone());
        let session_token = sessions
            .login_replacing(previous.as_deref(), &user)
            .await
            .map_err(defer_to_next)?;

        Ok(Self {
            user,
            session_token,
        })
    }
}
