//! Users Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::domain::repository::UsersStore;
use crate::presentation::handlers::{
    self, LOGIN_PATH, LOGOUT_PATH, SIGNUP_PATH, UsersAppState,
};
use crate::presentation::middleware::save_redirect_url;

/// Create the users router for any store implementation
///
/// Routes are mounted at the site root. The host adds its own pages, the
/// fallback and [`load_current_user`](crate::presentation::middleware::load_current_user).
pub fn users_router<R>(state: UsersAppState<R>) -> Router
where
    R: UsersStore,
{
    let login_submit = post(handlers::login::<R>).layer(middleware::from_fn_with_state(
        state.clone(),
        save_redirect_url::<R>,
    ));

    Router::new()
        .route(
            SIGNUP_PATH,
            get(handlers::render_signup_form).post(handlers::signup::<R>),
        )
        .route(
            LOGIN_PATH,
            get(handlers::render_login_form).merge(login_submit),
        )
        .route(
            LOGOUT_PATH,
            get(handlers::logout::<R>).post(handlers::logout::<R>),
        )
        .with_state(state)
}
