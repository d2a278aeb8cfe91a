//! Router assembly
//!
//! Users pages plus the listings placeholders they redirect to.

use axum::{
    Router, middleware,
    response::{Html, IntoResponse, Redirect},
    routing::get,
};
use tower_http::trace::TraceLayer;
use users::{
    UsersAppState, UsersConfig, UsersStore,
    handlers::{LISTINGS_PATH, page_not_found},
    middleware::{CurrentUser, load_current_user, require_login},
    presentation::{Notices, render_page},
    users_router,
};

/// Build the whole site on top of `store`
pub fn build_app<R>(store: R, config: UsersConfig) -> Router
where
    R: UsersStore,
{
    let state = UsersAppState::new(store, config);

    let listings = Router::new()
        .route(LISTINGS_PATH, get(listings_index))
        .route(
            "/listings/new",
            get(new_listing).route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_login::<R>,
            )),
        )
        .with_state(state.clone());

    Router::new()
        .route("/", get(|| async { Redirect::to(LISTINGS_PATH) }))
        .merge(listings)
        .merge(users_router(state.clone()))
        .fallback(page_not_found)
        .layer(middleware::from_fn_with_state(
            state,
            load_current_user::<R>,
        ))
        .layer(TraceLayer::new_for_http())
}

/// GET /listings
async fn listings_index(notices: Notices, current_user: Option<CurrentUser>) -> impl IntoResponse {
    let body = render_page(
        "listings/index",
        "Listings",
        notices.as_slice(),
        current_user.as_ref(),
        "<p>No listings yet.</p>",
    );
    (notices, Html(body))
}

/// GET /listings/new (login required)
async fn new_listing(notices: Notices, current_user: Option<CurrentUser>) -> impl IntoResponse {
    let body = render_page(
        "listings/new",
        "New listing",
        notices.as_slice(),
        current_user.as_ref(),
        "<p>Creating listings is not available yet.</p>",
    );
    (notices, Html(body))
}
