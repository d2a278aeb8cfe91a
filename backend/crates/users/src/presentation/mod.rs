//! Presentation Layer
//!
//! HTTP handlers, forms, views, flash notices, router, and middleware.

pub mod extract;
pub mod flash;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod view;

pub use extract::LocalAuth;
pub use flash::{FlashKind, Notice, Notices, read_notices, set_flash};
pub use handlers::{UsersAppState, page_not_found};
pub use middleware::{
    CurrentUser, RedirectTarget, load_current_user, require_login, save_redirect_url,
};
pub use router::users_router;
pub use view::{Page, View, render_page};
