//! Views
//!
//! Minimal server-rendered pages. Every page carries its view name in
//! `data-view` on `<main>`.

use axum::response::{Html, IntoResponse, Response};
use derive_more::Display;
use kernel::html::escape_html;

use crate::presentation::flash::{Notice, Notices};
use crate::presentation::middleware::CurrentUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum View {
    #[display("users/signup")]
    Signup,
    #[display("users/login")]
    Login,
}

impl View {
    fn title(&self) -> &'static str {
        match self {
            View::Signup => "Sign up",
            View::Login => "Log in",
        }
    }

    fn content(&self) -> &'static str {
        match self {
            View::Signup => SIGNUP_FORM,
            View::Login => LOGIN_FORM,
        }
    }
}

const SIGNUP_FORM: &str = r#"<form method="post" action="/signup">
<label>Email <input type="email" name="email" required></label>
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign up</button>
</form>"#;

const LOGIN_FORM: &str = r#"<form method="post" action="/login">
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>"#;

/// Render the common page shell
///
/// `content` is trusted markup; everything else is escaped.
pub fn render_page(
    view_name: &str,
    title: &str,
    notices: &[Notice],
    current_user: Option<&CurrentUser>,
    content: &str,
) -> String {
    let nav = match current_user {
        Some(user) => format!(
            r#"<span>Signed in as {}</span> <a href="/logout">Log out</a>"#,
            escape_html(&user.username)
        ),
        None => r#"<a href="/signup">Sign up</a> <a href="/login">Log in</a>"#.to_string(),
    };

    let notices: String = notices
        .iter()
        .map(|n| {
            format!(
                r#"<p class="flash flash-{}">{}</p>"#,
                n.kind,
                escape_html(&n.message)
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><nav><a href=\"/listings\">Listings</a> {nav}</nav>\
         <main data-view=\"{view}\">{notices}<h1>{title}</h1>{content}</main></body></html>",
        title = escape_html(title),
        view = escape_html(view_name),
    )
}

/// A rendered view together with the notices it consumes
pub struct Page {
    pub view: View,
    pub notices: Notices,
    pub current_user: Option<CurrentUser>,
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let body = render_page(
            &self.view.to_string(),
            self.view.title(),
            self.notices.as_slice(),
            self.current_user.as_ref(),
            self.view.content(),
        );

        (self.notices, Html(body)).into_response()
    }
}
