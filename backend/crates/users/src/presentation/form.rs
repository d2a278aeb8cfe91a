//! Form bodies
//!
//! Missing fields deserialize as empty strings so that the use cases, not
//! the extractor, decide what an incomplete submission means.

use serde::Deserialize;

/// `POST /signup`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// `POST /login`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
