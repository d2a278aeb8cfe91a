//! Entity Module

pub mod credential;
pub mod session;
pub mod user;

pub use credential::Credential;
pub use session::Session;
pub use user::{NewUser, User};
