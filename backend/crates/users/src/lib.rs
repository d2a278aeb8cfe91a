//! Users (Signup / Login / Logout) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases (register, credential check, sessions)
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - Handlers, forms, views, flash notices, router
//!
//! ## Flow
//! - `POST /signup` registers the user, opens a session and redirects to
//!   `/listings` with a welcome notice
//! - `POST /login` is checked by the [`LocalAuth`](presentation::LocalAuth)
//!   extractor before the handler runs, then redirects to the remembered
//!   page or `/listings`
//! - `/logout` ends the session
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Server-side sessions; the cookie carries an HMAC-signed session id
//! - Flash and return-to cookies are signed with the same key

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::UsersConfig;
pub use domain::repository::UsersStore;
pub use error::{UsersError, UsersResult};
pub use infra::{memory::InMemoryUsersRepository, postgres::PgUsersRepository};
pub use presentation::handlers::UsersAppState;
pub use presentation::router::users_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::form::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod flash {
    pub use crate::presentation::flash::*;
}
