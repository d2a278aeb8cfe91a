//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{credential::Credential, session::Session, user::User};
pub use repository::{CredentialRepository, SessionRepository, UserRepository, UsersStore};
