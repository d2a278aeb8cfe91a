//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod session;
pub mod sign_in;
pub mod sign_up;

// Re-exports
pub use config::UsersConfig;
pub use session::SessionUseCase;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::SignUpUseCase;
