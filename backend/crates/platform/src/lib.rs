//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the web backend:
//! - Cryptographic utilities (HMAC signing, Base64)
//! - Password hashing (Argon2id)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
