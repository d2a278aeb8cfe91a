//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate holds the vocabulary every bounded context agrees on:
//! - Common error types and result aliases
//! - Typed ID wrappers
//! - HTML escaping for server-rendered pages
//!
//! Only things that are hard to change and mean the same thing in every
//! domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod html;
pub mod id;
