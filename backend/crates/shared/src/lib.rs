//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! `auth` and `club` crates:
//! - Unified error type and the failure envelope
//! - Typed entity IDs
//! - Success envelope (`{statusCode, data, message, success}`)
//! - Pagination arithmetic
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod pagination;
pub mod response;
