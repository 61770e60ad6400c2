//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Registration with user name, email and password (admin role behind a key)
//! - Login by user name or email
//! - Short-lived access token + rotating refresh token (one current per user)
//! - Session middleware (`require_auth`) and role gate (`require_role`)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Access/refresh tokens are HS256 JWTs signed with separate secrets
//! - Refresh rotation is compare-and-overwrite; a rotated-out token is dead
//! - Tokens travel in http-only cookies or the bearer header

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::cascade::{NoCascade, UserCascade};
pub use error::{AuthError, AuthResult};
pub use infra::{memory::MemoryUserRepository, postgres::PgAuthRepository};
pub use presentation::middleware::{AuthMiddlewareState, CurrentUser, require_auth, require_role};
pub use presentation::router::{auth_router, auth_router_generic};

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
    pub use crate::presentation::dto::*;
}

#[cfg(test)]
mod tests;
