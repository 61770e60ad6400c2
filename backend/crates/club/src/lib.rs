//! Club (Content & Engagement) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Services for events, photos, members, testimonials and likes
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, multipart reading, router
//!
//! ## Features
//! - Events with slugs, image galleries and text/date search
//! - Photos attached to an event, a member, or nothing
//! - Member profiles with a profile photo and photo collection
//! - Testimonials with author-only deletion
//! - Likes on events and photos, summarized as `likesCount` / `isLiked`
//!
//! ## Integrity
//! - A like targets exactly one existing event or photo, once per user
//! - Deleting an event, photo or member removes its likes first
//! - Deleting a user purges their likes through `UserCascade`
//! - Stored media assets are removed after the owning row is gone

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ClubConfig;
pub use application::integrity::IntegrityCoordinator;
pub use domain::repository::ClubStore;
pub use error::{ClubError, ClubResult};
pub use infra::{memory::MemoryClubStore, postgres::PgClubRepository};
pub use presentation::router::club_router;

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
