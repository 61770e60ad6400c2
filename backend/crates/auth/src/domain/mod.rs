//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the deletion port.

pub mod cascade;
pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use cascade::{NoCascade, UserCascade};
pub use entity::User;
pub use repository::UserRepository;
