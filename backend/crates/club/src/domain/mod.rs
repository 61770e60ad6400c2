//! Domain Layer
//!
//! Content entities, the like relation and the storage ports.

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::*;
pub use repository::*;
