//! Infrastructure Layer
//!
//! Storage implementations of the club repository traits.

pub mod memory;
pub mod postgres;

pub use memory::MemoryClubStore;
pub use postgres::PgClubRepository;
