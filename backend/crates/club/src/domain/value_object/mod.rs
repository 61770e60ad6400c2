//! Value Object Module

pub mod member_role;
pub mod slug;
pub mod text;

pub use kernel::id::{EventId, LikeId, MemberId, PhotoId, TestimonialId, UserId};
