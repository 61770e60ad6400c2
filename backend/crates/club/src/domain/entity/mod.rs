pub mod event;
pub mod like;
pub mod member;
pub mod photo;
pub mod testimonial;

pub use event::{Event, EventSearch, NewEvent};
pub use like::{EngagementSummary, Like, LikeTarget, TargetKind};
pub use member::{Member, MemberPatch};
pub use photo::{Photo, PhotoOwner};
pub use testimonial::Testimonial;
