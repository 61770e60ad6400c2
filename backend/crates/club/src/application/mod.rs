//! Application Layer
//!
//! Use cases and application services.

pub mod actor;
pub mod aggregator;
pub mod config;
pub mod engagement;
pub mod events;
pub mod integrity;
pub mod members;
pub mod photos;
pub mod testimonials;
mod uploads;

// Re-exports
pub use actor::Actor;
pub use aggregator::{Engageable, Engaged, EngagementAggregator};
pub use config::ClubConfig;
pub use engagement::EngagementService;
pub use events::{CreateEventInput, EventService, SearchEventsInput};
pub use integrity::{Deleted, DeletionReport, IntegrityCoordinator};
pub use members::{CreateMemberInput, MemberProfile, MemberService, UpdateMemberInput};
pub use photos::{CreatePhotoInput, PhotoService};
pub use testimonials::{AuthoredTestimonial, CreateTestimonialInput, TestimonialService};
