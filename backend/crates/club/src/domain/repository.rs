//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.
//! Method names are unique across traits so one store type can implement
//! all of them without call-site ambiguity.

use std::collections::HashMap;

use kernel::pagination::PageRequest;
use uuid::Uuid;

use crate::domain::entity::{
    EngagementSummary, Event, EventSearch, Like, LikeTarget, Member, Photo, TargetKind,
    Testimonial,
};
use crate::domain::value_object::{
    EventId, MemberId, PhotoId, TestimonialId, UserId, slug::Slug,
};
use crate::error::ClubResult;

/// Event repository
///
/// `insert_event` reports a taken name as `ClubError::Conflict` and a taken
/// slug as `ClubError::SlugTaken`.
#[trait_variant::make(EventRepository: Send)]
pub trait LocalEventRepository {
    async fn insert_event(&self, event: &Event) -> ClubResult<()>;

    async fn find_event(&self, event_id: &EventId) -> ClubResult<Option<Event>>;

    async fn find_event_by_slug(&self, slug: &str) -> ClubResult<Option<Event>>;

    async fn event_name_exists(&self, name: &str) -> ClubResult<bool>;

    async fn event_slug_exists(&self, slug: &Slug) -> ClubResult<bool>;

    /// `created_at DESC, id DESC`; all rows when `page` is `None`. Returns `(items, total)`
    async fn list_events(&self, page: Option<PageRequest>) -> ClubResult<(Vec<Event>, u64)>;

    /// Filtered and always paged. Returns `(items, total matching)`
    async fn search_events(
        &self,
        filter: &EventSearch,
        page: PageRequest,
    ) -> ClubResult<(Vec<Event>, u64)>;

    /// Fails with a conflict while likes still reference the event
    async fn delete_event(&self, event_id: &EventId) -> ClubResult<bool>;
}

/// Photo repository
#[trait_variant::make(PhotoRepository: Send)]
pub trait LocalPhotoRepository {
    async fn insert_photo(&self, photo: &Photo) -> ClubResult<()>;

    async fn find_photo(&self, photo_id: &PhotoId) -> ClubResult<Option<Photo>>;

    /// `created_at DESC, id DESC`. Returns `(items, total)`
    async fn list_photos(&self, page: Option<PageRequest>) -> ClubResult<(Vec<Photo>, u64)>;

    /// Photos owned by any of the given members
    async fn photos_of_members(&self, member_ids: &[MemberId]) -> ClubResult<Vec<Photo>>;

    /// Set owner to `Unattached` for every photo owned by the event
    async fn detach_event_photos(&self, event_id: &EventId) -> ClubResult<u64>;

    /// Fails with a conflict while likes still reference the photo
    async fn delete_photo(&self, photo_id: &PhotoId) -> ClubResult<bool>;
}

/// Member repository
///
/// `insert_member` reports a second profile for the same user as
/// `ClubError::Conflict`.
#[trait_variant::make(MemberRepository: Send)]
pub trait LocalMemberRepository {
    async fn insert_member(&self, member: &Member) -> ClubResult<()>;

    async fn find_member(&self, member_id: &MemberId) -> ClubResult<Option<Member>>;

    async fn find_member_by_user(&self, user_id: &UserId) -> ClubResult<Option<Member>>;

    /// Newest first
    async fn list_members(&self) -> ClubResult<Vec<Member>>;

    /// Persist profile fields (name, description, displayed, role, profile photo)
    async fn update_member(&self, member: &Member) -> ClubResult<bool>;

    /// Append to the photo collection unless already present
    async fn append_member_photo(&self, member_id: &MemberId, photo_id: &PhotoId)
    -> ClubResult<bool>;

    async fn remove_member_photo(&self, member_id: &MemberId, photo_id: &PhotoId)
    -> ClubResult<bool>;

    async fn delete_member(&self, member_id: &MemberId) -> ClubResult<bool>;
}

/// Testimonial repository
#[trait_variant::make(TestimonialRepository: Send)]
pub trait LocalTestimonialRepository {
    async fn insert_testimonial(&self, testimonial: &Testimonial) -> ClubResult<()>;

    async fn find_testimonial(
        &self,
        testimonial_id: &TestimonialId,
    ) -> ClubResult<Option<Testimonial>>;

    /// Most recently updated first
    async fn list_testimonials(&self) -> ClubResult<Vec<Testimonial>>;

    /// `created_at DESC`, paged. Returns `(items, total)`
    async fn testimonials_by_author(
        &self,
        author: &UserId,
        page: PageRequest,
    ) -> ClubResult<(Vec<Testimonial>, u64)>;

    async fn delete_testimonial(&self, testimonial_id: &TestimonialId) -> ClubResult<bool>;
}

/// Like repository
///
/// `insert_like` reports a duplicate `(user, target)` as
/// `ClubError::AlreadyLiked` and a vanished target as the target's NotFound.
#[trait_variant::make(LikeRepository: Send)]
pub trait LocalLikeRepository {
    async fn insert_like(&self, like: &Like) -> ClubResult<()>;

    /// Remove the user's like on the target, returning the removed row
    async fn delete_like(
        &self,
        user_id: &UserId,
        target: &LikeTarget,
    ) -> ClubResult<Option<Like>>;

    /// Remove every like on the target
    async fn delete_likes_on(&self, target: &LikeTarget) -> ClubResult<u64>;

    /// Remove every like made by the user
    async fn delete_likes_by_user(&self, user_id: &UserId) -> ClubResult<u64>;

    async fn count_likes(&self, target: &LikeTarget) -> ClubResult<u64>;

    async fn has_liked(&self, user_id: &UserId, target: &LikeTarget) -> ClubResult<bool>;

    /// Engagement numbers for many targets of one kind in a single query
    ///
    /// Ids without likes may be absent from the map.
    async fn summarize_likes(
        &self,
        kind: TargetKind,
        target_ids: &[Uuid],
        viewer: Option<&UserId>,
    ) -> ClubResult<HashMap<Uuid, EngagementSummary>>;
}

/// Everything the club services need from storage
pub trait ClubStore:
    EventRepository
    + PhotoRepository
    + MemberRepository
    + TestimonialRepository
    + LikeRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> ClubStore for T where
    T: EventRepository
        + PhotoRepository
        + MemberRepository
        + TestimonialRepository
        + LikeRepository
        + Send
        + Sync
        + 'static
{
}
