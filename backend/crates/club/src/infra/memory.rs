//! In-memory club store for tests and local runs.
//!
//! One lock over all tables. Unique keys and the `RESTRICT` foreign keys of
//! the Postgres schema are checked under the write lock, so the coordinator
//! sees the same failures here as against the database.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::pagination::PageRequest;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::{
    EngagementSummary, Event, EventSearch, Like, LikeTarget, Member, Photo, PhotoOwner,
    TargetKind, Testimonial,
};
use crate::domain::repository::{
    EventRepository, LikeRepository, MemberRepository, PhotoRepository, TestimonialRepository,
};
use crate::domain::value_object::{
    EventId, LikeId, MemberId, PhotoId, TestimonialId, UserId, slug::Slug,
};
use crate::error::{ClubError, ClubResult};

#[derive(Debug, Default)]
struct Tables {
    events: HashMap<EventId, Event>,
    photos: HashMap<PhotoId, Photo>,
    members: HashMap<MemberId, Member>,
    testimonials: HashMap<TestimonialId, Testimonial>,
    likes: HashMap<LikeId, Like>,
    /// Event inserts still to be rejected with `SlugTaken`
    slug_races: u32,
}

impl Tables {
    fn target_exists(&self, target: &LikeTarget) -> bool {
        match target {
            LikeTarget::Event(id) => self.events.contains_key(id),
            LikeTarget::Photo(id) => self.photos.contains_key(id),
        }
    }

    fn is_liked(&self, target: &LikeTarget) -> bool {
        self.likes.values().any(|l| &l.target == target)
    }
}

/// In-memory club store
#[derive(Debug, Clone, Default)]
pub struct MemoryClubStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryClubStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored likes
    pub async fn like_count(&self) -> usize {
        self.tables.read().await.likes.len()
    }

    /// Number of stored photos
    pub async fn photo_count(&self) -> usize {
        self.tables.read().await.photos.len()
    }

    /// Reject the next `n` event inserts as if another writer took the slug first
    pub async fn lose_slug_races(&self, n: u32) {
        self.tables.write().await.slug_races = n;
    }
}

/// `created_at DESC, id DESC`
fn newest_first(a: (&DateTime<Utc>, &Uuid), b: (&DateTime<Utc>, &Uuid)) -> Ordering {
    b.0.cmp(a.0).then_with(|| b.1.cmp(a.1))
}

/// Slice one page out of an ordered list; returns `(page, total)`
fn paginate<T>(items: Vec<T>, page: Option<PageRequest>) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let items = match page {
        Some(page) => items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect(),
        None => items,
    };
    (items, total)
}

// ============================================================================
// Events
// ============================================================================

impl EventRepository for MemoryClubStore {
    async fn insert_event(&self, event: &Event) -> ClubResult<()> {
        let mut tables = self.tables.write().await;

        if tables.events.values().any(|e| e.name == event.name) {
            return Err(ClubError::Conflict("Event name already exists".to_string()));
        }
        if tables.slug_races > 0 {
            tables.slug_races -= 1;
            return Err(ClubError::SlugTaken);
        }
        if tables.events.values().any(|e| e.slug == event.slug) {
            return Err(ClubError::SlugTaken);
        }

        tables.events.insert(event.event_id, event.clone());
        Ok(())
    }

    async fn find_event(&self, event_id: &EventId) -> ClubResult<Option<Event>> {
        Ok(self.tables.read().await.events.get(event_id).cloned())
    }

    async fn find_event_by_slug(&self, slug: &str) -> ClubResult<Option<Event>> {
        Ok(self
            .tables
            .read()
            .await
            .events
            .values()
            .find(|e| e.slug.as_str() == slug)
            .cloned())
    }

    async fn event_name_exists(&self, name: &str) -> ClubResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .events
            .values()
            .any(|e| e.name == name))
    }

    async fn event_slug_exists(&self, slug: &Slug) -> ClubResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .events
            .values()
            .any(|e| &e.slug == slug))
    }

    async fn list_events(&self, page: Option<PageRequest>) -> ClubResult<(Vec<Event>, u64)> {
        let mut events: Vec<Event> = self.tables.read().await.events.values().cloned().collect();
        events.sort_by(|a, b| {
            newest_first(
                (&a.created_at, a.event_id.as_uuid()),
                (&b.created_at, b.event_id.as_uuid()),
            )
        });
        Ok(paginate(events, page))
    }

    async fn search_events(
        &self,
        filter: &EventSearch,
        page: PageRequest,
    ) -> ClubResult<(Vec<Event>, u64)> {
        let mut events: Vec<Event> = self
            .tables
            .read()
            .await
            .events
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            newest_first(
                (&a.created_at, a.event_id.as_uuid()),
                (&b.created_at, b.event_id.as_uuid()),
            )
        });
        Ok(paginate(events, Some(page)))
    }

    async fn delete_event(&self, event_id: &EventId) -> ClubResult<bool> {
        let mut tables = self.tables.write().await;

        if tables.is_liked(&LikeTarget::Event(*event_id)) {
            return Err(ClubError::Conflict("Event is still liked".to_string()));
        }
        if tables
            .photos
            .values()
            .any(|p| p.owner == PhotoOwner::Event(*event_id))
        {
            return Err(ClubError::Conflict("Event still owns photos".to_string()));
        }

        Ok(tables.events.remove(event_id).is_some())
    }
}

// ============================================================================
// Photos
// ============================================================================

impl PhotoRepository for MemoryClubStore {
    async fn insert_photo(&self, photo: &Photo) -> ClubResult<()> {
        let mut tables = self.tables.write().await;

        match photo.owner {
            PhotoOwner::Event(id) if !tables.events.contains_key(&id) => {
                return Err(ClubError::EventNotFound);
            }
            PhotoOwner::Member(id) if !tables.members.contains_key(&id) => {
                return Err(ClubError::MemberNotFound);
            }
            _ => {}
        }

        tables.photos.insert(photo.photo_id, photo.clone());
        Ok(())
    }

    async fn find_photo(&self, photo_id: &PhotoId) -> ClubResult<Option<Photo>> {
        Ok(self.tables.read().await.photos.get(photo_id).cloned())
    }

    async fn list_photos(&self, page: Option<PageRequest>) -> ClubResult<(Vec<Photo>, u64)> {
        let mut photos: Vec<Photo> = self.tables.read().await.photos.values().cloned().collect();
        photos.sort_by(|a, b| {
            newest_first(
                (&a.created_at, a.photo_id.as_uuid()),
                (&b.created_at, b.photo_id.as_uuid()),
            )
        });
        Ok(paginate(photos, page))
    }

    async fn photos_of_members(&self, member_ids: &[MemberId]) -> ClubResult<Vec<Photo>> {
        let mut photos: Vec<Photo> = self
            .tables
            .read()
            .await
            .photos
            .values()
            .filter(|p| p.owner.member_id().is_some_and(|m| member_ids.contains(&m)))
            .cloned()
            .collect();
        photos.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(photos)
    }

    async fn detach_event_photos(&self, event_id: &EventId) -> ClubResult<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut detached = 0;

        for photo in tables.photos.values_mut() {
            if photo.owner == PhotoOwner::Event(*event_id) {
                photo.owner = PhotoOwner::Unattached;
                photo.updated_at = now;
                detached += 1;
            }
        }

        Ok(detached)
    }

    async fn delete_photo(&self, photo_id: &PhotoId) -> ClubResult<bool> {
        let mut tables = self.tables.write().await;

        if tables.is_liked(&LikeTarget::Photo(*photo_id)) {
            return Err(ClubError::Conflict("Photo is still liked".to_string()));
        }

        Ok(tables.photos.remove(photo_id).is_some())
    }
}

// ============================================================================
// Members
// ============================================================================

impl MemberRepository for MemoryClubStore {
    async fn insert_member(&self, member: &Member) -> ClubResult<()> {
        let mut tables = self.tables.write().await;

        if tables.members.values().any(|m| m.user_id == member.user_id) {
            return Err(ClubError::Conflict(
                "Member already exists for this user".to_string(),
            ));
        }

        tables.members.insert(member.member_id, member.clone());
        Ok(())
    }

    async fn find_member(&self, member_id: &MemberId) -> ClubResult<Option<Member>> {
        Ok(self.tables.read().await.members.get(member_id).cloned())
    }

    async fn find_member_by_user(&self, user_id: &UserId) -> ClubResult<Option<Member>> {
        Ok(self
            .tables
            .read()
            .await
            .members
            .values()
            .find(|m| &m.user_id == user_id)
            .cloned())
    }

    async fn list_members(&self) -> ClubResult<Vec<Member>> {
        let mut members: Vec<Member> = self.tables.read().await.members.values().cloned().collect();
        members.sort_by(|a, b| {
            newest_first(
                (&a.created_at, a.member_id.as_uuid()),
                (&b.created_at, b.member_id.as_uuid()),
            )
        });
        Ok(members)
    }

    async fn update_member(&self, member: &Member) -> ClubResult<bool> {
        let mut tables = self.tables.write().await;

        let Some(stored) = tables.members.get_mut(&member.member_id) else {
            return Ok(false);
        };
        // 写真リストは append / remove 専用
        stored.name = member.name.clone();
        stored.description = member.description.clone();
        stored.displayed = member.displayed;
        stored.role = member.role;
        stored.profile_photo = member.profile_photo.clone();
        stored.updated_at = member.updated_at;
        Ok(true)
    }

    async fn append_member_photo(
        &self,
        member_id: &MemberId,
        photo_id: &PhotoId,
    ) -> ClubResult<bool> {
        let mut tables = self.tables.write().await;

        let member = tables
            .members
            .get_mut(member_id)
            .ok_or(ClubError::MemberNotFound)?;
        Ok(member.add_photo(*photo_id))
    }

    async fn remove_member_photo(
        &self,
        member_id: &MemberId,
        photo_id: &PhotoId,
    ) -> ClubResult<bool> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .members
            .get_mut(member_id)
            .is_some_and(|m| m.remove_photo(photo_id)))
    }

    async fn delete_member(&self, member_id: &MemberId) -> ClubResult<bool> {
        let mut tables = self.tables.write().await;

        if tables
            .photos
            .values()
            .any(|p| p.owner == PhotoOwner::Member(*member_id))
        {
            return Err(ClubError::Conflict("Member still owns photos".to_string()));
        }

        Ok(tables.members.remove(member_id).is_some())
    }
}

// ============================================================================
// Testimonials
// ============================================================================

impl TestimonialRepository for MemoryClubStore {
    async fn insert_testimonial(&self, testimonial: &Testimonial) -> ClubResult<()> {
        self.tables
            .write()
            .await
            .testimonials
            .insert(testimonial.testimonial_id, testimonial.clone());
        Ok(())
    }

    async fn find_testimonial(
        &self,
        testimonial_id: &TestimonialId,
    ) -> ClubResult<Option<Testimonial>> {
        Ok(self
            .tables
            .read()
            .await
            .testimonials
            .get(testimonial_id)
            .cloned())
    }

    async fn list_testimonials(&self) -> ClubResult<Vec<Testimonial>> {
        let mut items: Vec<Testimonial> = self
            .tables
            .read()
            .await
            .testimonials
            .values()
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            newest_first(
                (&a.updated_at, a.testimonial_id.as_uuid()),
                (&b.updated_at, b.testimonial_id.as_uuid()),
            )
        });
        Ok(items)
    }

    async fn testimonials_by_author(
        &self,
        author: &UserId,
        page: PageRequest,
    ) -> ClubResult<(Vec<Testimonial>, u64)> {
        let mut items: Vec<Testimonial> = self
            .tables
            .read()
            .await
            .testimonials
            .values()
            .filter(|t| &t.author == author)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            newest_first(
                (&a.created_at, a.testimonial_id.as_uuid()),
                (&b.created_at, b.testimonial_id.as_uuid()),
            )
        });
        Ok(paginate(items, Some(page)))
    }

    async fn delete_testimonial(&self, testimonial_id: &TestimonialId) -> ClubResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .testimonials
            .remove(testimonial_id)
            .is_some())
    }
}

// ============================================================================
// Likes
// ============================================================================

impl LikeRepository for MemoryClubStore {
    async fn insert_like(&self, like: &Like) -> ClubResult<()> {
        let mut tables = self.tables.write().await;

        if !tables.target_exists(&like.target) {
            return Err(crate::application::engagement::not_found(&like.target));
        }
        if tables
            .likes
            .values()
            .any(|l| l.user_id == like.user_id && l.target == like.target)
        {
            return Err(ClubError::AlreadyLiked);
        }

        tables.likes.insert(like.like_id, like.clone());
        Ok(())
    }

    async fn delete_like(
        &self,
        user_id: &UserId,
        target: &LikeTarget,
    ) -> ClubResult<Option<Like>> {
        let mut tables = self.tables.write().await;
        let like_id = tables
            .likes
            .values()
            .find(|l| &l.user_id == user_id && &l.target == target)
            .map(|l| l.like_id);

        Ok(like_id.and_then(|id| tables.likes.remove(&id)))
    }

    async fn delete_likes_on(&self, target: &LikeTarget) -> ClubResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables.likes.retain(|_, l| &l.target != target);
        Ok((before - tables.likes.len()) as u64)
    }

    async fn delete_likes_by_user(&self, user_id: &UserId) -> ClubResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.likes.len();
        tables.likes.retain(|_, l| &l.user_id != user_id);
        Ok((before - tables.likes.len()) as u64)
    }

    async fn count_likes(&self, target: &LikeTarget) -> ClubResult<u64> {
        Ok(self
            .tables
            .read()
            .await
            .likes
            .values()
            .filter(|l| &l.target == target)
            .count() as u64)
    }

    async fn has_liked(&self, user_id: &UserId, target: &LikeTarget) -> ClubResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .likes
            .values()
            .any(|l| &l.user_id == user_id && &l.target == target))
    }

    async fn summarize_likes(
        &self,
        kind: TargetKind,
        target_ids: &[Uuid],
        viewer: Option<&UserId>,
    ) -> ClubResult<HashMap<Uuid, EngagementSummary>> {
        let tables = self.tables.read().await;
        let mut summaries: HashMap<Uuid, EngagementSummary> = HashMap::new();

        for like in tables.likes.values() {
            let id = like.target.uuid();
            if like.target.kind() != kind || !target_ids.contains(&id) {
                continue;
            }
            let entry = summaries.entry(id).or_default();
            entry.likes_count += 1;
            if viewer == Some(&like.user_id) {
                entry.liked_by_viewer = true;
            }
        }

        Ok(summaries)
    }
}
