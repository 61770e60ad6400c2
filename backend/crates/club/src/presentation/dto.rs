//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{AuthoredTestimonial, Deleted, MemberProfile};
use crate::domain::entity::{Event, Like, Photo, Testimonial};
use crate::domain::value_object::member_role::MemberRole;

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub rules: String,
    pub team_size: i32,
    pub venue: String,
    pub date_of_event: DateTime<Utc>,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.event_id.into_uuid(),
            name: event.name,
            slug: event.slug.to_string(),
            description: event.description,
            rules: event.rules,
            team_size: event.team_size,
            venue: event.venue,
            date_of_event: event.date_of_event,
            photos: event.photos,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// `GET /events/search` query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub search_string: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

// ============================================================================
// Photos
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub id: Uuid,
    pub img_url: String,
    pub author: Option<Uuid>,
    pub content: Option<String>,
    pub displayed: bool,
    pub event: Option<Uuid>,
    pub member: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        let (event, member) = photo.owner.columns();
        Self {
            id: photo.photo_id.into_uuid(),
            img_url: photo.img_url,
            author: photo.author.map(|a| a.into_uuid()),
            content: photo.content,
            displayed: photo.displayed,
            event,
            member,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
        }
    }
}

// ============================================================================
// Likes
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_type: &'static str,
    pub target_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Like> for LikeResponse {
    fn from(like: Like) -> Self {
        Self {
            id: like.like_id.into_uuid(),
            user_id: like.user_id.into_uuid(),
            target_type: like.target.kind().as_str(),
            target_id: like.target.uuid(),
            created_at: like.created_at,
        }
    }
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub role: Option<String>,
    pub displayed: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub role: Option<String>,
    pub displayed: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub profile_photo: Option<String>,
    pub photos: Vec<PhotoResponse>,
    pub displayed: bool,
    pub role: MemberRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MemberProfile> for MemberResponse {
    fn from(profile: MemberProfile) -> Self {
        let MemberProfile { member, photos } = profile;
        Self {
            id: member.member_id.into_uuid(),
            user_id: member.user_id.into_uuid(),
            name: member.name,
            description: member.description,
            profile_photo: member.profile_photo,
            photos: photos.into_iter().map(PhotoResponse::from).collect(),
            displayed: member.displayed,
            role: member.role,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

// ============================================================================
// Testimonials
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestimonialRequest {
    pub description: String,
    pub profile_photo: Option<String>,
    pub displayed: Option<bool>,
}

/// `GET /testimonial/post/{userId}` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialPageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialResponse {
    pub id: Uuid,
    pub author: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub description: String,
    pub profile_photo: Option<String>,
    pub displayed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Testimonial> for TestimonialResponse {
    fn from(t: Testimonial) -> Self {
        Self {
            id: t.testimonial_id.into_uuid(),
            author: t.author.into_uuid(),
            username: None,
            description: t.description,
            profile_photo: t.profile_photo,
            displayed: t.displayed,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl From<AuthoredTestimonial> for TestimonialResponse {
    fn from(authored: AuthoredTestimonial) -> Self {
        Self {
            username: authored.username,
            ..Self::from(authored.testimonial)
        }
    }
}

// ============================================================================
// Deletion
// ============================================================================

/// The removed record plus what its cascade removed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionResponse<T> {
    pub id: Uuid,
    pub deleted: T,
    pub likes_removed: u64,
    pub photos_detached: u64,
    pub photos_deleted: u64,
    pub assets_removed: u64,
}

impl<T> DeletionResponse<T> {
    pub fn new<E>(id: Uuid, deleted: Deleted<E>) -> Self
    where
        T: From<E>,
    {
        let Deleted { item, report } = deleted;
        Self {
            id,
            deleted: T::from(item),
            likes_removed: report.likes_removed,
            photos_detached: report.photos_detached,
            photos_deleted: report.photos_deleted,
            assets_removed: report.assets_removed,
        }
    }
}
