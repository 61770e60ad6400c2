//! HTTP Handlers
//!
//! Every route sits behind `require_auth`, so handlers take [`CurrentUser`]
//! directly. Extractor rejections are turned into the failure envelope.

use std::sync::Arc;

use auth::CurrentUser;
use auth::domain::repository::UserRepository;
use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use kernel::error::app_error::AppError;
use kernel::id::Id;
use kernel::pagination::{PageQuery, PageRequest, Paged};
use kernel::response::ApiResponse;
use platform::media::MediaStore;

use crate::application::{
    Actor, ClubConfig, CreateEventInput, CreateMemberInput, CreatePhotoInput,
    CreateTestimonialInput, Engaged, EngagementService, EventService, MemberService, PhotoService,
    SearchEventsInput, TestimonialService, UpdateMemberInput,
};
use crate::domain::entity::{Event, LikeTarget, Photo};
use crate::domain::repository::ClubStore;
use crate::error::{ClubError, ClubResult};
use crate::presentation::dto::{
    CreateMemberRequest, CreateTestimonialRequest, DeletionResponse, EventResponse, LikeResponse,
    MemberResponse, PhotoResponse, SearchQuery, TestimonialPageQuery, TestimonialResponse,
    UpdateMemberRequest,
};
use crate::presentation::multipart::FormData;

/// Multipart field carrying event and photo images
pub const IMAGE_FIELD: &str = "image";

/// Multipart field carrying a member profile photo
pub const PROFILE_PHOTO_FIELD: &str = "profilePhoto";

/// Shared state for club handlers
pub struct ClubAppState<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub media: Arc<M>,
    pub config: Arc<ClubConfig>,
}

impl<S, M> Clone for ClubAppState<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            media: self.media.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, M> ClubAppState<S, M>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    fn events(&self) -> EventService<S, M> {
        EventService::new(self.store.clone(), self.media.clone(), self.config.clone())
    }

    fn photos(&self) -> PhotoService<S, M> {
        PhotoService::new(self.store.clone(), self.media.clone(), self.config.clone())
    }

    fn members(&self) -> MemberService<S, M> {
        MemberService::new(self.store.clone(), self.media.clone(), self.config.clone())
    }

    fn engagement(&self) -> EngagementService<S> {
        EngagementService::new(self.store.clone())
    }
}

/// Shared state for testimonial handlers, which also read user names
pub struct TestimonialAppState<S, U>
where
    S: ClubStore,
    U: UserRepository + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub users: Arc<U>,
    pub config: Arc<ClubConfig>,
}

impl<S, U> Clone for TestimonialAppState<S, U>
where
    S: ClubStore,
    U: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            users: self.users.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, U> TestimonialAppState<S, U>
where
    S: ClubStore,
    U: UserRepository + Send + Sync + 'static,
{
    fn testimonials(&self) -> TestimonialService<S, U> {
        TestimonialService::new(self.store.clone(), self.users.clone())
    }
}

/// Parse a path id; a malformed id is a client error
fn parse_id<T>(raw: &str, what: &str) -> ClubResult<Id<T>> {
    raw.parse()
        .map_err(|_| ClubError::validation(format!("Invalid {} id", what)))
}

fn engaged_events(page: Paged<Engaged<Event>>) -> Paged<Engaged<EventResponse>> {
    page.map(|e| e.map(EventResponse::from))
}

fn engaged_photos(page: Paged<Engaged<Photo>>) -> Paged<Engaged<PhotoResponse>> {
    page.map(|p| p.map(PhotoResponse::from))
}

// ============================================================================
// Events
// ============================================================================

/// GET /events/all-events
pub async fn all_events<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ClubResult<ApiResponse<Paged<Engaged<EventResponse>>>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let Query(query) = query.map_err(AppError::from)?;
    let page = query.resolve(state.config.list_page_limit);

    let events = state.events().list(page, Some(&current.user_id)).await?;

    Ok(ApiResponse::ok(engaged_events(events), "Events fetched successfully"))
}

/// GET /events/get-events/{slug}
pub async fn get_event<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    Path(slug): Path<String>,
) -> ClubResult<ApiResponse<Engaged<EventResponse>>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let event = state
        .events()
        .get_by_slug(&slug, Some(&current.user_id))
        .await?;

    Ok(ApiResponse::ok(
        event.map(EventResponse::from),
        "Event fetched successfully",
    ))
}

/// GET /events/search
pub async fn search_events<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ClubResult<ApiResponse<Paged<Engaged<EventResponse>>>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let Query(query) = query.map_err(AppError::from)?;
    let page = PageRequest::new(query.page, query.limit, state.config.search_page_limit);

    let events = state
        .events()
        .search(
            SearchEventsInput {
                text: query.search_string,
                start_date: query.start_date,
                end_date: query.end_date,
            },
            page,
            Some(&current.user_id),
        )
        .await?;

    Ok(ApiResponse::ok(engaged_events(events), "Events fetched successfully"))
}

/// POST /events/create (multipart, admin)
pub async fn create_event<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ClubResult<ApiResponse<EventResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let form = FormData::read(multipart.map_err(AppError::from)?, IMAGE_FIELD).await?;

    let input = CreateEventInput {
        name: form.text("name"),
        description: form.text("description"),
        rules: form.text("rules"),
        team_size: form.optional("teamSize"),
        venue: form.text("venue"),
        date_of_event: form.text("dateOfEvent"),
    };

    let event = state.events().create(input, form.into_files()).await?;
    tracing::debug!(by = %current.user_id, event_id = %event.event_id, "Event created via API");

    Ok(ApiResponse::created(
        EventResponse::from(event),
        "Event created successfully",
    ))
}

/// DELETE /events/delete/{eventId} (admin)
pub async fn delete_event<S, M>(
    State(state): State<ClubAppState<S, M>>,
    Path(event_id): Path<String>,
) -> ClubResult<ApiResponse<DeletionResponse<EventResponse>>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let event_id = parse_id(&event_id, "event")?;
    let deleted = state.events().delete(&event_id).await?;

    Ok(ApiResponse::ok(
        DeletionResponse::new(event_id.into_uuid(), deleted),
        "Event deleted successfully",
    ))
}

// ============================================================================
// Photos
// ============================================================================

/// GET /photo/all-photo
pub async fn all_photos<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ClubResult<ApiResponse<Paged<Engaged<PhotoResponse>>>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let Query(query) = query.map_err(AppError::from)?;
    let page = query.resolve(state.config.list_page_limit);

    let photos = state.photos().list(page, Some(&current.user_id)).await?;

    Ok(ApiResponse::ok(engaged_photos(photos), "Photos fetched successfully"))
}

/// GET /photo/get-photo/{id}
pub async fn get_photo<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    Path(photo_id): Path<String>,
) -> ClubResult<ApiResponse<Engaged<PhotoResponse>>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let photo_id = parse_id(&photo_id, "photo")?;
    let photo = state
        .photos()
        .get(&photo_id, Some(&current.user_id))
        .await?;

    Ok(ApiResponse::ok(
        photo.map(PhotoResponse::from),
        "Photo fetched successfully",
    ))
}

/// POST /photo/create (multipart)
pub async fn create_photo<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ClubResult<ApiResponse<PhotoResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let form = FormData::read(multipart.map_err(AppError::from)?, IMAGE_FIELD).await?;

    let input = CreatePhotoInput {
        content: form.optional("content"),
        displayed: form.flag("displayed")?,
        event_id: form
            .optional("eventId")
            .map(|raw| parse_id(&raw, "event"))
            .transpose()?,
        member_id: form
            .optional("memberId")
            .map(|raw| parse_id(&raw, "member"))
            .transpose()?,
    };

    let photo = state
        .photos()
        .create(Actor::from(current), input, form.into_single_file()?)
        .await?;

    Ok(ApiResponse::created(
        PhotoResponse::from(photo),
        "Photo created successfully",
    ))
}

/// DELETE /photo/delete/{photoId} (author or admin)
pub async fn delete_photo<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    Path(photo_id): Path<String>,
) -> ClubResult<ApiResponse<DeletionResponse<PhotoResponse>>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let photo_id = parse_id(&photo_id, "photo")?;
    let deleted = state
        .photos()
        .delete(Actor::from(current), &photo_id)
        .await?;

    Ok(ApiResponse::ok(
        DeletionResponse::new(photo_id.into_uuid(), deleted),
        "Photo deleted successfully",
    ))
}

// ============================================================================
// Likes
// ============================================================================

/// POST /likes/photo/{photoId}
pub async fn like_photo<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    Path(photo_id): Path<String>,
) -> ClubResult<ApiResponse<LikeResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let target = LikeTarget::Photo(parse_id(&photo_id, "photo")?);
    let like = state.engagement().like(&current.user_id, target).await?;

    Ok(ApiResponse::created(LikeResponse::from(like), "Like added"))
}

/// POST /likes/event/{eventId}
pub async fn like_event<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    Path(event_id): Path<String>,
) -> ClubResult<ApiResponse<LikeResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let target = LikeTarget::Event(parse_id(&event_id, "event")?);
    let like = state.engagement().like(&current.user_id, target).await?;

    Ok(ApiResponse::created(LikeResponse::from(like), "Like added"))
}

/// DELETE /likes/delete/photo/{photoId}
pub async fn unlike_photo<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    Path(photo_id): Path<String>,
) -> ClubResult<ApiResponse<LikeResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let target = LikeTarget::Photo(parse_id(&photo_id, "photo")?);
    let like = state.engagement().unlike(&current.user_id, target).await?;

    Ok(ApiResponse::ok(LikeResponse::from(like), "Like removed"))
}

/// DELETE /likes/delete/event/{eventId}
pub async fn unlike_event<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    Path(event_id): Path<String>,
) -> ClubResult<ApiResponse<LikeResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let target = LikeTarget::Event(parse_id(&event_id, "event")?);
    let like = state.engagement().unlike(&current.user_id, target).await?;

    Ok(ApiResponse::ok(LikeResponse::from(like), "Like removed"))
}

// ============================================================================
// Testimonials
// ============================================================================

/// GET /testimonial/post/{userId}
pub async fn testimonials_for_user<S, U>(
    State(state): State<TestimonialAppState<S, U>>,
    Path(user_id): Path<String>,
    query: Result<Query<TestimonialPageQuery>, QueryRejection>,
) -> ClubResult<ApiResponse<Paged<TestimonialResponse>>>
where
    S: ClubStore,
    U: UserRepository + Send + Sync + 'static,
{
    let Query(query) = query.map_err(AppError::from)?;
    let user_id = parse_id(&user_id, "user")?;
    let page = PageRequest::new(query.page, query.limit, state.config.testimonial_page_limit);

    let testimonials = state.testimonials().list_for_user(&user_id, page).await?;

    Ok(ApiResponse::ok(
        testimonials.map(TestimonialResponse::from),
        "Testimonials fetched successfully",
    ))
}

/// GET /testimonial/all-testimonials (admin)
pub async fn all_testimonials<S, U>(
    State(state): State<TestimonialAppState<S, U>>,
) -> ClubResult<ApiResponse<Vec<TestimonialResponse>>>
where
    S: ClubStore,
    U: UserRepository + Send + Sync + 'static,
{
    let testimonials = state.testimonials().list_all().await?;

    Ok(ApiResponse::ok(
        testimonials.into_iter().map(TestimonialResponse::from).collect(),
        "All testimonials fetched successfully",
    ))
}

/// POST /testimonial/create
pub async fn create_testimonial<S, U>(
    State(state): State<TestimonialAppState<S, U>>,
    current: CurrentUser,
    payload: Result<Json<CreateTestimonialRequest>, JsonRejection>,
) -> ClubResult<ApiResponse<TestimonialResponse>>
where
    S: ClubStore,
    U: UserRepository + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let testimonial = state
        .testimonials()
        .create(
            &current.user_id,
            CreateTestimonialInput {
                description: req.description,
                profile_photo: req.profile_photo,
                displayed: req.displayed,
            },
        )
        .await?;

    Ok(ApiResponse::created(
        TestimonialResponse::from(testimonial),
        "Testimonial created successfully",
    ))
}

/// DELETE /testimonial/delete/{testimonialId} (author only)
pub async fn delete_own_testimonial<S, U>(
    State(state): State<TestimonialAppState<S, U>>,
    current: CurrentUser,
    Path(testimonial_id): Path<String>,
) -> ClubResult<ApiResponse<TestimonialResponse>>
where
    S: ClubStore,
    U: UserRepository + Send + Sync + 'static,
{
    let testimonial_id = parse_id(&testimonial_id, "testimonial")?;
    // 管理者でもこのルートでは作成者本人として扱う
    let testimonial = state
        .testimonials()
        .delete(Actor::user(current.user_id), &testimonial_id)
        .await?;

    Ok(ApiResponse::ok(
        TestimonialResponse::from(testimonial),
        "Testimonial deleted successfully",
    ))
}

/// DELETE /testimonial/delete-admin/{testimonialId} (admin)
pub async fn delete_testimonial_admin<S, U>(
    State(state): State<TestimonialAppState<S, U>>,
    current: CurrentUser,
    Path(testimonial_id): Path<String>,
) -> ClubResult<ApiResponse<TestimonialResponse>>
where
    S: ClubStore,
    U: UserRepository + Send + Sync + 'static,
{
    let testimonial_id = parse_id(&testimonial_id, "testimonial")?;
    let testimonial = state
        .testimonials()
        .delete(Actor::admin(current.user_id), &testimonial_id)
        .await?;

    Ok(ApiResponse::ok(
        TestimonialResponse::from(testimonial),
        "Testimonial deleted successfully",
    ))
}

// ============================================================================
// Members
// ============================================================================

/// POST /members/create (admin)
pub async fn create_member<S, M>(
    State(state): State<ClubAppState<S, M>>,
    payload: Result<Json<CreateMemberRequest>, JsonRejection>,
) -> ClubResult<ApiResponse<MemberResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let service = state.members();
    let member = service
        .create(CreateMemberInput {
            user_id: parse_id(&req.user_id, "user")?,
            name: req.name,
            description: req.description,
            role: req.role,
            displayed: req.displayed,
        })
        .await?;
    let profile = service.get_own(&member.user_id).await?;

    Ok(ApiResponse::created(
        MemberResponse::from(profile),
        "Member created successfully",
    ))
}

/// GET /members/all-members (admin)
pub async fn all_members<S, M>(
    State(state): State<ClubAppState<S, M>>,
) -> ClubResult<ApiResponse<Vec<MemberResponse>>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let members = state.members().list_all().await?;

    Ok(ApiResponse::ok(
        members.into_iter().map(MemberResponse::from).collect(),
        "Members fetched successfully",
    ))
}

/// GET /members/get-member
pub async fn get_member<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
) -> ClubResult<ApiResponse<MemberResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let profile = state.members().get_own(&current.user_id).await?;

    Ok(ApiResponse::ok(
        MemberResponse::from(profile),
        "Member fetched successfully",
    ))
}

/// PATCH /members/update
pub async fn update_member<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    payload: Result<Json<UpdateMemberRequest>, JsonRejection>,
) -> ClubResult<ApiResponse<MemberResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(AppError::from)?;

    let profile = state
        .members()
        .update_own(
            &current.user_id,
            UpdateMemberInput {
                name: req.name,
                description: req.description,
                role: req.role,
                displayed: req.displayed,
            },
        )
        .await?;

    Ok(ApiResponse::ok(
        MemberResponse::from(profile),
        "Member updated successfully",
    ))
}

/// POST /members/upload-profile-photo (multipart `profilePhoto`)
pub async fn upload_profile_photo<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ClubResult<ApiResponse<MemberResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let form = FormData::read(multipart.map_err(AppError::from)?, PROFILE_PHOTO_FIELD).await?;

    let profile = state
        .members()
        .upload_profile_photo(&current.user_id, form.into_single_file()?)
        .await?;

    Ok(ApiResponse::ok(
        MemberResponse::from(profile),
        "Profile photo uploaded successfully",
    ))
}

/// PATCH /members/replace-profile-photo (multipart `profilePhoto`)
pub async fn replace_profile_photo<S, M>(
    State(state): State<ClubAppState<S, M>>,
    current: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ClubResult<ApiResponse<MemberResponse>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let form = FormData::read(multipart.map_err(AppError::from)?, PROFILE_PHOTO_FIELD).await?;

    let profile = state
        .members()
        .replace_profile_photo(&current.user_id, form.into_single_file()?)
        .await?;

    Ok(ApiResponse::ok(
        MemberResponse::from(profile),
        "Profile photo replaced successfully",
    ))
}

/// DELETE /members/delete/{memberId} (admin)
pub async fn delete_member<S, M>(
    State(state): State<ClubAppState<S, M>>,
    Path(member_id): Path<String>,
) -> ClubResult<ApiResponse<DeletionResponse<MemberResponse>>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let member_id = parse_id(&member_id, "member")?;
    let deleted = state.members().delete(&member_id).await?;

    Ok(ApiResponse::ok(
        DeletionResponse::new(member_id.into_uuid(), deleted),
        "Member deleted successfully",
    ))
}
