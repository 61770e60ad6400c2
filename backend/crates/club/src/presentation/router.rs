//! Club Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::models::user_role::UserRole;
use auth::{AuthMiddlewareState, require_auth, require_role};
use platform::media::MediaStore;

use crate::application::ClubConfig;
use crate::domain::repository::ClubStore;
use crate::presentation::handlers::{self, ClubAppState, TestimonialAppState};

/// Create the club routes (`/events`, `/photo`, `/likes`, `/testimonial`, `/members`)
///
/// Every route requires a session; admin-only routes additionally pass
/// through `require_role`.
pub fn club_router<S, M, R>(
    store: Arc<S>,
    media: Arc<M>,
    config: Arc<ClubConfig>,
    auth: AuthMiddlewareState<R>,
) -> Router
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let upload_limit = DefaultBodyLimit::max(config.multipart_body_limit());
    let testimonials = TestimonialAppState {
        store: store.clone(),
        users: auth.repo.clone(),
        config: config.clone(),
    };
    let state = ClubAppState {
        store,
        media,
        config,
    };

    Router::new()
        .nest("/events", events_routes::<S, M>(upload_limit.clone()))
        .nest("/photo", photo_routes::<S, M>(upload_limit.clone()))
        .nest("/likes", likes_routes::<S, M>())
        .nest(
            "/testimonial",
            testimonial_routes::<S, R>().with_state(testimonials),
        )
        .nest("/members", members_routes::<S, M>(upload_limit))
        .route_layer(from_fn_with_state(auth, require_auth::<R>))
        .with_state(state)
}

fn admin_only<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn_with_state(UserRole::Admin, require_role))
}

fn events_routes<S, M>(upload_limit: DefaultBodyLimit) -> Router<ClubAppState<S, M>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let admin = admin_only(
        Router::new()
            .route(
                "/create",
                post(handlers::create_event::<S, M>).layer(upload_limit),
            )
            .route("/delete/{event_id}", delete(handlers::delete_event::<S, M>)),
    );

    Router::new()
        .route("/all-events", get(handlers::all_events::<S, M>))
        .route("/get-events/{slug}", get(handlers::get_event::<S, M>))
        .route("/search", get(handlers::search_events::<S, M>))
        .merge(admin)
}

fn photo_routes<S, M>(upload_limit: DefaultBodyLimit) -> Router<ClubAppState<S, M>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    Router::new()
        .route("/all-photo", get(handlers::all_photos::<S, M>))
        .route("/get-photo/{photo_id}", get(handlers::get_photo::<S, M>))
        .route(
            "/create",
            post(handlers::create_photo::<S, M>).layer(upload_limit),
        )
        .route("/delete/{photo_id}", delete(handlers::delete_photo::<S, M>))
}

fn likes_routes<S, M>() -> Router<ClubAppState<S, M>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    Router::new()
        .route("/photo/{photo_id}", post(handlers::like_photo::<S, M>))
        .route("/event/{event_id}", post(handlers::like_event::<S, M>))
        .route(
            "/delete/photo/{photo_id}",
            delete(handlers::unlike_photo::<S, M>),
        )
        .route(
            "/delete/event/{event_id}",
            delete(handlers::unlike_event::<S, M>),
        )
}

fn testimonial_routes<S, U>() -> Router<TestimonialAppState<S, U>>
where
    S: ClubStore,
    U: UserRepository + Send + Sync + 'static,
{
    let admin = admin_only(
        Router::new()
            .route(
                "/all-testimonials",
                get(handlers::all_testimonials::<S, U>),
            )
            .route(
                "/delete-admin/{testimonial_id}",
                delete(handlers::delete_testimonial_admin::<S, U>),
            ),
    );

    Router::new()
        .route(
            "/post/{user_id}",
            get(handlers::testimonials_for_user::<S, U>),
        )
        .route("/create", post(handlers::create_testimonial::<S, U>))
        .route(
            "/delete/{testimonial_id}",
            delete(handlers::delete_own_testimonial::<S, U>),
        )
        .merge(admin)
}

fn members_routes<S, M>(upload_limit: DefaultBodyLimit) -> Router<ClubAppState<S, M>>
where
    S: ClubStore,
    M: MediaStore + Send + Sync + 'static,
{
    let admin = admin_only(
        Router::new()
            .route("/create", post(handlers::create_member::<S, M>))
            .route("/all-members", get(handlers::all_members::<S, M>))
            .route(
                "/delete/{member_id}",
                delete(handlers::delete_member::<S, M>),
            ),
    );

    Router::new()
        .route("/get-member", get(handlers::get_member::<S, M>))
        .route("/update", patch(handlers::update_member::<S, M>))
        .route(
            "/upload-profile-photo",
            post(handlers::upload_profile_photo::<S, M>).layer(upload_limit.clone()),
        )
        .route(
            "/replace-profile-photo",
            patch(handlers::replace_profile_photo::<S, M>).layer(upload_limit),
        )
        .merge(admin)
}
