//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::cascade::{NoCascade, UserCascade};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth, require_role};

/// Create the `/users` router with PostgreSQL repository and no cascade
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(Arc::new(repo), NoCascade, Arc::new(config))
}

/// Create the `/users` router for any repository and cascade implementation
pub fn auth_router_generic<R, C>(repo: Arc<R>, cascade: C, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: repo.clone(),
        cascade: Arc::new(cascade),
        config: config.clone(),
    };
    let mw_state = AuthMiddlewareState::new(repo, config);

    let public = Router::new()
        .route("/register", post(handlers::register::<R, C>))
        .route("/login", post(handlers::login::<R, C>))
        .route("/generate-token", post(handlers::generate_token::<R, C>));

    let admin = Router::new()
        .route("/all-users", get(handlers::all_users::<R, C>))
        .route("/admin-delete/{user_id}", delete(handlers::admin_delete::<R, C>))
        .route_layer(from_fn_with_state(UserRole::Admin, require_role));

    let protected = Router::new()
        .route("/logout", post(handlers::logout::<R, C>))
        .route("/change-password", post(handlers::change_password::<R, C>))
        .route("/get-user", get(handlers::get_user::<R, C>))
        .route("/update-user-details", patch(handlers::update_user_details::<R, C>))
        .route("/delete", delete(handlers::delete_self::<R, C>))
        .merge(admin)
        .route_layer(from_fn_with_state(mw_state, require_auth::<R>));

    public.merge(protected).with_state(state)
}
