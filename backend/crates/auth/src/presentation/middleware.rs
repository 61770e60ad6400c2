//! Auth Middleware
//!
//! Middleware for requiring authentication on protected routes.
//!
//! ## Usage
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/admin-only", get(handler))
//!     .route_layer(from_fn_with_state(UserRole::Admin, require_role))
//!     .route_layer(from_fn_with_state(mw_state, require_auth::<Repo>));
//! ```
//! Layers run bottom-up, so `require_auth` always runs before `require_role`.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, OptionalFromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::config::{ACCESS_TOKEN_COOKIE, AuthConfig};
use crate::application::token_service::TokenService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, user_role::UserRole};
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthMiddlewareState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }
}

/// Authenticated caller, stored in request extensions by [`require_auth`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Middleware that requires a valid access token
///
/// The token comes from the `accessToken` cookie, else the bearer header.
/// The user is loaded so that deleted accounts are rejected and the stored
/// role is used.
pub async fn require_auth<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_token(req.headers(), ACCESS_TOKEN_COOKIE)
        .ok_or(AuthError::Unauthorized)?;

    let tokens = TokenService::new(state.repo.clone(), state.config.clone());
    let user_id = tokens.subject(&token)?;

    let user = state
        .repo
        .find_by_id(&user_id)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser {
        user_id: user.user_id,
        role: user.user_role,
    });

    Ok(next.run(req).await)
}

/// Second gate: the authenticated caller must hold `role`
///
/// Used with `from_fn_with_state(role, require_role)`.
pub async fn require_role(
    State(role): State<UserRole>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let current = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AuthError::Unauthorized)?;

    if current.role != role {
        tracing::debug!(
            user_id = %current.user_id,
            required = %role,
            actual = %current.role,
            "Role check failed"
        );
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AuthError::Unauthorized)
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().copied())
    }
}
