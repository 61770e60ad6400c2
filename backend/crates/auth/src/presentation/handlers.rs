//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{AppendHeaders, IntoResponse};
use kernel::response::ApiResponse;
use std::sync::Arc;

use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};

use crate::application::config::{AuthConfig, REFRESH_TOKEN_COOKIE};
use crate::application::token_service::{TokenPair, parse_user_id};
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, DeleteUserUseCase, RefreshUseCase, RegisterInput,
    RegisterUseCase, SignInInput, SignInUseCase, SignOutUseCase, UpdateEmailUseCase, UserQueries,
};
use crate::domain::cascade::UserCascade;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest,
    UpdateUserRequest, UserResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, C>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub cascade: Arc<C>,
    pub config: Arc<AuthConfig>,
}

fn token_cookies(
    config: &AuthConfig,
    tokens: &TokenPair,
) -> AppendHeaders<[(header::HeaderName, header::HeaderValue); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            set_cookie_header(&config.access_cookie(), &tokens.access_token),
        ),
        (
            header::SET_COOKIE,
            set_cookie_header(&config.refresh_cookie(), &tokens.refresh_token),
        ),
    ])
}

fn clear_cookies(config: &AuthConfig) -> AppendHeaders<[(header::HeaderName, header::HeaderValue); 2]> {
    AppendHeaders([
        (header::SET_COOKIE, delete_cookie_header(&config.access_cookie())),
        (header::SET_COOKIE, delete_cookie_header(&config.refresh_cookie())),
    ])
}

// ============================================================================
// Register / Login
// ============================================================================

/// POST /users/register
pub async fn register<R, C>(
    State(state): State<AuthAppState<R, C>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let input = RegisterInput {
        user_name: req.username,
        email: req.email,
        password: req.password,
        role: req.role,
        admin_key: req.key,
    };

    let user = use_case.execute(input).await?;

    Ok(ApiResponse::created(
        UserResponse::from(user),
        "User registered successfully",
    ))
}

/// POST /users/login
pub async fn login<R, C>(
    State(state): State<AuthAppState<R, C>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            identifier: req.username_or_email,
            password: req.password,
        })
        .await?;

    let cookies = token_cookies(&state.config, &output.tokens);

    Ok((
        cookies,
        ApiResponse::ok(
            LoginResponse {
                user: UserResponse::from(&output.user),
                access_token: output.tokens.access_token,
                refresh_token: output.tokens.refresh_token,
            },
            "User logged in successfully",
        ),
    ))
}

/// POST /users/logout
pub async fn logout<R, C>(
    State(state): State<AuthAppState<R, C>>,
    current: CurrentUser,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
    use_case.execute(&current.user_id).await?;

    Ok((
        clear_cookies(&state.config),
        ApiResponse::ok(serde_json::json!({}), "User logged out successfully"),
    ))
}

/// POST /users/generate-token
///
/// Refresh token from the `refreshToken` cookie, else from the JSON body.
pub async fn generate_token<R, C>(
    State(state): State<AuthAppState<R, C>>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let incoming = extract_cookie(&headers, REFRESH_TOKEN_COOKIE)
        .or_else(|| body.and_then(|Json(b)| b.refresh_token));

    let use_case = RefreshUseCase::new(state.repo.clone(), state.config.clone());
    let (user, tokens) = use_case.execute(incoming).await?;

    let cookies = token_cookies(&state.config, &tokens);

    Ok((
        cookies,
        ApiResponse::ok(
            LoginResponse {
                user: UserResponse::from(&user),
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
            "Access token refreshed",
        ),
    ))
}

// ============================================================================
// Account
// ============================================================================

/// POST /users/change-password
pub async fn change_password<R, C>(
    State(state): State<AuthAppState<R, C>>,
    current: CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<ApiResponse<serde_json::Value>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());
    use_case
        .execute(
            &current.user_id,
            ChangePasswordInput {
                old_password: req.old_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

/// GET /users/get-user
pub async fn get_user<R, C>(
    State(state): State<AuthAppState<R, C>>,
    current: CurrentUser,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let user = UserQueries::new(state.repo.clone())
        .get(&current.user_id)
        .await?;

    Ok(ApiResponse::ok(UserResponse::from(user), "User fetched successfully"))
}

/// PATCH /users/update-user-details
pub async fn update_user_details<R, C>(
    State(state): State<AuthAppState<R, C>>,
    current: CurrentUser,
    Json(req): Json<UpdateUserRequest>,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let use_case = UpdateEmailUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.execute(&current.user_id, req.email).await?;

    Ok(ApiResponse::ok(
        UserResponse::from(user),
        "Account details updated successfully",
    ))
}

/// DELETE /users/delete
pub async fn delete_self<R, C>(
    State(state): State<AuthAppState<R, C>>,
    current: CurrentUser,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let use_case = DeleteUserUseCase::new(state.repo.clone(), state.cascade.clone());
    use_case.execute(&current.user_id).await?;

    Ok((
        clear_cookies(&state.config),
        ApiResponse::ok(serde_json::json!({}), "User deleted successfully"),
    ))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /users/all-users
pub async fn all_users<R, C>(
    State(state): State<AuthAppState<R, C>>,
) -> AuthResult<ApiResponse<Vec<UserResponse>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let users = UserQueries::new(state.repo.clone()).list().await?;

    Ok(ApiResponse::ok(
        users.iter().map(UserResponse::from).collect(),
        "Users fetched successfully",
    ))
}

/// DELETE /users/admin-delete/{userId}
pub async fn admin_delete<R, C>(
    State(state): State<AuthAppState<R, C>>,
    Path(user_id): Path<String>,
) -> AuthResult<ApiResponse<serde_json::Value>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    C: UserCascade + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&user_id)?;

    let use_case = DeleteUserUseCase::new(state.repo.clone(), state.cascade.clone());
    use_case.execute(&user_id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({ "userId": user_id }),
        "User deleted successfully",
    ))
}
