//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::kind_for_sqlx_error, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input failed validation; one entry per broken rule
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// User name already exists
    #[error("Username is already taken")]
    UserNameTaken,

    /// Email already registered
    #[error("Email is already registered")]
    EmailTaken,

    /// Admin registration without a valid key
    #[error("Invalid admin key")]
    InvalidAdminKey,

    /// Wrong identifier or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed or expired access token
    #[error("Unauthorized")]
    Unauthorized,

    /// Refresh token failed verification or is not the current one
    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    /// Authenticated but lacking the role or ownership
    #[error("Forbidden")]
    Forbidden,

    /// Error raised by a collaborator, already classified
    #[error(transparent)]
    App(#[from] AppError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation(vec![message.into()])
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::UserNameTaken
            | AuthError::EmailTaken
            | AuthError::InvalidAdminKey => ErrorKind::BadRequest,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::InvalidCredentials
            | AuthError::Unauthorized
            | AuthError::InvalidRefreshToken => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::App(e) => e.kind(),
            AuthError::Database(e) => kind_for_sqlx_error(e),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(errors) => {
                AppError::bad_request("Validation failed").with_errors(errors.iter().cloned())
            }
            AuthError::App(e) => {
                AppError::new(e.kind(), e.message().to_string()).with_errors(e.errors().to_vec())
            }
            // 内部情報はレスポンスに出さない
            AuthError::Database(_) | AuthError::Internal(_) if self.kind().is_server_error() => {
                AppError::new(self.kind(), "Something went wrong")
            }
            AuthError::Database(_) => AppError::new(self.kind(), "Database constraint violated"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::App(e) if e.is_server_error() => {
                tracing::error!(error = ?e, "Auth dependency error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidRefreshToken => {
                tracing::warn!("Rejected refresh token");
            }
            AuthError::InvalidAdminKey => {
                tracing::warn!("Admin registration with invalid key");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        err.to_app_error()
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::jwt::TokenError> for AuthError {
    fn from(err: platform::jwt::TokenError) -> Self {
        match err {
            platform::jwt::TokenError::Signing(msg) => AuthError::Internal(msg),
            _ => AuthError::Unauthorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(AuthError::UserNameTaken.status_code(), 400);
        assert_eq!(AuthError::InvalidAdminKey.status_code(), 400);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::InvalidRefreshToken.status_code(), 401);
        assert_eq!(AuthError::Forbidden.status_code(), 403);
        assert_eq!(AuthError::UserNotFound.status_code(), 404);
        assert_eq!(AuthError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_validation_envelope_lists_errors() {
        let err = AuthError::Validation(vec!["a".into(), "b".into()]);
        let body = err.to_app_error().to_envelope();
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_internal_details_hidden() {
        let body = AuthError::Internal("secret detail".into())
            .to_app_error()
            .to_envelope();
        assert_eq!(body["message"], "Something went wrong");
    }

    #[test]
    fn test_app_error_passthrough() {
        let err: AuthError = AppError::conflict("already liked").into();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.to_app_error().message(), "already liked");
    }
}
