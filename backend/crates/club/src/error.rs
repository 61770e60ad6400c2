//! Club Error Types
//!
//! Club-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::kind_for_sqlx_error, kind::ErrorKind};
use platform::media::MediaError;
use thiserror::Error;

/// Club-specific result type alias
pub type ClubResult<T> = Result<T, ClubError>;

/// Club-specific error variants
#[derive(Debug, Error)]
pub enum ClubError {
    /// Input failed validation; one entry per broken rule
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Event not found")]
    EventNotFound,

    #[error("Photo not found")]
    PhotoNotFound,

    #[error("Member not found")]
    MemberNotFound,

    #[error("Testimonial not found")]
    TestimonialNotFound,

    #[error("Like not found")]
    LikeNotFound,

    /// Referenced user does not exist
    #[error("User not found")]
    UserNotFound,

    /// Second like on the same target by the same user
    #[error("Already liked")]
    AlreadyLiked,

    /// Uniqueness or referential conflict
    #[error("{0}")]
    Conflict(String),

    /// Event slug collided at insert time; retried by the event write path
    #[error("Event slug already taken")]
    SlugTaken,

    /// Caller lacks ownership or role
    #[error("{0}")]
    Forbidden(String),

    /// Records are gone but the remote assets could not all be removed
    #[error("{resource} {action} but asset cleanup failed")]
    AssetCleanup {
        resource: &'static str,
        action: &'static str,
        failures: Vec<String>,
    },

    /// Remote media store failure
    #[error(transparent)]
    ExternalService(#[from] MediaError),

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

impl ClubError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClubError::Validation(vec![message.into()])
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ClubError::Forbidden(message.into())
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClubError::Validation(_) => ErrorKind::BadRequest,
            ClubError::EventNotFound
            | ClubError::PhotoNotFound
            | ClubError::MemberNotFound
            | ClubError::TestimonialNotFound
            | ClubError::LikeNotFound
            | ClubError::UserNotFound => ErrorKind::NotFound,
            ClubError::AlreadyLiked | ClubError::Conflict(_) | ClubError::SlugTaken => {
                ErrorKind::Conflict
            }
            ClubError::Forbidden(_) => ErrorKind::Forbidden,
            ClubError::AssetCleanup { .. } | ClubError::ExternalService(_) => {
                ErrorKind::InternalServerError
            }
            ClubError::App(e) => e.kind(),
            ClubError::Database(e) => kind_for_sqlx_error(e),
            ClubError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            ClubError::Validation(errors) => {
                AppError::bad_request("Validation failed").with_errors(errors.iter().cloned())
            }
            ClubError::App(e) => {
                AppError::new(e.kind(), e.message().to_string()).with_errors(e.errors().to_vec())
            }
            ClubError::AssetCleanup { .. } => AppError::new(self.kind(), self.to_string()),
            ClubError::ExternalService(_) => {
                AppError::new(self.kind(), "Media store request failed")
            }
            // 内部情報はレスポンスに出さない
            ClubError::Database(_) | ClubError::Internal(_) if self.kind().is_server_error() => {
                AppError::new(self.kind(), "Something went wrong")
            }
            ClubError::Database(_) => AppError::new(self.kind(), "Database constraint violated"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ClubError::Database(e) => {
                tracing::error!(error = %e, "Club database error");
            }
            ClubError::Internal(msg) => {
                tracing::error!(message = %msg, "Club internal error");
            }
            ClubError::ExternalService(e) => {
                tracing::error!(error = %e, "Media store error");
            }
            ClubError::AssetCleanup {
                resource,
                action,
                failures,
            } => {
                tracing::warn!(resource, action, failures = ?failures, "Asset cleanup failed");
            }
            ClubError::App(e) if e.is_server_error() => {
                tracing::error!(error = ?e, "Club dependency error");
            }
            _ => {
                tracing::debug!(error = %self, "Club error");
            }
        }
    }
}

impl IntoResponse for ClubError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<ClubError> for AppError {
    fn from(err: ClubError) -> Self {
        err.log();
        err.to_app_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ClubError::validation("x").status_code(), 400);
        assert_eq!(ClubError::forbidden("x").status_code(), 403);
        assert_eq!(ClubError::PhotoNotFound.status_code(), 404);
        assert_eq!(ClubError::AlreadyLiked.status_code(), 409);
        assert_eq!(
            ClubError::ExternalService(MediaError::EmptyUpload).status_code(),
            500
        );
    }

    #[test]
    fn test_asset_cleanup_message() {
        let err = ClubError::AssetCleanup {
            resource: "Event",
            action: "deleted",
            failures: vec!["abc".into()],
        };
        let body = err.to_app_error().to_envelope();
        assert_eq!(body["statusCode"], 500);
        assert_eq!(body["message"], "Event deleted but asset cleanup failed");
    }

    #[test]
    fn test_already_liked_message() {
        let body = ClubError::AlreadyLiked.to_app_error().to_envelope();
        assert_eq!(body["message"], "Already liked");
        assert_eq!(body["success"], false);
    }
}
