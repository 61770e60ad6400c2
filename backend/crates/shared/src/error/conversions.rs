//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`],
//! and the single HTTP boundary that renders every failure envelope.

use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal("I/O operation failed").with_source(err)
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::bad_request("Invalid integer format").with_source(err)
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::bad_request("Invalid id").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// PostgreSQL SQLSTATE → ErrorKind
///
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
#[cfg(feature = "sqlx")]
pub fn kind_for_sqlstate(code: &str) -> ErrorKind {
    match code {
        // Class 23: Integrity Constraint Violation
        "23505" | "23503" | "23000" | "23001" => ErrorKind::Conflict,
        "23502" | "23514" => ErrorKind::BadRequest,
        // Class 42: Access Rule Violation
        "42501" => ErrorKind::Forbidden,
        // Class 53 / 57: Insufficient Resources, Operator Intervention
        "53000" | "53100" | "53200" | "53300" => ErrorKind::ServiceUnavailable,
        "57000" | "57014" | "57P01" | "57P02" | "57P03" => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::InternalServerError,
    }
}

/// Returns the violated constraint name if `err` is a unique violation (23505)
#[cfg(feature = "sqlx")]
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            Some(db_err.constraint().unwrap_or_default())
        }
        _ => None,
    }
}

/// Returns the violated constraint name if `err` is a foreign key violation (23503)
#[cfg(feature = "sqlx")]
pub fn foreign_key_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
            Some(db_err.constraint().unwrap_or_default())
        }
        _ => None,
    }
}

/// Classify a sqlx error without consuming it
#[cfg(feature = "sqlx")]
pub fn kind_for_sqlx_error(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => ErrorKind::ServiceUnavailable,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .map(|code| kind_for_sqlstate(code.as_ref()))
            .unwrap_or(ErrorKind::InternalServerError),
        _ => ErrorKind::InternalServerError,
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let kind = kind_for_sqlx_error(&err);
        let message = match (&err, kind) {
            (sqlx::Error::RowNotFound, _) => "Record not found",
            (sqlx::Error::PoolTimedOut, _) => "Database connection pool exhausted",
            (sqlx::Error::Io(_), _) => "Database connection error",
            (_, ErrorKind::Conflict) => "Duplicate or referenced record",
            (_, ErrorKind::BadRequest) => "Constraint violation",
            (_, ErrorKind::Forbidden) => "Insufficient privilege",
            (_, ErrorKind::ServiceUnavailable) => "Database unavailable",
            _ => "Database error",
        };
        AppError::new(kind, message).with_source(err)
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.to_envelope())).into_response()
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::bad_request("Invalid request body").with_error(rejection.body_text())
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        AppError::bad_request("Invalid path parameter").with_error(rejection.body_text())
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        AppError::bad_request("Invalid query string").with_error(rejection.body_text())
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::multipart::MultipartRejection> for AppError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        AppError::bad_request("Expected a multipart/form-data body").with_error(rejection.body_text())
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::bad_request("Invalid multipart body").with_error(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_parse_int_error_conversion() {
        let parse_err: Result<i32, _> = "abc".parse();
        let app_err: AppError = parse_err.unwrap_err().into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_uuid_error_conversion() {
        let err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let app_err: AppError = err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlstate_mapping() {
        assert_eq!(kind_for_sqlstate("23505"), ErrorKind::Conflict);
        assert_eq!(kind_for_sqlstate("23503"), ErrorKind::Conflict);
        assert_eq!(kind_for_sqlstate("23514"), ErrorKind::BadRequest);
        assert_eq!(kind_for_sqlstate("57P01"), ErrorKind::ServiceUnavailable);
        assert_eq!(kind_for_sqlstate("XX000"), ErrorKind::InternalServerError);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_row_not_found_is_404() {
        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.status_code(), 404);
    }
}
