//! Success envelope
//!
//! 成功レスポンスは常に `{statusCode, data, message, success: true}` の形です。
//! 失敗側は [`crate::error::app_error::AppError::to_envelope`] を参照。

use std::borrow::Cow;

use serde::Serialize;

/// 成功レスポンスのエンベロープ
///
/// ## Examples
/// ```rust
/// use kernel::response::ApiResponse;
///
/// let res = ApiResponse::created(42, "Like added");
/// assert_eq!(res.status_code(), 201);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    status_code: u16,
    data: T,
    message: Cow<'static, str>,
    success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(status_code: u16, data: T, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: status_code < 400,
        }
    }

    /// 200 OK
    pub fn ok(data: T, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(200, data, message)
    }

    /// 201 Created
    pub fn created(data: T, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(201, data, message)
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
