//! HTTP Error Handling
//!
//! 错误统一映射为 HTTP 状态码 + 纯文本响应体

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::ApplicationError;

/// 缩略图相关错误对外统一使用的消息，不泄露远程错误细节
pub const TRACK_NOT_FOUND: &str = "Track Not Found";

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 缩略图请求的错误映射：404/400 都使用固定消息
    pub fn from_thumbnail_error(e: ApplicationError) -> Self {
        match e {
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::ExternalServiceError(_) => {
                ApiError::BadRequest("Could not fetch thumbnail".to_string())
            }
            e if e.is_not_found() => ApiError::NotFound(TRACK_NOT_FOUND.to_string()),
            e => ApiError::from(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::NotFound(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Resource not found");
                msg
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Bad request");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(status = status.as_u16(), error = %msg, "Internal server error");
                msg
            }
        };

        (status, message).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::RemoteNotFound(msg) => ApiError::NotFound(msg),
            ApplicationError::MalformedReference(_) | ApplicationError::UnknownToken(_) => {
                ApiError::NotFound(TRACK_NOT_FOUND.to_string())
            }
            ApplicationError::PlaylistNotConfigured(key) => {
                ApiError::NotFound(format!("Playlist not found: {}", key))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<std::fmt::Error> for ApiError {
    fn from(_: std::fmt::Error) -> Self {
        ApiError::Internal("Failed to render page".to_string())
    }
}
