//! Thumbnail Handler - 缩略图代理

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
};
use http::{header, StatusCode};

use crate::application::GetThumbnail;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 缩略图缓存时间：一个月
pub const THUMBNAIL_CACHE_CONTROL: &str = "max-age=2629800";

/// 通过混淆 token 代理缩略图，响应体原样流式转发
pub async fn playlist_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let result = state
        .thumbnail_handler
        .handle(GetThumbnail { token })
        .await
        .map_err(ApiError::from_thumbnail_error)?;

    tracing::debug!(
        rating_key = %result.rating_key,
        thumb_id = %result.thumb_id,
        "Proxying thumbnail"
    );

    let thumbnail = result.thumbnail;
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CACHE_CONTROL, THUMBNAIL_CACHE_CONTROL);
    if let Some(content_type) = &thumbnail.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    if let Some(length) = thumbnail.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    builder
        .body(Body::from_stream(thumbnail.body))
        .map_err(|e| ApiError::Internal(format!("Failed to build thumbnail response: {}", e)))
}
