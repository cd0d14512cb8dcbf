//! Thumbnail Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{KeyCachePort, MediaServerError, MediaServerPort};
use crate::application::queries::{GetThumbnail, GetThumbnailResponse};

/// 缩略图路径的段数（`library/metadata/{id}/thumb/{timestamp}`）
const THUMB_PATH_SEGMENTS: usize = 5;

/// 拆解缩略图路径，返回 (rating key, thumb id)
///
/// `/library/metadata/10122/thumb/1705219286` → `("10122", "1705219286")`
pub fn split_thumb_path(path: &str) -> Option<(&str, &str)> {
    let segments: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();
    if segments.len() != THUMB_PATH_SEGMENTS {
        return None;
    }
    let (rating_key, thumb_id) = (segments[2], segments[4]);
    if rating_key.is_empty() || thumb_id.is_empty() {
        return None;
    }
    Some((rating_key, thumb_id))
}

/// GetThumbnail Handler - 通过混淆 token 代理缩略图
pub struct GetThumbnailHandler {
    key_cache: Arc<dyn KeyCachePort>,
    media_server: Arc<dyn MediaServerPort>,
}

impl GetThumbnailHandler {
    pub fn new(key_cache: Arc<dyn KeyCachePort>, media_server: Arc<dyn MediaServerPort>) -> Self {
        Self {
            key_cache,
            media_server,
        }
    }

    pub async fn handle(&self, query: GetThumbnail) -> Result<GetThumbnailResponse, ApplicationError> {
        if query.token.is_empty() || !query.token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ApplicationError::validation(format!(
                "Invalid thumbnail token: {}",
                query.token
            )));
        }

        let real = self
            .key_cache
            .resolve(&query.token)
            .ok_or_else(|| ApplicationError::UnknownToken(query.token.clone()))?;

        let (rating_key, thumb_id) = split_thumb_path(&real).ok_or_else(|| {
            tracing::warn!(token = %query.token, "Cached thumbnail reference has unexpected shape");
            ApplicationError::MalformedReference(query.token.clone())
        })?;

        let thumbnail = self
            .media_server
            .thumbnail(rating_key, thumb_id)
            .await
            .map_err(|e| {
                tracing::warn!(
                    token = %query.token,
                    rating_key = %rating_key,
                    thumb_id = %thumb_id,
                    error = %e,
                    "Could not fetch thumbnail"
                );
                match e {
                    MediaServerError::Status { .. } | MediaServerError::NotFound(_) => {
                        ApplicationError::RemoteNotFound(e.to_string())
                    }
                    other => ApplicationError::ExternalServiceError(other.to_string()),
                }
            })?;

        Ok(GetThumbnailResponse {
            rating_key: rating_key.to_string(),
            thumb_id: thumb_id.to_string(),
            thumbnail,
        })
    }
}
