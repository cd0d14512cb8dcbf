//! Media Server Port - 远程媒体服务器抽象
//!
//! 定义播放列表、元数据与缩略图的获取接口，具体实现在 infrastructure/adapters 层

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use thiserror::Error;

use crate::domain::playlist::TrackMetadata;

/// 媒体服务器错误
#[derive(Debug, Error)]
pub enum MediaServerError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    /// 远程返回非 2xx
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// 播放列表概要信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemotePlaylist {
    pub rating_key: String,
    pub title: String,
    /// 曲目数
    pub size: usize,
    pub duration_ms: u64,
}

/// 播放列表及其全部条目（按远程返回顺序）
#[derive(Debug, Clone, Default)]
pub struct RemotePlaylistItems {
    pub playlist: RemotePlaylist,
    pub items: Vec<TrackMetadata>,
}

/// 缩略图字节流
pub type ThumbnailStream = Pin<Box<dyn Stream<Item = Result<Bytes, MediaServerError>> + Send>>;

/// 缩略图响应
pub struct Thumbnail {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: ThumbnailStream,
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Media Server Port
///
/// 远程媒体服务器（Plex）的抽象接口。不做重试。
#[async_trait]
pub trait MediaServerPort: Send + Sync {
    /// 获取播放列表概要（标题、曲目数、总时长）
    async fn playlist(&self, rating_key: u64) -> Result<RemotePlaylist, MediaServerError>;

    /// 获取播放列表的全部条目
    async fn playlist_items(&self, rating_key: u64) -> Result<RemotePlaylistItems, MediaServerError>;

    /// 批量获取元数据，结果与 `rating_keys` 顺序一致
    async fn metadata(&self, rating_keys: &[String]) -> Result<Vec<TrackMetadata>, MediaServerError>;

    /// 获取缩略图
    ///
    /// 远程返回非 2xx 时为 `MediaServerError::Status`
    async fn thumbnail(&self, rating_key: &str, thumb_id: &str) -> Result<Thumbnail, MediaServerError>;

    /// 检查媒体服务器是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
