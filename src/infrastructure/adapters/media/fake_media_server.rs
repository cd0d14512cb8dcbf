//! Fake Media Server - 用于测试的内存媒体服务器
//!
//! 不发起任何网络请求，记录每一次调用

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::application::ports::{
    MediaServerError, MediaServerPort, RemotePlaylist, RemotePlaylistItems, Thumbnail,
};
use crate::domain::playlist::TrackMetadata;

/// 对 Fake Media Server 的一次调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Playlist(u64),
    PlaylistItems(u64),
    Metadata(Vec<String>),
    Thumbnail { rating_key: String, thumb_id: String },
}

#[derive(Debug, Clone)]
struct FakeThumbnail {
    data: Bytes,
    content_type: String,
}

/// Fake Media Server
///
/// - 播放列表通过 `with_playlist` 注册
/// - 元数据按 rating key 查找，未注册的 key 在结果中被跳过
/// - 未注册的缩略图返回 HTTP 404
/// - `with_latency` 让每次调用先等待一段时间
#[derive(Debug, Default)]
pub struct FakeMediaServer {
    playlists: HashMap<u64, RemotePlaylistItems>,
    metadata: HashMap<String, TrackMetadata>,
    thumbnails: HashMap<(String, String), FakeThumbnail>,
    unreachable: bool,
    latency: Option<Duration>,
    calls: Mutex<Vec<FakeCall>>,
}

impl FakeMediaServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册播放列表，条目的元数据同时登记为批量查询结果
    pub fn with_playlist(mut self, rating_key: u64, title: &str, items: Vec<TrackMetadata>) -> Self {
        for item in &items {
            self.metadata
                .entry(item.rating_key.clone())
                .or_insert_with(|| item.clone());
        }
        let playlist = RemotePlaylist {
            rating_key: rating_key.to_string(),
            title: title.to_string(),
            size: items.len(),
            duration_ms: items.iter().map(|i| i.duration_ms).sum(),
        };
        self.playlists
            .insert(rating_key, RemotePlaylistItems { playlist, items });
        self
    }

    /// 覆盖（或删除）某个 rating key 的批量查询元数据
    pub fn with_metadata(mut self, rating_key: &str, metadata: Option<TrackMetadata>) -> Self {
        match metadata {
            Some(m) => {
                self.metadata.insert(rating_key.to_string(), m);
            }
            None => {
                self.metadata.remove(rating_key);
            }
        }
        self
    }

    pub fn with_thumbnail(
        mut self,
        rating_key: &str,
        thumb_id: &str,
        data: impl Into<Bytes>,
        content_type: &str,
    ) -> Self {
        self.thumbnails.insert(
            (rating_key.to_string(), thumb_id.to_string()),
            FakeThumbnail {
                data: data.into(),
                content_type: content_type.to_string(),
            },
        );
        self
    }

    /// 所有请求都以网络错误失败
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// 每次调用在返回前等待 `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// 迄今为止记录的调用
    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    async fn record(&self, call: FakeCall) -> Result<(), MediaServerError> {
        self.calls.lock().push(call);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unreachable {
            return Err(MediaServerError::NetworkError(
                "fake media server is unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaServerPort for FakeMediaServer {
    async fn playlist(&self, rating_key: u64) -> Result<RemotePlaylist, MediaServerError> {
        self.record(FakeCall::Playlist(rating_key)).await?;
        self.playlists
            .get(&rating_key)
            .map(|p| p.playlist.clone())
            .ok_or_else(|| MediaServerError::NotFound(format!("playlist {}", rating_key)))
    }

    async fn playlist_items(&self, rating_key: u64) -> Result<RemotePlaylistItems, MediaServerError> {
        self.record(FakeCall::PlaylistItems(rating_key)).await?;
        self.playlists
            .get(&rating_key)
            .cloned()
            .ok_or_else(|| MediaServerError::NotFound(format!("playlist {}", rating_key)))
    }

    async fn metadata(&self, rating_keys: &[String]) -> Result<Vec<TrackMetadata>, MediaServerError> {
        self.record(FakeCall::Metadata(rating_keys.to_vec())).await?;
        Ok(rating_keys
            .iter()
            .filter_map(|key| self.metadata.get(key).cloned())
            .collect())
    }

    async fn thumbnail(&self, rating_key: &str, thumb_id: &str) -> Result<Thumbnail, MediaServerError> {
        self.record(FakeCall::Thumbnail {
            rating_key: rating_key.to_string(),
            thumb_id: thumb_id.to_string(),
        })
        .await?;

        let thumb = self
            .thumbnails
            .get(&(rating_key.to_string(), thumb_id.to_string()))
            .cloned()
            .ok_or_else(|| MediaServerError::Status {
                status: 404,
                message: "Not Found".to_string(),
            })?;

        Ok(Thumbnail {
            content_type: Some(thumb.content_type),
            content_length: Some(thumb.data.len() as u64),
            body: Box::pin(futures_util::stream::once(async move { Ok(thumb.data) })),
        })
    }

    async fn health_check(&self) -> bool {
        !self.unreachable
    }
}
