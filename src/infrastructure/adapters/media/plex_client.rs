//! Plex Client - 调用 Plex Media Server HTTP API
//!
//! 实现 MediaServerPort trait
//!
//! 使用的 Plex API:
//! GET /playlists/{ratingKey}                       播放列表概要
//! GET /playlists/{ratingKey}/items                 播放列表条目
//! GET /library/metadata/{k1,k2,...}?includeGuids=1 批量元数据（结果与请求顺序一致）
//! GET /library/metadata/{ratingKey}/thumb/{id}     缩略图
//!
//! 所有请求带 `X-Plex-Token` 头，JSON 响应。

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::application::ports::{
    MediaServerError, MediaServerPort, RemotePlaylist, RemotePlaylistItems, Thumbnail,
};
use crate::domain::playlist::TrackMetadata;

const PLEX_TOKEN_HEADER: &str = "X-Plex-Token";

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlexEnvelope {
    #[serde(rename = "MediaContainer")]
    media_container: PlexMediaContainer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlexMediaContainer {
    size: usize,
    leaf_count: Option<usize>,
    duration: u64,
    title: String,
    rating_key: String,
    #[serde(rename = "Metadata")]
    metadata: Vec<PlexMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlexMetadata {
    rating_key: String,
    key: String,
    title: String,
    grandparent_title: Option<String>,
    parent_index: u32,
    index: u32,
    year: Option<u32>,
    duration: u64,
    leaf_count: Option<usize>,
    thumb: Option<String>,
    #[serde(rename = "Guid")]
    guids: Vec<PlexGuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlexGuid {
    id: String,
}

impl From<PlexMetadata> for TrackMetadata {
    fn from(m: PlexMetadata) -> Self {
        Self {
            rating_key: m.rating_key,
            key: m.key,
            title: m.title,
            grandparent_title: m.grandparent_title,
            parent_index: m.parent_index,
            index: m.index,
            year: m.year,
            duration_ms: m.duration,
            thumb: m.thumb,
            guids: m.guids.into_iter().map(|g| g.id).collect(),
        }
    }
}

impl PlexMediaContainer {
    /// `/playlists/{id}` 的唯一条目即播放列表本身
    fn into_playlist(self, rating_key: u64) -> Result<RemotePlaylist, MediaServerError> {
        let playlist = self.metadata.into_iter().next().ok_or_else(|| {
            MediaServerError::NotFound(format!("playlist {} has no metadata", rating_key))
        })?;

        Ok(RemotePlaylist {
            rating_key: if playlist.rating_key.is_empty() {
                rating_key.to_string()
            } else {
                playlist.rating_key
            },
            title: playlist.title,
            size: playlist.leaf_count.unwrap_or_default(),
            duration_ms: playlist.duration,
        })
    }

    fn into_playlist_items(self, rating_key: u64) -> RemotePlaylistItems {
        let items: Vec<TrackMetadata> = self.metadata.into_iter().map(TrackMetadata::from).collect();
        let playlist = RemotePlaylist {
            rating_key: if self.rating_key.is_empty() {
                rating_key.to_string()
            } else {
                self.rating_key
            },
            title: self.title,
            size: self.leaf_count.unwrap_or(self.size.max(items.len())),
            duration_ms: if self.duration > 0 {
                self.duration
            } else {
                items.iter().map(|i| i.duration_ms).sum()
            },
        };
        RemotePlaylistItems { playlist, items }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Plex 客户端配置
#[derive(Debug, Clone)]
pub struct PlexClientConfig {
    /// Plex 服务器基础 URL
    pub base_url: String,
    /// Plex 访问 token
    pub token: String,
    /// 请求超时时间（秒），None 时使用 reqwest 默认值（不超时）
    pub timeout_secs: Option<u64>,
}

impl Default for PlexClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:32400".to_string(),
            token: String::new(),
            timeout_secs: None,
        }
    }
}

impl PlexClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Plex 客户端
pub struct PlexClient {
    client: Client,
    config: PlexClientConfig,
}

impl PlexClient {
    /// 创建新的 Plex 客户端
    pub fn new(config: PlexClientConfig) -> Result<Self, MediaServerError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| MediaServerError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn playlist_url(&self, rating_key: u64) -> String {
        self.url(&format!("/playlists/{}", rating_key))
    }

    fn playlist_items_url(&self, rating_key: u64) -> String {
        self.url(&format!("/playlists/{}/items", rating_key))
    }

    fn metadata_url(&self, rating_keys: &[String]) -> String {
        self.url(&format!("/library/metadata/{}?includeGuids=1", rating_keys.join(",")))
    }

    fn thumbnail_url(&self, rating_key: &str, thumb_id: &str) -> String {
        self.url(&format!("/library/metadata/{}/thumb/{}", rating_key, thumb_id))
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header(PLEX_TOKEN_HEADER, &self.config.token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, MediaServerError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MediaServerError::Timeout
            } else if e.is_connect() {
                MediaServerError::NetworkError(format!("Cannot connect to Plex server: {}", e))
            } else {
                MediaServerError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MediaServerError::Status {
                status: status.as_u16(),
                message: if message.is_empty() {
                    status.canonical_reason().unwrap_or_default().to_string()
                } else {
                    message
                },
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MediaServerError> {
        tracing::debug!(url = %url, "Sending Plex request");

        let response = self
            .send(self.get(url).header(ACCEPT, "application/json"))
            .await?;

        response
            .json::<T>()
            .await
            .map_err(|e| MediaServerError::InvalidResponse(e.to_string()))
    }

    async fn get_container(&self, url: &str) -> Result<PlexMediaContainer, MediaServerError> {
        Ok(self.get_json::<PlexEnvelope>(url).await?.media_container)
    }
}

#[async_trait]
impl MediaServerPort for PlexClient {
    async fn playlist(&self, rating_key: u64) -> Result<RemotePlaylist, MediaServerError> {
        self.get_container(&self.playlist_url(rating_key))
            .await?
            .into_playlist(rating_key)
    }

    async fn playlist_items(&self, rating_key: u64) -> Result<RemotePlaylistItems, MediaServerError> {
        let container = self.get_container(&self.playlist_items_url(rating_key)).await?;
        let playlist = container.into_playlist_items(rating_key);

        tracing::debug!(
            rating_key = rating_key,
            items = playlist.items.len(),
            "Plex playlist items fetched"
        );

        Ok(playlist)
    }

    async fn metadata(&self, rating_keys: &[String]) -> Result<Vec<TrackMetadata>, MediaServerError> {
        let container = self.get_container(&self.metadata_url(rating_keys)).await?;
        Ok(container
            .metadata
            .into_iter()
            .map(TrackMetadata::from)
            .collect())
    }

    async fn thumbnail(&self, rating_key: &str, thumb_id: &str) -> Result<Thumbnail, MediaServerError> {
        let response = self
            .send(self.get(&self.thumbnail_url(rating_key, thumb_id)))
            .await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();

        let body = response
            .bytes_stream()
            .map_err(|e| MediaServerError::NetworkError(e.to_string()));

        Ok(Thumbnail {
            content_type,
            content_length,
            body: Box::pin(body),
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .get(&self.url("/identity"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
