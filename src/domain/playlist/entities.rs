//! Playlist Context - Entities

use super::errors::PlaylistError;
use super::formatters::{format_duration, format_episode_code, format_imdb_url};

/// 媒体服务器返回的单条曲目元数据
///
/// 播放列表条目（主元数据）和批量元数据查询结果（副元数据）共用此结构，
/// 副元数据通常额外携带 `guids`（如 `imdb://tt0000000`）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    /// 媒体服务器内部 rating key（如 "10122"）
    pub rating_key: String,
    /// 媒体服务器内部资源路径（如 "/library/metadata/10122"）
    pub key: String,
    pub title: String,
    /// 剧集所属节目名
    pub grandparent_title: Option<String>,
    /// 季编号，未设置为 0
    pub parent_index: u32,
    /// 集编号，未设置为 0
    pub index: u32,
    pub year: Option<u32>,
    pub duration_ms: u64,
    /// 原始缩略图路径（如 "/library/metadata/10122/thumb/1705219286"）
    pub thumb: Option<String>,
    /// 外部标识列表
    pub guids: Vec<String>,
}

impl TrackMetadata {
    /// 非空的缩略图路径
    pub fn thumb_path(&self) -> Option<&str> {
        self.thumb.as_deref().filter(|t| !t.is_empty())
    }
}

/// 合并后的曲目记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// 在播放列表中的位置（从 0 开始）
    pub position: usize,
    pub metadata: TrackMetadata,
    pub media_metadata: TrackMetadata,
    /// 曲目 key 的混淆 token，用作页面锚点
    pub obfuscated_key: String,
    /// 缩略图路径的混淆 token，没有缩略图时为 None
    pub obfuscated_thumb: Option<String>,
}

impl TrackRecord {
    /// 页面上显示的序号（从 1 开始）
    pub fn number(&self) -> usize {
        self.position + 1
    }

    pub fn episode_code(&self) -> String {
        format_episode_code(self.metadata.parent_index, self.metadata.index)
    }

    pub fn imdb_url(&self) -> String {
        format_imdb_url(&self.media_metadata.guids)
    }

    pub fn duration(&self) -> String {
        format_duration(self.metadata.duration_ms)
    }
}

/// 播放列表摘要（播放列表页面）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    /// 配置中的播放列表 key
    pub key: String,
    pub rating_key: String,
    pub title: String,
    pub size: usize,
    pub duration_ms: u64,
    pub tracks: Vec<TrackRecord>,
}

impl PlaylistSummary {
    pub fn duration(&self) -> String {
        format_duration(self.duration_ms)
    }
}

/// 播放列表概览（首页列表）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistOverview {
    pub key: String,
    pub title: String,
    pub size: usize,
    pub duration_ms: u64,
}

impl PlaylistOverview {
    pub fn duration(&self) -> String {
        format_duration(self.duration_ms)
    }
}

/// 按位置配对主元数据与副元数据
///
/// 两个列表必须等长，且每个位置上的 rating key 一致，否则整体失败。
pub fn pair_positionally(
    items: Vec<TrackMetadata>,
    metadata: Vec<TrackMetadata>,
) -> Result<Vec<(TrackMetadata, TrackMetadata)>, PlaylistError> {
    if items.len() != metadata.len() {
        return Err(PlaylistError::MetadataCountMismatch {
            items: items.len(),
            metadata: metadata.len(),
        });
    }

    items
        .into_iter()
        .zip(metadata)
        .enumerate()
        .map(|(position, (item, media))| {
            if item.rating_key != media.rating_key {
                return Err(PlaylistError::MetadataOrderMismatch {
                    position,
                    expected: item.rating_key,
                    actual: media.rating_key,
                });
            }
            Ok((item, media))
        })
        .collect()
}
