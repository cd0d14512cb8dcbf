//! Playlist Context - 播放列表限界上下文
//!
//! 职责:
//! - 播放列表摘要与曲目记录
//! - 曲目主/副元数据的按位置合并
//! - 页面展示用的格式化规则（集数编码、IMDB 链接、时长）

mod entities;
mod errors;
mod formatters;

pub use entities::{pair_positionally, PlaylistOverview, PlaylistSummary, TrackMetadata, TrackRecord};
pub use errors::PlaylistError;
pub use formatters::{format_duration, format_episode_code, format_imdb_url, IMDB_SCHEME};
