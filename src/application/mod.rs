//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（KeyCache、MediaServer）
//! - queries: 查询及处理器（播放列表页面、首页列表、缩略图代理）
//! - catalog: 配置中暴露的播放列表目录
//! - error: 应用层错误定义

pub mod catalog;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use catalog::{CatalogEntry, PlaylistCatalog};

pub use error::ApplicationError;

pub use ports::{
    // Key cache
    KeyCachePort,
    // Media server
    MediaServerError,
    MediaServerPort,
    RemotePlaylist,
    RemotePlaylistItems,
    Thumbnail,
    ThumbnailStream,
};

pub use queries::{
    // Playlist queries
    GetPlaylistPage,
    ListPlaylists,
    // Thumbnail queries
    GetThumbnail,
    GetThumbnailResponse,
    // Handlers
    handlers::{
        split_thumb_path, GetPlaylistPageHandler, GetThumbnailHandler, ListPlaylistsHandler,
        PlaylistMerger,
    },
};
