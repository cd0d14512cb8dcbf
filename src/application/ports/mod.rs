//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod key_cache;
mod media_server;

pub use key_cache::KeyCachePort;
pub use media_server::{
    MediaServerError, MediaServerPort, RemotePlaylist, RemotePlaylistItems, Thumbnail,
    ThumbnailStream,
};
