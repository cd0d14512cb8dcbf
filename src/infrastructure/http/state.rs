//! Application State
//!
//! 所有 Query Handlers 与共享端口的应用状态

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{
    // Query handlers
    GetPlaylistPageHandler, GetThumbnailHandler, ListPlaylistsHandler,
    // Ports
    KeyCachePort, MediaServerPort, PlaylistCatalog,
};

/// 应用状态
///
/// Key Cache 由进程持有唯一实例，各 handler 只共享引用。
pub struct AppState {
    // ========== Ports ==========
    pub key_cache: Arc<dyn KeyCachePort>,
    pub media_server: Arc<dyn MediaServerPort>,
    pub catalog: Arc<PlaylistCatalog>,

    // ========== Pages ==========
    /// 静态文件目录
    pub static_dir: PathBuf,
    /// 写入页面头部注释的 LICENSE 文本
    pub license: Option<String>,

    // ========== Query Handlers ==========
    pub list_playlists_handler: ListPlaylistsHandler,
    pub playlist_page_handler: GetPlaylistPageHandler,
    pub thumbnail_handler: GetThumbnailHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        key_cache: Arc<dyn KeyCachePort>,
        media_server: Arc<dyn MediaServerPort>,
        catalog: PlaylistCatalog,
        static_dir: impl Into<PathBuf>,
        license: Option<String>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            // Ports
            key_cache: key_cache.clone(),
            media_server: media_server.clone(),
            catalog: catalog.clone(),

            // Pages
            static_dir: static_dir.into(),
            license,

            // Query handlers
            list_playlists_handler: ListPlaylistsHandler::new(catalog.clone(), media_server.clone()),
            playlist_page_handler: GetPlaylistPageHandler::new(
                catalog,
                media_server.clone(),
                key_cache.clone(),
            ),
            thumbnail_handler: GetThumbnailHandler::new(key_cache, media_server),
        }
    }
}
