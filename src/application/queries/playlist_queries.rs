//! Playlist Queries - 播放列表查询

/// 获取播放列表页面数据
#[derive(Debug, Clone)]
pub struct GetPlaylistPage {
    /// 配置中的播放列表 key
    pub key: String,
}

/// 列出所有可见播放列表（首页）
#[derive(Debug, Clone, Default)]
pub struct ListPlaylists;
