//! Page Handlers - 首页与播放列表页面

use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::application::{GetPlaylistPage, ListPlaylists};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;
use crate::infrastructure::http::views;

/// 首页
pub async fn index_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let playlists = state.list_playlists_handler.handle(ListPlaylists).await?;
    views::render_page(state.license.as_deref(), |out| {
        views::write_index(out, &playlists)
    })
}

/// 播放列表页面，每个配置的播放列表 key 注册一条路由
pub async fn playlist_page(state: Arc<AppState>, key: String) -> Result<Html<String>, ApiError> {
    let playlist = state
        .playlist_page_handler
        .handle(GetPlaylistPage { key })
        .await?;

    views::render_page(state.license.as_deref(), |out| {
        views::write_playlist(out, &playlist)
    })
}
