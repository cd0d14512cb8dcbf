//! Ping Handler
//!
//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    /// `ok`，媒体服务器不可达时为 `degraded`
    pub status: &'static str,
    pub version: &'static str,
    /// 媒体服务器是否可达
    pub remote_reachable: bool,
    /// 已配置的播放列表数
    pub playlists: usize,
    /// Key Cache 中的映射数
    pub cached_keys: usize,
}

/// Ping endpoint - 健康检查
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let remote_reachable = state.media_server.health_check().await;
    if !remote_reachable {
        tracing::warn!("Media server health check failed");
    }

    Json(PingResponse {
        status: if remote_reachable { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        remote_reachable,
        playlists: state.catalog.len(),
        cached_keys: state.key_cache.len(),
    })
}
