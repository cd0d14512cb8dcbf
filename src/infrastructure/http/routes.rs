//! HTTP Routes
//!
//! Endpoints:
//! - /                           GET  首页（可见播放列表）
//! - /static/*                   GET  静态文件（限定在静态目录内）
//! - /playlist/{key}             GET  播放列表页面（每个配置的 key 一条路由）
//! - /playlist/thumb/{token}     GET  缩略图代理
//! - /api/ping                   GET  健康检查

use axum::{extract::State, routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(state: &AppState) -> Router<Arc<AppState>> {
    let mut router = Router::new()
        .route("/", get(handlers::index_page))
        .route("/playlist/thumb/:token", get(handlers::playlist_thumbnail))
        .route("/api/ping", get(handlers::ping))
        .nest_service("/static", ServeDir::new(&state.static_dir));

    for key in state.catalog.keys() {
        let key = key.to_string();
        router = router.route(
            &format!("/playlist/{}", key),
            get(move |State(state): State<Arc<AppState>>| handlers::playlist_page(state, key)),
        );
    }

    router
}
