//! 应用层 - 查询（读操作）
//!
//! 本服务只有读操作：播放列表页面、首页列表、缩略图代理

mod playlist_queries;
mod thumbnail_queries;

pub mod handlers;

pub use playlist_queries::*;
pub use thumbnail_queries::*;
