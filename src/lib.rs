//! Playlister - Plex 播放列表展示与缩略图代理
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Playlist Context: 播放列表摘要、曲目记录、展示格式化
//!
//! 应用层 (application/):
//! - Ports: 端口定义（KeyCache, MediaServer）
//! - Queries: 播放列表页面、首页列表、缩略图代理
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: HTML 页面 + 缩略图代理 + 静态文件
//! - Memory: KeyCache 内存实现
//! - Adapters: Plex Client

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
