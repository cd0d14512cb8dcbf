//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::application::{CatalogEntry, PlaylistCatalog};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// Plex 媒体服务器配置
    #[serde(default)]
    pub plex: PlexConfig,

    /// Key Cache 配置
    #[serde(default)]
    pub key_cache: KeyCacheConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,

    /// 对外暴露的播放列表（key → 配置）
    #[serde(default)]
    pub playlists: HashMap<String, PlaylistConfig>,
}

impl AppConfig {
    /// 构建播放列表目录
    pub fn catalog(&self) -> PlaylistCatalog {
        PlaylistCatalog::new(self.playlists.iter().map(|(key, playlist)| CatalogEntry {
            key: key.clone(),
            rating_key: playlist.rating_key,
            visible: playlist.visible,
        }))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件目录（挂载在 /static）
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// LICENSE 文件路径，内容以 HTML 注释形式写入每个页面
    #[serde(default)]
    pub license_path: Option<PathBuf>,

    /// 优雅关闭超时（秒），超时后强制退出
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_shutdown_timeout() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            license_path: None,
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Plex 媒体服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlexConfig {
    /// Plex 服务器基础 URL
    #[serde(default = "default_plex_url")]
    pub url: String,

    /// Plex 访问 token
    #[serde(default)]
    pub token: String,

    /// 请求超时时间（秒），不设置则不超时
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_plex_url() -> String {
    "http://localhost:32400".to_string()
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            url: default_plex_url(),
            token: String::new(),
            timeout_secs: None,
        }
    }
}

impl PlexConfig {
    /// 打印用的 token（只保留末尾 4 位）
    pub fn masked_token(&self) -> String {
        let len = self.token.chars().count();
        if len <= 4 {
            return "*".repeat(len);
        }
        let tail: String = self.token.chars().skip(len - 4).collect();
        format!("****{}", tail)
    }
}

/// Key Cache 配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyCacheConfig {
    /// token 派生用的盐，不设置则不加盐
    #[serde(default)]
    pub salt: Option<String>,
}

impl KeyCacheConfig {
    /// 非空的盐
    pub fn salt(&self) -> Option<String> {
        self.salt.clone().filter(|s| !s.is_empty())
    }
}

/// 单个播放列表配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistConfig {
    /// Plex 播放列表 rating key
    pub rating_key: u64,

    /// 是否出现在首页
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
