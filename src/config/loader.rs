//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（playlister.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["playlister", "playlister.local"];

/// 保留的播放列表 key（与缩略图路由冲突）
const RESERVED_PLAYLIST_KEYS: &[&str] = &["thumb"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `PLAYLISTER_`，层级分隔符 `__`）
/// 2. 配置文件（playlister.toml 或 playlister.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `PLAYLISTER_SERVER__PORT=8080`
/// - `PLAYLISTER_PLEX__URL=http://plex:32400`
/// - `PLAYLISTER_PLEX__TOKEN=xxxx`
/// - `PLAYLISTER_KEY_CACHE__SALT=yyyy`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.static_dir", "static")?
        .set_default("server.shutdown_timeout_secs", 5)?
        .set_default("plex.url", "http://localhost:32400")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），例如: PLAYLISTER_PLEX__TOKEN=xxxx
    builder = builder.add_source(
        Environment::with_prefix("PLAYLISTER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.plex.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Plex URL cannot be empty".to_string(),
        ));
    }

    if config.plex.token.is_empty() {
        return Err(ConfigError::ValidationError(
            "Plex token cannot be empty".to_string(),
        ));
    }

    if config.playlists.is_empty() {
        return Err(ConfigError::ValidationError(
            "At least one playlist must be configured".to_string(),
        ));
    }

    for key in config.playlists.keys() {
        validate_playlist_key(key)?;
    }

    Ok(())
}

/// 播放列表 key 会直接出现在 URL 中
fn validate_playlist_key(key: &str) -> Result<(), ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::ValidationError(
            "Playlist key cannot be empty".to_string(),
        ));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(ConfigError::ValidationError(format!(
            "Playlist key '{}' may only contain a-z, 0-9, '-' and '_'",
            key
        )));
    }

    if RESERVED_PLAYLIST_KEYS.contains(&key) {
        return Err(ConfigError::ValidationError(format!(
            "Playlist key '{}' is reserved",
            key
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Static Directory: {:?}", config.server.static_dir);
    tracing::info!("License: {:?}", config.server.license_path);
    tracing::info!("Plex URL: {}", config.plex.url);
    tracing::info!("Plex Token: {}", config.plex.masked_token());
    match config.plex.timeout_secs {
        Some(secs) => tracing::info!("Plex Timeout: {}s", secs),
        None => tracing::info!("Plex Timeout: none"),
    }
    tracing::info!("Key Cache Salted: {}", config.key_cache.salt().is_some());
    let catalog = config.catalog();
    for entry in catalog.all() {
        tracing::info!(
            "Playlist: /playlist/{} -> {} (visible: {})",
            entry.key,
            entry.rating_key,
            entry.visible
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
