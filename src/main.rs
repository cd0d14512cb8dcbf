//! Playlister - Plex 播放列表展示与缩略图代理

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use playlister::application::MediaServerPort;
use playlister::config::{load_config, load_config_from_path, print_config, AppConfig};
use playlister::infrastructure::adapters::{PlexClient, PlexClientConfig};
use playlister::infrastructure::http::{AppState, HttpServer, ServerConfig};
use playlister::infrastructure::memory::InMemoryKeyCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值），可通过第一个参数指定配置文件
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_config_from_path(Some(&path)),
        None => load_config(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        build = option_env!("PLAYLISTER_BUILD_HASH").unwrap_or("dev"),
        "Playlister starting"
    );
    print_config(&config);

    let license = match &config.server.license_path {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read license {:?}: {}", path, e))?,
        ),
        None => None,
    };

    // 创建 Plex 客户端
    let mut plex_config = PlexClientConfig::new(&config.plex.url, &config.plex.token);
    if let Some(secs) = config.plex.timeout_secs {
        plex_config = plex_config.with_timeout(secs);
    }
    let media_server = Arc::new(PlexClient::new(plex_config)?);
    if !media_server.health_check().await {
        anyhow::bail!("Plex server at {} is unreachable", config.plex.url);
    }
    tracing::info!(url = %config.plex.url, "Plex server reachable");

    // 进程内唯一的 Key Cache
    let key_cache = InMemoryKeyCache::new(config.key_cache.salt()).arc();

    let state = AppState::new(
        key_cache,
        media_server,
        config.catalog(),
        &config.server.static_dir,
        license,
    );

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_shutdown_timeout(Duration::from_secs(config.server.shutdown_timeout_secs));
    let server = HttpServer::new(server_config, state);

    server.run_with_shutdown(shutdown_signal()).await?;

    tracing::info!("HTTP server shut down gracefully");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},playlister={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Received shutdown signal");
}
