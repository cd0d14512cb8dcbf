//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 收到关闭信号后等待在途请求完成的时间
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    pub fn router(&self) -> Router {
        create_routes(&self.state)
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    ///
    /// 关闭信号触发后，超过 `shutdown_timeout` 仍未结束则返回 `TimedOut` 错误。
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr();
        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        self.serve_with_shutdown(listener, shutdown_signal).await
    }

    /// 在已绑定的 listener 上运行，关闭语义同 `run_with_shutdown`
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        shutdown_signal: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();

        let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
        let serve = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_signal.await;
                let _ = signalled_tx.send(());
            })
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            biased;
            result = &mut serve => return result,
            _ = signalled_rx => {}
        }

        match tokio::time::timeout(self.config.shutdown_timeout, serve).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_secs = self.config.shutdown_timeout.as_secs(),
                    "Graceful shutdown timed out"
                );
                Err(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "graceful shutdown timed out",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{CatalogEntry, PlaylistCatalog};
    use crate::infrastructure::adapters::FakeMediaServer;
    use crate::infrastructure::memory::InMemoryKeyCache;
    use std::io::ErrorKind;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[test]
    fn test_server_config() {
        let config = ServerConfig::new("127.0.0.1", 9000).with_shutdown_timeout(Duration::from_secs(1));
        assert_eq!(config.addr(), "127.0.0.1:9000");
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
        assert_eq!(ServerConfig::default().shutdown_timeout, Duration::from_secs(5));
    }

    fn test_server(server: FakeMediaServer, shutdown_timeout: Duration) -> HttpServer {
        let catalog = PlaylistCatalog::new(vec![CatalogEntry {
            key: "comfort".to_string(),
            rating_key: 42,
            visible: true,
        }]);
        let state = AppState::new(
            InMemoryKeyCache::new(None).arc(),
            Arc::new(server),
            catalog,
            "static",
            None,
        );
        HttpServer::new(
            ServerConfig::new("127.0.0.1", 0).with_shutdown_timeout(shutdown_timeout),
            state,
        )
    }

    async fn spawn(
        server: HttpServer,
    ) -> (
        std::net::SocketAddr,
        oneshot::Sender<()>,
        tokio::task::JoinHandle<Result<(), std::io::Error>>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_with_shutdown(listener, async move {
            let _ = shutdown_rx.await;
        }));
        (addr, shutdown_tx, handle)
    }

    async fn send_request(addr: std::net::SocketAddr, path: &str) -> TcpStream {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        stream
    }

    #[tokio::test]
    async fn test_idle_server_shuts_down_cleanly() {
        let server = test_server(FakeMediaServer::new(), Duration::from_secs(5));
        let (_, shutdown_tx, handle) = spawn(server).await;

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_completed_request_then_clean_shutdown() {
        let server = test_server(
            FakeMediaServer::new().with_playlist(42, "Comfort", vec![]),
            Duration::from_secs(5),
        );
        let (addr, shutdown_tx, handle) = spawn(server).await;

        let mut stream = send_request(addr, "/api/ping").await;
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_in_flight_request_forces_timeout() {
        let server = test_server(
            FakeMediaServer::new()
                .with_playlist(42, "Comfort", vec![])
                .with_latency(Duration::from_secs(30)),
            Duration::from_millis(300),
        );
        let (addr, shutdown_tx, handle) = spawn(server).await;

        // 首页会调用慢速的媒体服务器，请求一直挂起
        let _stream = send_request(addr, "/").await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = std::time::Instant::now();
        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
