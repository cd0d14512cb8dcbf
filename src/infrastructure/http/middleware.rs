//! HTTP Middleware
//!
//! 请求日志中间件：4xx 记 warn，5xx 记 error，附带耗时

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// HTTP 状态码错误日志中间件
///
/// 错误消息本身在 `ApiError::into_response()` 中记录，这里只记录请求维度的信息。
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP client error"
        );
    } else {
        tracing::debug!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms = elapsed_ms,
            "HTTP request served"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// 记录每条事件的级别和 status 字段
    #[derive(Clone, Default)]
    struct CaptureLayer {
        events: Arc<parking_lot::Mutex<Vec<(Level, Option<u64>)>>>,
    }

    struct StatusVisitor(Option<u64>);

    impl Visit for StatusVisitor {
        fn record_u64(&mut self, field: &Field, value: u64) {
            if field.name() == "status" {
                self.0 = Some(value);
            }
        }

        fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = StatusVisitor(None);
            event.record(&mut visitor);
            self.events.lock().push((*event.metadata().level(), visitor.0));
        }
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/page", get(|| async { "<html></html>" }))
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = HttpRequest::builder().uri(uri).body(Body::empty()).unwrap();
        create_test_router().oneshot(request).await.unwrap().status()
    }

    /// 请求 `uri`，返回中间件记录的日志级别
    async fn logged_level(uri: &str) -> Option<Level> {
        let capture = CaptureLayer::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let status = status_of(uri).await;

        let events = capture.events.lock();
        events
            .iter()
            .find(|(_, logged)| *logged == Some(status.as_u16() as u64))
            .map(|(level, _)| *level)
    }

    #[tokio::test]
    async fn test_middleware_passes_responses_through() {
        assert_eq!(status_of("/page").await, StatusCode::OK);
        assert_eq!(status_of("/missing").await, StatusCode::NOT_FOUND);
        assert_eq!(status_of("/broken").await, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of("/nowhere").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_log_level_follows_status_class() {
        assert_eq!(logged_level("/page").await, Some(Level::DEBUG));
        assert_eq!(logged_level("/missing").await, Some(Level::WARN));
        assert_eq!(logged_level("/nowhere").await, Some(Level::WARN));
        assert_eq!(logged_level("/broken").await, Some(Level::ERROR));
    }
}
