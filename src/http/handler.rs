//! Per-invocation pipeline: normalize → execute → encode.
//!
//! This is the function a serverless runtime calls once per event. The local
//! HTTP server and the CLI drive it the same way.

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::config::schema::GatewayConfig;
use crate::executor::{ExecutionContext, QueryExecutor};
use crate::http::event::{ProxyRequest, ProxyResponse};
use crate::http::request::RequestNormalizer;
use crate::http::response;
use crate::observability::metrics;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Handles proxy events with a fixed executor.
pub struct GatewayHandler<E> {
    normalizer: RequestNormalizer,
    executor: E,
    execution_timeout: Option<Duration>,
}

impl<E: QueryExecutor> GatewayHandler<E> {
    /// Create a handler from the gateway configuration.
    pub fn new(config: &GatewayConfig, executor: E) -> Self {
        let execution_timeout = match config.timeouts.execution_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            normalizer: RequestNormalizer::new(config.normalizer),
            executor,
            execution_timeout,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Handle one event. Always produces a response.
    pub async fn handle(&self, event: ProxyRequest) -> ProxyResponse {
        let start_time = Instant::now();
        let request_id = request_id(&event);

        let (encoding, request) = self.normalizer.normalize_with_encoding(&event);

        tracing::debug!(
            request_id = %request_id,
            encoding = encoding.as_str(),
            operation_name = %request.operation_name,
            variables = request.variables.len(),
            "Request normalized"
        );

        let mut ctx = ExecutionContext::new(request_id);
        if let Some(timeout) = self.execution_timeout {
            ctx = ctx.with_timeout(timeout);
        }

        let result = self.executor.execute(&ctx, request).await;
        let response = response::encode(&result);

        metrics::record_request(encoding, response.status_code, start_time);
        tracing::info!(
            request_id = %ctx.request_id,
            encoding = encoding.as_str(),
            status = response.status_code,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Request handled"
        );

        response
    }
}

/// Gateway request ID, then `X-Request-Id`, then a fresh UUID.
fn request_id(event: &ProxyRequest) -> String {
    event
        .request_context
        .request_id
        .clone()
        .filter(|id| !id.is_empty())
        .or_else(|| event.header_ignore_case(REQUEST_ID_HEADER).map(str::to_string))
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ping_pong::build_schema;
    use crate::executor::SchemaExecutor;
    use crate::http::request::GraphQlRequest;
    use crate::http::response::JSON_CONTENT_TYPE;
    use std::sync::Mutex;

    /// Records what it was asked to run and returns it back.
    #[derive(Default)]
    struct RecordingExecutor {
        seen: Mutex<Vec<(ExecutionContext, GraphQlRequest)>>,
    }

    impl QueryExecutor for RecordingExecutor {
        type Output = GraphQlRequest;

        async fn execute(&self, ctx: &ExecutionContext, request: GraphQlRequest) -> GraphQlRequest {
            self.seen.lock().unwrap().push((ctx.clone(), request.clone()));
            request
        }
    }

    #[tokio::test]
    async fn test_end_to_end_ping() {
        let handler = GatewayHandler::new(
            &GatewayConfig::default(),
            SchemaExecutor::new(build_schema()),
        );
        let event = ProxyRequest {
            body: r#"{"query":"query Test { ping }","operationName":"Test","variables":{"echo":"test"}}"#
                .into(),
            ..ProxyRequest::default()
        };

        let response = handler.handle(event).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Content-Type"], JSON_CONTENT_TYPE);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["data"]["ping"], "Pong");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_request_id_sources() {
        let handler = GatewayHandler::new(&GatewayConfig::default(), RecordingExecutor::default());

        let mut event = ProxyRequest::default();
        event.headers.insert("x-request-id".into(), "from-header".into());
        handler.handle(event.clone()).await;

        event.request_context.request_id = Some("from-gateway".into());
        handler.handle(event).await;

        handler.handle(ProxyRequest::default()).await;

        let seen = handler.executor().seen.lock().unwrap();
        assert_eq!(seen[0].0.request_id, "from-header");
        assert_eq!(seen[1].0.request_id, "from-gateway");
        assert!(Uuid::parse_str(&seen[2].0.request_id).is_ok());
    }

    #[tokio::test]
    async fn test_execution_deadline_from_config() {
        let mut config = GatewayConfig::default();
        let handler = GatewayHandler::new(&config, RecordingExecutor::default());
        handler.handle(ProxyRequest::default()).await;
        assert!(handler.executor().seen.lock().unwrap()[0].0.deadline.is_some());

        config.timeouts.execution_secs = 0;
        let handler = GatewayHandler::new(&config, RecordingExecutor::default());
        handler.handle(ProxyRequest::default()).await;
        assert!(handler.executor().seen.lock().unwrap()[0].0.deadline.is_none());
    }

    #[tokio::test]
    async fn test_normalized_request_reaches_executor() {
        let handler = GatewayHandler::new(&GatewayConfig::default(), RecordingExecutor::default());
        let mut event = ProxyRequest::default();
        event.query_string_parameters.insert("query".into(), "{ ping }".into());
        event.body = "ignored".into();

        let response = handler.handle(event).await;

        let echoed: GraphQlRequest = serde_json::from_str(&response.body).unwrap();
        assert_eq!(echoed.query, "{ ping }");
        assert_eq!(handler.executor().seen.lock().unwrap()[0].1, echoed);
    }
}
