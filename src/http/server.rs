//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the GraphQL and health handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Adapt HTTP requests into proxy events and proxy responses back
//! - Bind server to listener and shut down gracefully
//!
//! # Design Decisions
//! - The server runs the exact pipeline a serverless runtime would, so local
//!   behavior matches deployed behavior
//! - Header names are restored to canonical `Title-Case`, the form gateways
//!   forward, since HTTP/1 parsing lowercases them

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{Query, State},
    http::{header::HeaderName, HeaderMap, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::executor::QueryExecutor;
use crate::http::event::{ProxyRequest, ProxyResponse, RequestContext};
use crate::http::handler::GatewayHandler;

const X_REQUEST_ID: &str = "x-request-id";

/// HTTP server exposing the gateway pipeline.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and executor.
    pub fn new<E>(config: GatewayConfig, executor: E) -> Self
    where
        E: QueryExecutor + 'static,
    {
        let handler = Arc::new(GatewayHandler::new(&config, executor));
        let router = Self::build_router(&config, handler);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<E>(config: &GatewayConfig, handler: Arc<GatewayHandler<E>>) -> Router
    where
        E: QueryExecutor + 'static,
    {
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route(&config.listener.graphql_path, any(graphql_handler::<E>))
            .with_state(handler)
            .route("/health", get(health_handler))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Drains in-flight requests and stops once `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            graphql_path = %self.config.listener.graphql_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Adapts the HTTP request into a proxy event and runs the pipeline.
async fn graphql_handler<E>(
    State(handler): State<Arc<GatewayHandler<E>>>,
    Query(params): Query<HashMap<String, String>>,
    request: Request<Body>,
) -> Response
where
    E: QueryExecutor + 'static,
{
    let (parts, body) = request.into_parts();

    // The body limit layer has already bounded the size.
    let body = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let headers = canonical_headers(&parts.headers);
    let request_id = headers.get("X-Request-Id").cloned();

    let event = ProxyRequest {
        http_method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query_string_parameters: params,
        headers,
        body,
        is_base64_encoded: false,
        request_context: RequestContext { request_id },
    };

    into_http_response(handler.handle(event).await)
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Flatten headers into a single-valued map with `Title-Case` names.
///
/// Repeated headers are joined with `,`, as gateways do.
fn canonical_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut flat: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        flat.entry(canonical_header_name(name.as_str()))
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    flat
}

/// `content-type` → `Content-Type`.
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn into_http_response(response: ProxyResponse) -> Response {
    let status = StatusCode::from_u16(response.status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut http_response = (status, response.body).into_response();
    let headers = http_response.headers_mut();
    for (name, value) in &response.headers {
        match (HeaderName::try_from(name.as_str()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
    }
    http_response
}
