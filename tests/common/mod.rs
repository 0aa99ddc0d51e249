//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use graphql_gateway::config::GatewayConfig;
use graphql_gateway::executor::ping_pong::{build_schema, PingPongExecutor};
use graphql_gateway::executor::SchemaExecutor;
use graphql_gateway::http::{GatewayHandler, HttpServer};

/// A running gateway; dropping it stops the server.
pub struct TestGateway {
    pub addr: SocketAddr,
    _stop: oneshot::Sender<()>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the gateway with the ping-pong schema on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let server = HttpServer::new(config, SchemaExecutor::new(build_schema()));
    tokio::spawn(async move {
        let _ = server
            .run(listener, async move {
                let _ = stopped.await;
            })
            .await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestGateway { addr, _stop: stop }
}

/// Handler wired to the ping-pong schema, for event-level tests.
pub fn ping_pong_handler(config: &GatewayConfig) -> GatewayHandler<PingPongExecutor> {
    GatewayHandler::new(config, SchemaExecutor::new(build_schema()))
}

/// HTTP client that never reuses connections or goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
