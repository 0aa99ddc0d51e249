//! GraphQL gateway server.
//!
//! Runs the serverless request pipeline behind a local HTTP listener.
//!
//! ```text
//!   HTTP request
//!       │
//!       ▼
//!   ┌────────┐   ProxyRequest   ┌────────────┐  GraphQlRequest  ┌──────────┐
//!   │ server │ ───────────────▶ │ normalizer │ ───────────────▶ │ executor │
//!   └────────┘                  └────────────┘                  └────┬─────┘
//!       ▲                                                            │
//!       │         ProxyResponse  ┌─────────┐      Response           │
//!       └─────────────────────── │ encoder │ ◀───────────────────────┘
//!                                └─────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use graphql_gateway::config::{load_config, GatewayConfig};
use graphql_gateway::executor::ping_pong::build_schema;
use graphql_gateway::executor::SchemaExecutor;
use graphql_gateway::http::HttpServer;
use graphql_gateway::lifecycle::shutdown_signal;
use graphql_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "graphql-gateway")]
#[command(about = "GraphQL gateway for serverless HTTP events", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("graphql-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        graphql_path = %config.listener.graphql_path,
        form_urlencoded = ?config.normalizer.form_urlencoded,
        header_matching = ?config.normalizer.header_matching,
        execution_timeout_secs = config.timeouts.execution_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let executor = SchemaExecutor::new(build_schema());
    let server = HttpServer::new(config, executor);
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
