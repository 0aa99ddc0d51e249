use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use graphql_gateway::config::{load_config, GatewayConfig, ObservabilityConfig};
use graphql_gateway::executor::ping_pong::build_schema;
use graphql_gateway::executor::SchemaExecutor;
use graphql_gateway::http::{GatewayHandler, ProxyRequest};
use graphql_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Offline tooling for the GraphQL gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one proxy event through the gateway and print the response
    Invoke {
        /// Event JSON file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: PathBuf,

        /// Gateway configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file and print the effective settings
    CheckConfig {
        /// Gateway configuration file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Invoke { event, config } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => GatewayConfig::default(),
            };
            // Logs go to stderr so stdout stays pure JSON.
            logging::init_logging_with_writer(
                &ObservabilityConfig {
                    log_level: "warn".to_string(),
                    ..config.observability.clone()
                },
                std::io::stderr,
            )?;

            let event: ProxyRequest = serde_json::from_str(&read_event(&event)?)?;
            let handler = GatewayHandler::new(&config, SchemaExecutor::new(build_schema()));
            let response = handler.handle(event).await;

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::CheckConfig { path } => match load_config(&path) {
            Ok(config) => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn read_event(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}
