//! GraphQL gateway for serverless HTTP events.
//!
//! Normalizes API Gateway proxy events into canonical GraphQL requests,
//! runs them through a [`QueryExecutor`](executor::QueryExecutor), and
//! encodes the result as a proxy response.

pub mod config;
pub mod executor;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use executor::{ExecutionContext, QueryExecutor, SchemaExecutor};
pub use http::{GatewayHandler, GraphQlRequest, HttpServer, ProxyRequest, ProxyResponse};
