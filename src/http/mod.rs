//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy event (serverless gateway, server.rs, or CLI)
//!     → event.rs (ProxyRequest)
//!     → request.rs (pick encoding, normalize to GraphQlRequest)
//!     → executor (run against the schema)
//!     → response.rs (serialize result, 200 or 500)
//!     → event.rs (ProxyResponse)
//! ```
//!
//! handler.rs composes the steps for one invocation.

pub mod event;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use event::{ProxyRequest, ProxyResponse};
pub use handler::GatewayHandler;
pub use request::{Encoding, GraphQlRequest, RequestNormalizer, Variables};
pub use server::HttpServer;
