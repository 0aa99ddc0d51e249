//! Query execution seam.
//!
//! # Data Flow
//! ```text
//! GraphQlRequest (from http/request.rs)
//!     → QueryExecutor::execute (with ExecutionContext)
//!     → Output: Serialize
//!     → http/response.rs
//! ```
//!
//! # Design Decisions
//! - The schema is built by the caller and handed to the executor; nothing
//!   is initialized behind the caller's back
//! - Cancellation travels in the context as a deadline; the gateway itself
//!   imposes no timeout on execution

pub mod graphql;
pub mod ping_pong;

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::http::request::GraphQlRequest;

pub use graphql::SchemaExecutor;

/// Per-invocation information passed alongside the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Correlation ID for logs.
    pub request_id: String,

    /// Point in time after which execution should give up.
    pub deadline: Option<Instant>,
}

impl ExecutionContext {
    /// Create a context without a deadline.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            deadline: None,
        }
    }

    /// Set the deadline `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }
}

/// Runs canonical requests against a schema.
pub trait QueryExecutor: Send + Sync {
    /// The execution result; anything that serializes.
    type Output: Serialize + Send;

    /// Execute one request.
    fn execute(
        &self,
        ctx: &ExecutionContext,
        request: GraphQlRequest,
    ) -> impl Future<Output = Self::Output> + Send;
}
