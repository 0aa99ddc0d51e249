//! Ping-pong schema shipped with the gateway.
//!
//! ```graphql
//! type Query {
//!   ping(echo: String): String
//! }
//! ```

use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};

use crate::executor::SchemaExecutor;

pub type PingPongSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;
pub type PingPongExecutor = SchemaExecutor<QueryRoot, EmptyMutation, EmptySubscription>;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Returns `echo` when given, otherwise "Pong".
    async fn ping(&self, echo: Option<String>) -> Option<String> {
        match echo {
            Some(echo) if !echo.is_empty() => Some(echo),
            _ => Some("Pong".to_string()),
        }
    }
}

/// Build the ping-pong schema.
pub fn build_schema() -> PingPongSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription).finish()
}
