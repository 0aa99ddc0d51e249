//! Executor backed by an `async-graphql` schema.

use std::future::Future;

use async_graphql::{ObjectType, Request, Response, Schema, ServerError, SubscriptionType, Variables};
use serde_json::Value;

use crate::executor::{ExecutionContext, QueryExecutor};
use crate::http::request::GraphQlRequest;

/// Executes requests against a schema supplied at construction.
pub struct SchemaExecutor<Q, M, S> {
    schema: Schema<Q, M, S>,
}

impl<Q, M, S> SchemaExecutor<Q, M, S>
where
    Q: ObjectType + 'static,
    M: ObjectType + 'static,
    S: SubscriptionType + 'static,
{
    pub fn new(schema: Schema<Q, M, S>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema<Q, M, S> {
        &self.schema
    }
}

/// Translate the canonical request into an `async-graphql` request.
fn to_graphql_request(ctx: &ExecutionContext, request: GraphQlRequest) -> Request {
    let mut graphql = Request::new(request.query)
        .variables(Variables::from_json(Value::Object(request.variables)))
        .data(ctx.clone());

    if !request.operation_name.is_empty() {
        graphql = graphql.operation_name(request.operation_name);
    }

    graphql
}

impl<Q, M, S> QueryExecutor for SchemaExecutor<Q, M, S>
where
    Q: ObjectType + 'static,
    M: ObjectType + 'static,
    S: SubscriptionType + 'static,
{
    type Output = Response;

    fn execute(
        &self,
        ctx: &ExecutionContext,
        request: GraphQlRequest,
    ) -> impl Future<Output = Response> + Send {
        let graphql = to_graphql_request(ctx, request);
        let deadline = ctx.deadline;
        let request_id = ctx.request_id.clone();

        async move {
            let Some(deadline) = deadline else {
                return self.schema.execute(graphql).await;
            };

            match tokio::time::timeout_at(deadline, self.schema.execute(graphql)).await {
                Ok(response) => response,
                Err(_) => {
                    tracing::warn!(request_id = %request_id, "Execution deadline exceeded");
                    Response::from_errors(vec![ServerError::new(
                        "execution deadline exceeded",
                        None,
                    )])
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ping_pong::build_schema;
    use async_graphql::{EmptyMutation, EmptySubscription, Object};
    use serde_json::json;
    use std::time::Duration;

    fn request(query: &str, operation_name: &str, variables: Value) -> GraphQlRequest {
        GraphQlRequest {
            query: query.into(),
            operation_name: operation_name.into(),
            variables: variables.as_object().cloned().unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn test_variables_and_operation_name() {
        let executor = SchemaExecutor::new(build_schema());
        let query = "query Other { ping } query Test($echo: String) { ping(echo: $echo) }";

        let response = executor
            .execute(
                &ExecutionContext::new("req-1"),
                request(query, "Test", json!({"echo": "test"})),
            )
            .await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(response.data.into_json().unwrap(), json!({"ping": "test"}));
    }

    #[tokio::test]
    async fn test_empty_query_is_an_execution_error() {
        let executor = SchemaExecutor::new(build_schema());

        let response = executor
            .execute(&ExecutionContext::new("req-2"), GraphQlRequest::default())
            .await;

        assert!(!response.errors.is_empty());
        let body = serde_json::to_value(&response).unwrap();
        assert!(body["errors"].is_array());
    }

    struct SlowQuery;

    #[Object]
    impl SlowQuery {
        async fn slow(&self) -> bool {
            tokio::time::sleep(Duration::from_secs(5)).await;
            true
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let schema = Schema::build(SlowQuery, EmptyMutation, EmptySubscription).finish();
        let executor = SchemaExecutor::new(schema);
        let ctx = ExecutionContext::new("req-3").with_timeout(Duration::from_millis(50));

        let response = executor.execute(&ctx, request("{ slow }", "", json!({}))).await;

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "execution deadline exceeded");
    }

    #[test]
    fn test_request_translation() {
        let ctx = ExecutionContext::new("req-4");
        let graphql = to_graphql_request(&ctx, request("{ ping }", "", json!({"a": 1})));

        assert_eq!(graphql.operation_name, None);
        assert_eq!(graphql.variables.into_value().into_json().unwrap(), json!({"a": 1}));
    }
}
