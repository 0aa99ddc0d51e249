//! End-to-end tests against a live local gateway.

use serde_json::{json, Value};

use graphql_gateway::config::GatewayConfig;
use graphql_gateway::http::response::JSON_CONTENT_TYPE;

mod common;

#[tokio::test]
async fn test_json_post() {
    let gateway = common::start_gateway(GatewayConfig::default()).await;

    let res = common::client()
        .post(gateway.url("/graphql"))
        .json(&json!({
            "query": "query Test { ping }",
            "operationName": "Test",
            "variables": {"echo": "test"}
        }))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], JSON_CONTENT_TYPE);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"data": {"ping": "Pong"}}));
}

#[tokio::test]
async fn test_get_with_query_string() {
    let gateway = common::start_gateway(GatewayConfig::default()).await;

    let res = common::client()
        .get(gateway.url("/graphql"))
        .query(&[
            ("query", "query Test($echo: String) { ping(echo: $echo) }"),
            ("operationName", "Test"),
            ("variables", r#"{"echo":"from-get"}"#),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["ping"], "from-get");
}

#[tokio::test]
async fn test_graphql_body_with_charset() {
    let gateway = common::start_gateway(GatewayConfig::default()).await;

    let res = common::client()
        .post(gateway.url("/graphql"))
        .header("content-type", "application/graphql; charset=utf-8")
        .body(r#"{ ping(echo: "raw") }"#)
        .send()
        .await
        .unwrap();

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["ping"], "raw");
}

#[tokio::test]
async fn test_form_post() {
    let gateway = common::start_gateway(GatewayConfig::default()).await;

    let res = common::client()
        .post(gateway.url("/graphql"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("query=%7B%20ping(echo%3A%20%22form%22)%20%7D")
        .send()
        .await
        .unwrap();

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["ping"], "form");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let gateway = common::start_gateway(GatewayConfig::default()).await;

    let res = common::client()
        .post(gateway.url("/graphql"))
        .header("x-request-id", "trace-me")
        .body(r#"{"query":"{ ping }"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn test_custom_path_and_health() {
    let mut config = GatewayConfig::default();
    config.listener.graphql_path = "/api/graphql".into();
    let gateway = common::start_gateway(config).await;
    let client = common::client();

    let res = client.get(gateway.url("/graphql")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = client
        .get(gateway.url("/api/graphql?query=%7B%20ping%20%7D"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client.get(gateway.url("/health")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
