//! Response encoding.
//!
//! # Responsibilities
//! - Serialize the execution result as the response body
//! - Set the JSON content type
//! - Turn a result that cannot be serialized into a 500 response
//!
//! # Design Decisions
//! - Encoding never returns an error: the gateway expects exactly one
//!   well-formed response per invocation
//! - GraphQL errors live inside the result and pass through unchanged

use std::collections::HashMap;

use serde::Serialize;

use crate::http::event::ProxyResponse;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Encode an execution result as a proxy response.
pub fn encode<T: Serialize + ?Sized>(result: &T) -> ProxyResponse {
    match serde_json::to_string(result) {
        Ok(body) => ProxyResponse {
            status_code: 200,
            headers: HashMap::from([("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())]),
            body,
            is_base64_encoded: false,
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize execution result");
            ProxyResponse::with_status(500)
        }
    }
}
