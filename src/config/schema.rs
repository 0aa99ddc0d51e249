//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the GraphQL gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration for the local HTTP server.
    pub listener: ListenerConfig,

    /// Request normalization behavior.
    pub normalizer: NormalizerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path the GraphQL endpoint is mounted on.
    pub graphql_path: String,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            graphql_path: "/graphql".to_string(),
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// How `application/x-www-form-urlencoded` bodies are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormUrlEncodedMode {
    /// Decode form fields with the same rules as the query-string form.
    #[default]
    Parse,
    /// Produce an empty request, leaving the query engine to reject it.
    Ignore,
}

/// How the `Content-Type` header is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatching {
    /// Any casing of the header name; media type compared case-insensitively.
    #[default]
    CaseInsensitive,
    /// Only the literal `Content-Type` key; media type compared verbatim.
    Exact,
}

/// Request normalization configuration.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Treatment of form-encoded bodies.
    pub form_urlencoded: FormUrlEncodedMode,

    /// Treatment of header name casing.
    pub header_matching: HeaderMatching,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline handed to the query executor, in seconds (0 = none).
    pub execution_secs: u64,

    /// Request timeout for the local HTTP server, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            execution_secs: 25,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
