//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Paths the HTTP server mounts for itself.
const RESERVED_PATHS: [&str; 1] = ["/health"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.graphql_path must start with '/', got {0:?}")]
    InvalidPath(String),

    #[error("listener.graphql_path {0:?} is reserved")]
    ReservedPath(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.log_level: unknown level {0:?}")]
    UnknownLogLevel(String),
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if !config.listener.graphql_path.starts_with('/') {
        errors.push(ValidationError::InvalidPath(config.listener.graphql_path.clone()));
    } else if RESERVED_PATHS.contains(&config.listener.graphql_path.as_str()) {
        errors.push(ValidationError::ReservedPath(config.listener.graphql_path.clone()));
    }

    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::Zero("listener.max_body_size"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
