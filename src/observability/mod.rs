//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handler and server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID is attached to every per-invocation log line
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
