//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown of the HTTP server
//! ```
//!
//! # Design Decisions
//! - The server accepts any shutdown future, so tests and embedders can
//!   stop it without sending signals

pub mod signals;

pub use signals::shutdown_signal;
