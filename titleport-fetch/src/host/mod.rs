//! Host APIs for the Titleport client.
//!
//! This module provides the concrete implementations that talk to the
//! outside world:
//!
//! - [`http`] - reqwest-backed [`crate::Transport`]
//! - [`telemetry`] - Telemetry sink writing to `tracing`

pub mod http;
pub mod telemetry;

// Re-export key types
pub use http::HttpClient;
pub use telemetry::TracingTelemetry;
