// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Titleport Fetch
//!
//! HTTP plumbing for the Titleport title service client.
//!
//! ## Transport
//!
//! - [`transport::Transport`] - Trait every request goes through
//! - [`host::http::HttpClient`] - reqwest-backed transport
//! - [`transport::HttpRequest`] / [`transport::HttpResponse`] - Buffered
//!   request and response values
//!
//! ## Retry
//!
//! - [`retry::RetryPolicy`] - Bounded retry with fail-fast statuses
//!
//! ## Context
//!
//! - [`context::FetchContext`] - Transport, telemetry sink and settings
//!
//! ## Example
//!
//! ```ignore
//! use titleport_fetch::{FetchContext, HttpRequest};
//!
//! let ctx = FetchContext::new()?;
//! let url = url::Url::parse("https://titles.example.com/config/v1/environment")?;
//! let response = ctx.transport.send(HttpRequest::get(url).bearer(token)).await?;
//! ```

// Core modules
pub mod context;
pub mod error;
pub mod host;
pub mod retry;
pub mod transport;

// Re-export key types at crate root

// Errors
pub use error::FetchError;

// Host APIs
pub use host::{http::HttpClient, telemetry::TracingTelemetry};

// Transport
pub use transport::{FormPart, HttpRequest, HttpResponse, Method, MultipartForm, RequestBody, Transport};

// Retry & Context
pub use context::{
    DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL, DEFAULT_SERVICE_ENDPOINT, DEFAULT_SERVICE_SCOPE,
    ENDPOINT_ENV_VAR, FetchContext, FetchContextBuilder, FetchSettings, SCOPE_ENV_VAR,
};
pub use retry::{Retryable, RetryPolicy};
