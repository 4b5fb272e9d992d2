//! Fetch context shared by the client components.
//!
//! The context bundles the transport, the telemetry sink and the settings.
//! It is built explicitly by the caller and passed to every component; it
//! is cheap to clone (all host APIs sit behind `Arc`).

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use titleport_core::TelemetrySink;

use crate::error::FetchError;
use crate::host::http::{DEFAULT_TIMEOUT_SECS, HttpClient};
use crate::host::telemetry::TracingTelemetry;
use crate::retry::RetryPolicy;
use crate::transport::Transport;

/// Default discovery endpoint of the title service.
pub const DEFAULT_SERVICE_ENDPOINT: &str = "https://titles.prod.mos.microsoft.com";

/// Default token scope for the title service.
pub const DEFAULT_SERVICE_SCOPE: &str = "https://titles.prod.mos.microsoft.com/.default";

/// Environment variable overriding the discovery endpoint.
pub const ENDPOINT_ENV_VAR: &str = "SIDELOADING_SERVICE_ENDPOINT";

/// Environment variable overriding the token scope.
pub const SCOPE_ENV_VAR: &str = "SIDELOADING_SERVICE_SCOPE";

/// Default delay between acquisition status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default maximum number of acquisition status polls.
pub const DEFAULT_MAX_POLLS: NonZeroU32 = match NonZeroU32::new(150) {
    Some(n) => n,
    None => unreachable!(),
};

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for client operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Discovery endpoint; validated when an operation starts.
    pub endpoint: String,
    /// Token scope callers should request for the service.
    pub scope: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between acquisition status polls.
    pub poll_interval: Duration,
    /// Maximum acquisition status polls before giving up.
    pub max_polls: NonZeroU32,
    /// Retry policy for callers that opt into retries.
    pub retry: RetryPolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SERVICE_ENDPOINT.to_string(),
            scope: DEFAULT_SERVICE_SCOPE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
            retry: RetryPolicy::default(),
        }
    }
}

impl FetchSettings {
    /// Sets the discovery endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the polling cadence and bound.
    pub fn with_polling(mut self, interval: Duration, max_polls: NonZeroU32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to client components, giving access to host APIs.
#[derive(Clone)]
pub struct FetchContext {
    /// Transport for all requests.
    pub transport: Arc<dyn Transport>,
    /// Write-only telemetry sink.
    pub telemetry: Arc<dyn TelemetrySink>,
    /// Settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with the reqwest transport and default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_settings(FetchSettings::default())
    }

    /// Creates a context with the reqwest transport and custom settings.
    pub fn with_settings(settings: FetchSettings) -> Result<Self, FetchError> {
        Self::builder().settings(settings).build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("transport", &self.transport)
            .field("telemetry", &self.telemetry)
            .field("settings", &self.settings)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`FetchContext`].
#[derive(Default)]
pub struct FetchContextBuilder {
    transport: Option<Arc<dyn Transport>>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom telemetry sink.
    pub fn telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Sets the settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the context.
    ///
    /// Without a custom transport, a reqwest client using the configured
    /// timeout is created; this fails only if the TLS backend is unusable.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpClient::with_timeout(self.settings.timeout)?),
        };

        Ok(FetchContext {
            transport,
            telemetry: self
                .telemetry
                .unwrap_or_else(|| Arc::new(TracingTelemetry)),
            settings: self.settings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
