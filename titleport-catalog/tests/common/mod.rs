//! Shared fixtures for the catalog integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use titleport_core::{TelemetryEvent, TelemetrySink};
use titleport_fetch::{
    FetchContext, FetchError, FetchSettings, HttpRequest, HttpResponse, Method, RetryPolicy,
    Transport,
};

pub const DISCOVERY_ENDPOINT: &str = "https://discovery.example.com";
pub const SERVICE_URL: &str = "https://titles.example.com";
pub const TOKEN: &str = "test-token";

// ============================================================================
// Scripted Transport
// ============================================================================

/// Transport answering from a queue and recording every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, FetchError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, response: HttpResponse) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn reply_json(&self, status: u16, body: Value) -> &Self {
        self.reply(HttpResponse::new(status).with_json(&body))
    }

    pub fn fail(&self, error: FetchError) -> &Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues the discovery answer.
    pub fn discovery(&self) -> &Self {
        self.reply_json(200, json!({ "titlesServiceUrl": SERVICE_URL }))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path()))
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path() == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("script exhausted".to_string())))
    }
}

// ============================================================================
// Recording Telemetry
// ============================================================================

#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn send(&self, event: TelemetryEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ============================================================================
// Context
// ============================================================================

pub fn settings() -> FetchSettings {
    FetchSettings::default()
        .with_endpoint(DISCOVERY_ENDPOINT)
        .with_retry(RetryPolicy::default())
}

pub fn context(transport: &Arc<ScriptedTransport>, telemetry: &Arc<RecordingTelemetry>) -> FetchContext {
    context_with(transport, telemetry, settings())
}

pub fn context_with(
    transport: &Arc<ScriptedTransport>,
    telemetry: &Arc<RecordingTelemetry>,
    settings: FetchSettings,
) -> FetchContext {
    FetchContext::builder()
        .transport(transport.clone())
        .telemetry(telemetry.clone())
        .settings(settings)
        .build()
        .unwrap()
}

pub fn bounded_polling(max_polls: u32) -> FetchSettings {
    settings().with_polling(
        Duration::from_secs(2),
        NonZeroU32::new(max_polls).unwrap(),
    )
}

/// A failed response with tracing details.
pub fn traced_failure(status: u16, tracing_id: &str, code: &str, message: &str) -> HttpResponse {
    HttpResponse::new(status)
        .with_header("traceresponse", tracing_id)
        .with_json(&json!({ "error": { "code": code, "message": message } }))
}
