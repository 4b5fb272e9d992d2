//! Trait definitions for Titleport.

use crate::models::TelemetryEvent;

/// Write-only sink for telemetry events.
///
/// The client never reads back from the sink; a failing sink must not
/// affect the operation that emitted the event.
pub trait TelemetrySink: Send + Sync + std::fmt::Debug {
    /// Records an event.
    fn send(&self, event: TelemetryEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn send(&self, _event: TelemetryEvent) {}
}
