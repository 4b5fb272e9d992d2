//! Telemetry sink that writes events to the tracing pipeline.

use titleport_core::{TelemetryEvent, TelemetrySink};
use tracing::{info, warn};

/// Target used for telemetry log records.
pub const TELEMETRY_TARGET: &str = "titleport::telemetry";

/// Emits telemetry events as structured tracing records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn send(&self, event: TelemetryEvent) {
        match &event.error {
            Some(error) => warn!(
                target: TELEMETRY_TARGET,
                component = %event.component,
                event = %event.name,
                properties = ?event.properties,
                error = %error,
                "Telemetry error event"
            ),
            None => info!(
                target: TELEMETRY_TARGET,
                component = %event.component,
                event = %event.name,
                properties = ?event.properties,
                "Telemetry event"
            ),
        }
    }
}
