//! Telemetry events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known event names.
pub mod events {
    /// Copilot availability check.
    pub const CHECK_COPILOT: &str = "check-copilot";
}

/// Well-known property keys.
pub mod properties {
    /// Whether Copilot is allowed: `true`, `false` or `undefined`.
    pub const IS_COPILOT_ALLOWED: &str = "is-copilot-allowed";
    /// Tracing id of a failed Copilot check.
    pub const CHECK_COPILOT_TRACING_ID: &str = "check-copilot-tracing-id";
}

/// A single telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Component that emitted the event.
    pub component: String,
    /// Event name.
    pub name: String,
    /// Event properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Error message for error events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the event was created.
    pub timestamp: DateTime<Utc>,
}

impl TelemetryEvent {
    /// Creates a new event with no properties.
    pub fn new(component: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            name: name.into(),
            properties: BTreeMap::new(),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Marks this as an error event.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Returns true if this is an error event.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns a property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
