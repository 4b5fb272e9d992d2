//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use titleport_catalog::CatalogError;
use titleport_fetch::Retryable;

// ============================================================================
// Output Types
// ============================================================================

/// Copilot status output; `null` when unknown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopilotOutput {
    pub copilot_allowed: Option<bool>,
}

/// Error output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracing_id: Option<String>,
    pub not_provisioned: bool,
}

impl ErrorOutput {
    /// Builds the error output, pulling tracing details from catalog errors.
    pub fn from_error(error: &anyhow::Error) -> Self {
        let catalog = error.downcast_ref::<CatalogError>();
        Self {
            error: error.to_string(),
            status: catalog.and_then(Retryable::http_status),
            tracing_id: catalog
                .and_then(CatalogError::tracing_id)
                .map(str::to_string),
            not_provisioned: catalog.is_some_and(CatalogError::is_not_provisioned),
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats an error; falls back to the plain message if encoding fails.
    pub fn format_error(&self, error: &anyhow::Error) -> String {
        self.format(&ErrorOutput::from_error(error))
            .unwrap_or_else(|_| error.to_string())
    }
}
