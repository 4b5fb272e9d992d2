//! Catalog client errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use titleport_core::CoreError;
use titleport_fetch::Retryable;

/// Source tag attached to every error raised by the catalog client.
pub const ERROR_SOURCE: &str = "TitleService";

// ============================================================================
// HTTP Fault
// ============================================================================

/// A failed HTTP exchange, decorated with the service's tracing details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFault {
    /// HTTP status of the failed response.
    pub status: u16,
    /// Message including tracing id and inner error.
    pub message: String,
    /// Value of the `traceresponse` header, empty when absent.
    pub tracing_id: String,
    /// `error.code` from the response body, empty when absent.
    pub inner_code: String,
    /// `error.message` from the response body, empty when absent.
    pub inner_message: String,
}

impl fmt::Display for HttpFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ============================================================================
// Catalog Error
// ============================================================================

/// Errors raised by the catalog client.
///
/// Transport and HTTP failures are always routed through
/// [`crate::trace::normalize`] before they surface as one of these variants.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No response was received.
    #[error("[{source_tag}] {message}")]
    Transport {
        /// Component that raised the error.
        source_tag: &'static str,
        /// Transport failure description.
        message: String,
    },

    /// The service failed the request (system fault).
    #[error("{0}")]
    Http(HttpFault),

    /// The service rejected the request as invalid input (HTTP 400).
    #[error("{0}")]
    User(HttpFault),

    /// The app has not been extended to this host (HTTP 404 on manifest lookup).
    #[error("App is not extended to this host yet. {0}")]
    NotProvisioned(HttpFault),

    /// The configured endpoint is not usable; no request was sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The service answered with a status the protocol does not define.
    #[error("Unknown response code: {status}")]
    UnexpectedResponse {
        /// Status code received.
        status: u16,
    },

    /// A response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// An id cannot be used as a URL path segment.
    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    /// The acquisition did not complete within the poll budget.
    #[error("Acquisition {status_id} still pending after {polls} status checks")]
    DeadlineExceeded {
        /// Status id being polled.
        status_id: String,
        /// Number of status checks made.
        polls: u32,
    },

    /// The package file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Package path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Returns the HTTP fault behind this error, if any.
    pub fn http_fault(&self) -> Option<&HttpFault> {
        match self {
            Self::Http(fault) | Self::User(fault) | Self::NotProvisioned(fault) => Some(fault),
            Self::Transport { .. }
            | Self::Configuration(_)
            | Self::UnexpectedResponse { .. }
            | Self::InvalidResponse(_)
            | Self::InvalidId(_)
            | Self::DeadlineExceeded { .. }
            | Self::Io { .. } => None,
        }
    }

    /// Returns the service tracing id, if a response carried one.
    pub fn tracing_id(&self) -> Option<&str> {
        self.http_fault()
            .map(|fault| fault.tracing_id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// Returns true if the caller supplied invalid input.
    pub fn is_user_fault(&self) -> bool {
        matches!(self, Self::User(_) | Self::Configuration(_) | Self::InvalidId(_))
    }

    /// Returns true if the app is not extended to this host.
    pub fn is_not_provisioned(&self) -> bool {
        matches!(self, Self::NotProvisioned(_))
    }
}

impl Retryable for CatalogError {
    fn http_status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedResponse { status } => Some(*status),
            other => other.http_fault().map(|fault| fault.status),
        }
    }
}

impl From<CoreError> for CatalogError {
    fn from(err: CoreError) -> Self {
        CatalogError::InvalidResponse(err.to_string())
    }
}

// ============================================================================
// Package Validation Error
// ============================================================================

/// Advisory package validation failure.
///
/// Kept apart from [`CatalogError`]: a package that fails validation is
/// still uploaded.
#[derive(Debug, Error)]
pub enum PackageValidationError {
    /// The package is not a readable zip archive.
    #[error("Invalid zip archive: {0}")]
    InvalidArchive(String),

    /// The archive has no entries.
    #[error("Zip archive is empty")]
    Empty,
}

// ============================================================================
// Tests
// ============================================================================
