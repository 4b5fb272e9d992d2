//! Fetch error types.

use thiserror::Error;

use crate::transport::HttpResponse;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for transport operations.
///
/// A request either never produced a response ([`FetchError::Transport`]) or
/// produced one with an error status ([`FetchError::Status`]). The failed
/// response is kept whole so callers can trace it.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response was received (DNS, connect, TLS, timeout).
    #[error("Request failed: {0}")]
    Transport(String),

    /// A response was received with an error status.
    #[error("Request failed with status code {}", .0.status)]
    Status(Box<HttpResponse>),

    /// A request header could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl FetchError {
    /// Returns the failed response, if there was one.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Status(response) => Some(response),
            _ => None,
        }
    }

    /// Returns the HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Transport(format!("Request timed out: {err}"))
        } else if err.is_connect() {
            FetchError::Transport(format!("Connection failed: {err}"))
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
