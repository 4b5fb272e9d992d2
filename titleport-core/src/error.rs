//! Core error types for Titleport.

use thiserror::Error;

/// Core error type for model construction.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A response body is missing a required field or has the wrong shape.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
