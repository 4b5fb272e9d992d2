//! Upload and acquisition result types.
//!
//! The upload endpoints answer in one of two shapes: a terminal body that
//! already names the acquired title, or a job token that has to be
//! followed up (acquired and/or polled) before a title exists.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ============================================================================
// Title Record
// ============================================================================

/// An acquired title, the only value a successful sideload returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRecord {
    /// Identifier of the title in the catalog.
    pub title_id: String,
    /// Application identifier assigned alongside the title.
    pub app_id: String,
}

impl TitleRecord {
    /// Creates a new title record.
    pub fn new(title_id: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            title_id: title_id.into(),
            app_id: app_id.into(),
        }
    }

    /// Reads a title record from a terminal (HTTP 200) response body.
    pub fn from_body(body: &Value) -> Result<Self, CoreError> {
        Ok(Self {
            title_id: required_str(body, "titleId")?,
            app_id: required_str(body, "appId")?,
        })
    }

    /// Returns the record as a `(title_id, app_id)` pair.
    pub fn into_pair(self) -> (String, String) {
        (self.title_id, self.app_id)
    }
}

// ============================================================================
// Job Token
// ============================================================================

/// Opaque token correlating an upload with its asynchronous completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobToken {
    /// A status id, polled at `/dev/v1/users/packages/status/{id}`.
    Status(String),
    /// An operation id, exchanged for a status id by starting an acquisition.
    Operation(String),
}

impl JobToken {
    /// Returns the raw token value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Status(id) | Self::Operation(id) => id,
        }
    }

    /// Reads the `statusId` of an upload or acquisition response.
    pub fn status_from_body(body: &Value) -> Result<Self, CoreError> {
        required_str(body, "statusId").map(Self::Status)
    }

    /// Reads the `operationId` a zip package upload answers with.
    pub fn operation_from_body(body: &Value) -> Result<Self, CoreError> {
        required_str(body, "operationId").map(Self::Operation)
    }
}

// ============================================================================
// Upload Response
// ============================================================================

/// Interpretation of the immediate response to a package upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResponse {
    /// HTTP 200: the title was acquired synchronously.
    Immediate(TitleRecord),
    /// HTTP 202: completion is asynchronous.
    Deferred(JobToken),
    /// Any other status code.
    Unexpected(u16),
}

impl UploadResponse {
    /// Interprets the response to an XML manifest upload.
    ///
    /// 200 carries the title directly, 202 carries a `statusId` to poll.
    pub fn from_manifest_upload(status: u16, body: &Value) -> Result<Self, CoreError> {
        match status {
            200 => TitleRecord::from_body(body).map(Self::Immediate),
            202 => JobToken::status_from_body(body).map(Self::Deferred),
            other => Ok(Self::Unexpected(other)),
        }
    }

    /// Returns true if no further requests are needed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Immediate(_))
    }
}

/// Reads a required string field from a JSON object.
pub(crate) fn required_str(body: &Value, field: &str) -> Result<String, CoreError> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CoreError::InvalidData(format!("missing `{field}` in response body")))
}
