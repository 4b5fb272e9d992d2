//! Transport abstraction.
//!
//! Every call the client makes goes through the [`Transport`] trait. The
//! production implementation is [`crate::host::http::HttpClient`]; tests plug
//! in scripted transports that answer from a queue.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::FetchError;

// ============================================================================
// Request
// ============================================================================

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET.
    Get,
    /// POST.
    Post,
    /// DELETE.
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

/// A part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// A plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// A file field.
    File {
        /// Field name.
        name: String,
        /// File name sent with the part.
        file_name: String,
        /// File content.
        bytes: Vec<u8>,
    },
}

/// A multipart form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    /// Form parts in order.
    pub parts: Vec<FormPart>,
    /// Overrides the `Content-Type` header set by the multipart encoder.
    pub content_type: Option<String>,
}

impl MultipartForm {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            bytes,
        });
        self
    }

    /// Overrides the content type of the request.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the text value of a field.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Returns the bytes of a file field.
    pub fn file_bytes(&self, name: &str) -> Option<&[u8]> {
        self.parts.iter().find_map(|part| match part {
            FormPart::File { name: n, bytes, .. } if n == name => Some(bytes.as_slice()),
            _ => None,
        })
    }
}

/// Request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON body.
    Json(Value),
    /// Multipart form body.
    Multipart(MultipartForm),
}

/// An outgoing request.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, including query.
    pub url: Url,
    /// Bearer token for the `Authorization` header.
    pub bearer: Option<String>,
    /// Request body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// Creates a request with no body and no credentials.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    /// Creates a GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Creates a POST request.
    pub fn post(url: Url) -> Self {
        Self::new(Method::Post, url)
    }

    /// Creates a DELETE request.
    pub fn delete(url: Url) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Sets the bearer token.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.url.query_pairs_mut().append_pair(key, value);
        self
    }

    /// Sets a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Sets a multipart body.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Returns the URL path.
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("body", &self.body)
            .finish()
    }
}

// ============================================================================
// Response
// ============================================================================

/// A received response, fully buffered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, names lowercased.
    pub headers: BTreeMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Sets a JSON body.
    pub fn with_json(mut self, body: &Value) -> Self {
        self.body = body.to_string().into_bytes();
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Returns a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns true for 4xx and 5xx statuses.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Converts an error status into [`FetchError::Status`].
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_error() {
            Err(FetchError::Status(Box::new(self)))
        } else {
            Ok(self)
        }
    }

    /// Parses the body as a JSON value; an empty or non-JSON body is `Null`.
    pub fn json_value(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Sends requests and returns buffered responses.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status; mapping error statuses is left to the caller.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Sends a request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url() -> Url {
        Url::parse("https://titles.example.com/catalog/v1/users/uitypes").unwrap()
    }

    #[test]
    fn test_query_is_encoded_into_url() {
        let request = HttpRequest::get(url()).query("SupportedElementTypes", "Bots,Plugins");
        assert_eq!(
            request.url.query(),
            Some("SupportedElementTypes=Bots%2CPlugins")
        );
        assert_eq!(request.path(), "/catalog/v1/users/uitypes");
    }

    #[test]
    fn test_debug_redacts_bearer() {
        let request = HttpRequest::get(url()).bearer("secret-token");
        let debug = format!("{request:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(500).with_header("TraceResponse", "00-abc-01");
        assert_eq!(response.header("traceresponse"), Some("00-abc-01"));
        assert_eq!(response.header("TRACERESPONSE"), Some("00-abc-01"));
    }

    #[test]
    fn test_error_for_status() {
        assert!(HttpResponse::new(202).error_for_status().is_ok());
        let err = HttpResponse::new(503).error_for_status().unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "Request failed with status code 503");
    }

    #[test]
    fn test_json_value_tolerates_empty_body() {
        assert_eq!(HttpResponse::new(200).json_value(), Value::Null);
        let response = HttpResponse::new(200).with_json(&json!({"a": 1}));
        assert_eq!(response.json_value()["a"], 1);
    }

    #[test]
    fn test_multipart_accessors() {
        let form = MultipartForm::new()
            .file("package", "manifest.xml", b"<xml/>".to_vec())
            .text("culture", "en-us")
            .with_content_type("application/xml");
        assert_eq!(form.text_value("culture"), Some("en-us"));
        assert_eq!(form.file_bytes("package"), Some(&b"<xml/>"[..]));
        assert_eq!(form.content_type.as_deref(), Some("application/xml"));
        assert!(form.text_value("missing").is_none());
    }
}
