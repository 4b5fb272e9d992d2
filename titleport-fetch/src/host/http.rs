//! HTTP client backed by reqwest.
//!
//! This module provides the production [`Transport`]:
//! - Request/response tracing
//! - Bearer authentication
//! - JSON and multipart bodies, with an optional content type override

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::transport::{FormPart, HttpRequest, HttpResponse, Method, MultipartForm, RequestBody, Transport};

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for Titleport.
const USER_AGENT: &str = concat!("Titleport/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper implementing [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { inner: client })
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let HttpRequest {
            method,
            url,
            bearer,
            body,
        } = request;

        let mut builder = self.inner.request(reqwest_method(method), url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let mut content_type = None;
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => {
                content_type = form.content_type.clone();
                builder.multipart(into_reqwest_form(form))
            }
        };

        let mut req = builder.build()?;
        if let Some(content_type) = content_type {
            // The multipart encoder sets its own header; replace it.
            let value = HeaderValue::from_str(&content_type)
                .map_err(|e| FetchError::InvalidHeader(e.to_string()))?;
            req.headers_mut().insert(CONTENT_TYPE, value);
        }

        debug!("Sending request");
        let response = self.inner.execute(req).await?;
        debug!(status = %response.status(), "Response received");

        buffer_response(response).await
    }
}

// ============================================================================
// Conversions
// ============================================================================

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn into_reqwest_form(form: MultipartForm) -> Form {
    form.parts
        .into_iter()
        .fold(Form::new(), |form, part| match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                bytes,
            } => form.part(name, Part::bytes(bytes).file_name(file_name)),
        })
}

async fn buffer_response(response: Response) -> Result<HttpResponse, FetchError> {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

// ============================================================================
// Tests
// ============================================================================
