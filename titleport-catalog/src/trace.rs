//! Error normalization.
//!
//! Every failure caught while talking to the service is converted here into
//! a [`CatalogError`]. A failed response gets its tracing id (from the
//! `traceresponse` header) and the inner `error.code`/`error.message` of its
//! body appended to the message, then is classified by status and call site.

use serde_json::Value;
use titleport_fetch::{FetchError, HttpResponse};

use crate::error::{CatalogError, ERROR_SOURCE, HttpFault};

/// Response header carrying the service tracing id.
pub const TRACING_HEADER: &str = "traceresponse";

/// The operation a failure was caught in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSite {
    /// Any operation without special classification.
    General,
    /// Launch info lookup by manifest id; 404 means "not provisioned".
    LaunchInfoByManifestId,
}

/// Converts a transport failure into a catalog error.
pub fn normalize(error: FetchError, site: CallSite) -> CatalogError {
    match error {
        FetchError::Status(response) => {
            let original = format!("Request failed with status code {}", response.status);
            classify(trace_fault(&response, &original), site)
        }
        FetchError::Transport(message) | FetchError::InvalidHeader(message) => {
            CatalogError::Transport {
                source_tag: ERROR_SOURCE,
                message,
            }
        }
    }
}

/// Extracts tracing details from a failed response and decorates `original`.
pub fn trace_fault(response: &HttpResponse, original: &str) -> HttpFault {
    let tracing_id = response.header(TRACING_HEADER).unwrap_or_default().to_string();

    let body = response.json_value();
    let inner = body.get("error");
    let inner_field = |field: &str| {
        inner
            .and_then(|e| e.get(field))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let inner_code = inner_field("code");
    let inner_message = inner_field("message");

    HttpFault {
        status: response.status,
        message: format!("{original} (tracingId: {tracing_id}) {inner_code}: {inner_message}"),
        tracing_id,
        inner_code,
        inner_message,
    }
}

fn classify(fault: HttpFault, site: CallSite) -> CatalogError {
    match (fault.status, site) {
        (400, _) => CatalogError::User(fault),
        (404, CallSite::LaunchInfoByManifestId) => CatalogError::NotProvisioned(fault),
        _ => CatalogError::Http(fault),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failed(status: u16) -> FetchError {
        FetchError::Status(Box::new(
            HttpResponse::new(status)
                .with_header("traceresponse", "00-trace-01")
                .with_json(&json!({"error": {"code": "BadThing", "message": "it broke"}})),
        ))
    }

    #[test]
    fn test_message_is_decorated() {
        let err = normalize(failed(500), CallSite::General);
        let CatalogError::Http(fault) = err else {
            panic!("expected system fault");
        };
        assert_eq!(fault.tracing_id, "00-trace-01");
        assert_eq!(fault.inner_code, "BadThing");
        assert_eq!(fault.inner_message, "it broke");
        assert_eq!(
            fault.message,
            "Request failed with status code 500 (tracingId: 00-trace-01) BadThing: it broke"
        );
    }

    #[test]
    fn test_missing_details_default_to_empty() {
        let response = HttpResponse::new(502);
        let fault = trace_fault(&response, "boom");
        assert_eq!(fault.message, "boom (tracingId: ) : ");
        assert!(fault.tracing_id.is_empty());
        assert!(fault.inner_code.is_empty());
    }

    #[test]
    fn test_bad_request_is_user_fault() {
        for site in [CallSite::General, CallSite::LaunchInfoByManifestId] {
            let err = normalize(failed(400), site);
            assert!(matches!(err, CatalogError::User(_)));
            assert!(err.to_string().contains("(tracingId: 00-trace-01)"));
        }
    }

    #[test]
    fn test_not_found_depends_on_call_site() {
        assert!(matches!(
            normalize(failed(404), CallSite::LaunchInfoByManifestId),
            CatalogError::NotProvisioned(_)
        ));
        assert!(matches!(
            normalize(failed(404), CallSite::General),
            CatalogError::Http(_)
        ));
    }

    #[test]
    fn test_transport_failure_has_no_tracing() {
        let err = normalize(
            FetchError::Transport("Connection failed".to_string()),
            CallSite::General,
        );
        match &err {
            CatalogError::Transport {
                source_tag,
                message,
            } => {
                assert_eq!(*source_tag, ERROR_SOURCE);
                assert_eq!(message, "Connection failed");
            }
            other => panic!("expected transport fault, got {other:?}"),
        }
        assert!(err.tracing_id().is_none());
        assert!(err.http_fault().is_none());
    }
}
