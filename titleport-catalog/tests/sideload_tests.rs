//! Sideloading flows against a scripted transport.

mod common;

use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use titleport_catalog::{CatalogError, PackageService};
use titleport_core::TitleRecord;
use titleport_fetch::{FetchError, HttpResponse, Method, RequestBody};

use common::*;

const STATUS_S1: &str = "/dev/v1/users/packages/status/s1";

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn manifest(dir: &TempDir) -> PathBuf {
    write_file(dir, "manifest.xml", b"<OfficeApp/>")
}

fn zip_package(dir: &TempDir) -> PathBuf {
    use std::io::Write;
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file("manifest.json", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"{}").unwrap();
    let bytes = writer.finish().unwrap().into_inner();
    write_file(dir, "appPackage.zip", &bytes)
}

// ============================================================================
// XML Manifest
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_manifest_immediate_completion() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport
        .discovery()
        .reply_json(200, json!({"titleId": "t1", "appId": "a1"}));

    let service = PackageService::new(context(&transport, &telemetry));
    let record = service
        .sideload_xml_manifest(TOKEN, &manifest(&dir))
        .await
        .unwrap();

    assert_eq!(record.into_pair(), ("t1".to_string(), "a1".to_string()));
    assert_eq!(
        transport.paths(),
        vec![
            "GET /config/v1/environment",
            "POST /dev/v1/users/packages/addins"
        ]
    );

    let requests = transport.requests();
    assert_eq!(requests[0].url.host_str(), Some("discovery.example.com"));
    assert_eq!(requests[1].url.host_str(), Some("titles.example.com"));
    assert!(requests.iter().all(|r| r.bearer.as_deref() == Some(TOKEN)));

    let RequestBody::Multipart(form) = &requests[1].body else {
        panic!("expected multipart upload");
    };
    assert_eq!(form.content_type.as_deref(), Some("application/xml"));
    assert_eq!(form.text_value("culture"), Some("en-us"));
    assert_eq!(form.file_bytes("package"), Some(&b"<OfficeApp/>"[..]));
}

#[tokio::test(start_paused = true)]
async fn test_manifest_deferred_completion_polls() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport
        .discovery()
        .reply_json(202, json!({"statusId": "s1"}))
        .reply_json(202, json!({"status": "InProgress"}))
        .reply_json(200, json!({"titleId": "t2", "appId": "a2"}));

    let service = PackageService::new(context(&transport, &telemetry));
    let start = tokio::time::Instant::now();
    let record = service
        .sideload_xml_manifest(TOKEN, &manifest(&dir))
        .await
        .unwrap();

    assert_eq!(record, TitleRecord::new("t2", "a2"));
    assert_eq!(transport.count(Method::Get, STATUS_S1), 2);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_manifest_unexpected_status() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport.discovery().reply(HttpResponse::new(204));

    let service = PackageService::new(context(&transport, &telemetry));
    let err = service
        .sideload_xml_manifest(TOKEN, &manifest(&dir))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::UnexpectedResponse { status: 204 }));
    assert_eq!(err.to_string(), "Unknown response code: 204");
}

#[tokio::test(start_paused = true)]
async fn test_manifest_rejected_as_user_fault() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport.discovery().reply(traced_failure(
        400,
        "00-abc-01",
        "InvalidManifest",
        "Manifest is invalid",
    ));

    let service = PackageService::new(context(&transport, &telemetry));
    let err = service
        .sideload_xml_manifest(TOKEN, &manifest(&dir))
        .await
        .unwrap_err();

    assert!(err.is_user_fault());
    assert_eq!(err.tracing_id(), Some("00-abc-01"));
    assert_eq!(
        err.to_string(),
        "Request failed with status code 400 (tracingId: 00-abc-01) InvalidManifest: Manifest is invalid"
    );
}

#[tokio::test(start_paused = true)]
async fn test_poll_bound_yields_deadline_exceeded() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport.discovery().reply_json(202, json!({"statusId": "s1"}));
    for _ in 0..3 {
        transport.reply(HttpResponse::new(202));
    }

    let service = PackageService::new(context_with(&transport, &telemetry, bounded_polling(3)));
    let start = tokio::time::Instant::now();
    let err = service
        .sideload_xml_manifest(TOKEN, &manifest(&dir))
        .await
        .unwrap_err();

    match err {
        CatalogError::DeadlineExceeded { status_id, polls } => {
            assert_eq!(status_id, "s1");
            assert_eq!(polls, 3);
        }
        other => panic!("expected deadline, got {other:?}"),
    }
    assert_eq!(transport.count(Method::Get, STATUS_S1), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(4));
    assert!(elapsed < Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_poll_error_status_is_normalized() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport
        .discovery()
        .reply_json(202, json!({"statusId": "s1"}))
        .reply(traced_failure(500, "00-poll-01", "Internal", "boom"));

    let service = PackageService::new(context(&transport, &telemetry));
    let err = service
        .sideload_xml_manifest(TOKEN, &manifest(&dir))
        .await
        .unwrap_err();

    let CatalogError::Http(fault) = &err else {
        panic!("expected system fault, got {err:?}");
    };
    assert_eq!(fault.status, 500);
    assert_eq!(fault.inner_code, "Internal");
    assert_eq!(err.tracing_id(), Some("00-poll-01"));
}

#[tokio::test(start_paused = true)]
async fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport.discovery();

    let service = PackageService::new(context(&transport, &telemetry));
    let err = service
        .sideload_xml_manifest(TOKEN, &dir.path().join("missing.xml"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));

    let err = service
        .sideload_package(TOKEN, &dir.path().join("missing.zip"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));

    assert!(transport.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_status_id_stays_one_path_segment() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport
        .discovery()
        .reply_json(202, json!({"statusId": "s1/../../acquisitions?x=1"}))
        .reply_json(200, json!({"titleId": "t5", "appId": "a5"}));

    let service = PackageService::new(context(&transport, &telemetry));
    let record = service
        .sideload_xml_manifest(TOKEN, &manifest(&dir))
        .await
        .unwrap();

    assert_eq!(record, TitleRecord::new("t5", "a5"));
    let requests = transport.requests();
    assert_eq!(
        requests[2].url.as_str(),
        "https://titles.example.com/dev/v1/users/packages/status/s1%2F..%2F..%2Facquisitions%3Fx=1"
    );
}

#[tokio::test(start_paused = true)]
async fn test_dot_status_id_is_rejected() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport
        .discovery()
        .reply_json(202, json!({"statusId": ".."}));

    let service = PackageService::new(context(&transport, &telemetry));
    let err = service
        .sideload_xml_manifest(TOKEN, &manifest(&dir))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::InvalidId(ref id) if id == ".."));
    assert_eq!(transport.requests().len(), 2);
}

// ============================================================================
// Zip Package
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_package_upload_acquire_and_poll() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport
        .discovery()
        .reply_json(200, json!({"operationId": "op1"}))
        .reply_json(200, json!({"statusId": "s1"}))
        .reply_json(200, json!({"titleId": "t3", "appId": "a3"}));

    let service = PackageService::new(context(&transport, &telemetry));
    let record = service
        .sideload_package(TOKEN, &zip_package(&dir))
        .await
        .unwrap();

    assert_eq!(record, TitleRecord::new("t3", "a3"));
    assert_eq!(
        transport.paths(),
        vec![
            "GET /config/v1/environment",
            "POST /dev/v1/users/packages",
            "POST /dev/v1/users/packages/acquisitions",
            "GET /dev/v1/users/packages/status/s1",
        ]
    );

    let requests = transport.requests();
    let RequestBody::Multipart(form) = &requests[1].body else {
        panic!("expected multipart upload");
    };
    assert!(form.content_type.is_none());
    assert_eq!(form.parts.len(), 1);
    assert!(form.file_bytes("package").is_some());
    assert_eq!(form.text_value("culture"), None);
    assert_eq!(
        requests[2].body,
        RequestBody::Json(json!({"operationId": "op1"}))
    );
}

#[tokio::test(start_paused = true)]
async fn test_invalid_zip_still_uploads() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport
        .discovery()
        .reply_json(202, json!({"operationId": "op1"}))
        .reply_json(200, json!({"statusId": "s1"}))
        .reply_json(200, json!({"titleId": "t4", "appId": "a4"}));

    let path = write_file(&dir, "broken.zip", b"not a zip at all");
    let service = PackageService::new(context(&transport, &telemetry));
    let record = service.sideload_package(TOKEN, &path).await.unwrap();

    assert_eq!(record, TitleRecord::new("t4", "a4"));
    assert_eq!(transport.count(Method::Post, "/dev/v1/users/packages"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_package_transport_failure_has_no_tracing_id() {
    let dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport
        .discovery()
        .fail(FetchError::Transport("Connection failed: reset".to_string()));

    let service = PackageService::new(context(&transport, &telemetry));
    let err = service
        .sideload_package(TOKEN, &zip_package(&dir))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Transport { .. }));
    assert!(err.tracing_id().is_none());
    assert!(err.http_fault().is_none());
}

// ============================================================================
// Retry
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_sideload_wrapped_in_retry() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir);
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport
        .reply(HttpResponse::new(503))
        .discovery()
        .reply_json(200, json!({"titleId": "t1", "appId": "a1"}));

    let service = PackageService::new(context(&transport, &telemetry));
    let record = service
        .with_retry(|| service.sideload_xml_manifest(TOKEN, &path))
        .await
        .unwrap();

    assert_eq!(record, TitleRecord::new("t1", "a1"));
    assert_eq!(transport.count(Method::Get, "/config/v1/environment"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_retry_does_not_repeat_not_found() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir);
    let transport = ScriptedTransport::new();
    let telemetry = RecordingTelemetry::new();
    transport.reply(HttpResponse::new(404));

    let service = PackageService::new(context(&transport, &telemetry));
    let err = service
        .with_retry(|| service.sideload_xml_manifest(TOKEN, &path))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Http(ref fault) if fault.status == 404));
    assert_eq!(transport.requests().len(), 1);
}
