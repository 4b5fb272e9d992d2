//! Serde tests for core types.
//!
//! These tests pin the wire shapes the catalog service uses.

use serde_json::json;

use crate::{
    ActiveExperienceSet, ElementType, JobToken, LaunchInfo, MANIFEST_LOOKUP_ELEMENT_TYPES,
    TITLE_LOOKUP_ELEMENT_TYPES, TelemetryEvent, TitleRecord, UploadResponse, events, properties,
};

// ============================================================================
// TitleRecord / UploadResponse
// ============================================================================

#[test]
fn test_title_record_uses_camel_case() {
    let record = TitleRecord::new("t1", "a1");
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value, json!({"titleId": "t1", "appId": "a1"}));
}

#[test]
fn test_title_record_missing_app_id() {
    let result = TitleRecord::from_body(&json!({"titleId": "t1"}));
    assert!(result.is_err());
}

#[test]
fn test_manifest_upload_immediate() {
    let response =
        UploadResponse::from_manifest_upload(200, &json!({"titleId": "t1", "appId": "a1"}))
            .unwrap();
    assert!(response.is_terminal());
    assert_eq!(response, UploadResponse::Immediate(TitleRecord::new("t1", "a1")));
}

#[test]
fn test_manifest_upload_deferred() {
    let response = UploadResponse::from_manifest_upload(202, &json!({"statusId": "s1"})).unwrap();
    assert!(!response.is_terminal());
    assert_eq!(
        response,
        UploadResponse::Deferred(JobToken::Status("s1".to_string()))
    );
}

#[test]
fn test_manifest_upload_unexpected_status() {
    let response = UploadResponse::from_manifest_upload(204, &json!({})).unwrap();
    assert_eq!(response, UploadResponse::Unexpected(204));
}

#[test]
fn test_package_upload_yields_operation() {
    let token = JobToken::operation_from_body(&json!({"operationId": "op"})).unwrap();
    assert_eq!(token, JobToken::Operation("op".to_string()));
    assert_eq!(token.as_str(), "op");
}

#[test]
fn test_package_upload_missing_operation_id() {
    assert!(JobToken::operation_from_body(&json!({})).is_err());
    assert!(JobToken::operation_from_body(&json!({"operationId": 7})).is_err());
}

#[test]
fn test_acquisition_yields_status() {
    let token = JobToken::status_from_body(&json!({"statusId": "s9"})).unwrap();
    assert_eq!(token, JobToken::Status("s9".to_string()));
    assert!(JobToken::status_from_body(&json!(null)).is_err());
}

// ============================================================================
// LaunchInfo
// ============================================================================

#[test]
fn test_launch_info_plain_title_id() {
    let info = LaunchInfo::new(json!({"acquisition": {"titleId": "t1", "appId": "a1"}}));
    assert_eq!(info.title_id(), Some("t1"));
    assert_eq!(info.app_id(), Some("a1"));
}

#[test]
fn test_launch_info_nested_title_id() {
    let info = LaunchInfo::new(json!({"acquisition": {"titleId": {"id": "t2"}}}));
    assert_eq!(info.title_id(), Some("t2"));
    assert_eq!(info.app_id(), None);
}

#[test]
fn test_launch_info_without_acquisition() {
    let info = LaunchInfo::new(json!({"name": "app"}));
    assert_eq!(info.title_id(), None);
    assert_eq!(info.app_id(), None);
}

#[test]
fn test_launch_info_is_transparent() {
    let raw = r#"{"acquisition":{"titleId":"t1"}}"#;
    let info: LaunchInfo = serde_json::from_str(raw).unwrap();
    assert_eq!(serde_json::to_string(&info).unwrap(), raw);
}

// ============================================================================
// ElementType
// ============================================================================

#[test]
fn test_element_type_wire_names() {
    assert_eq!(serde_json::to_string(&ElementType::Aad).unwrap(), r#""AAD""#);
    assert_eq!(
        serde_json::to_string(&ElementType::OpenAiPlugins).unwrap(),
        r#""OpenAIPlugins""#
    );
    for ty in TITLE_LOOKUP_ELEMENT_TYPES {
        let json = serde_json::to_string(ty).unwrap();
        assert_eq!(json, format!("\"{}\"", ty.as_str()));
    }
}

#[test]
fn test_manifest_lookup_excludes_extensions() {
    assert!(!MANIFEST_LOOKUP_ELEMENT_TYPES.contains(&ElementType::Extensions));
    assert_eq!(
        MANIFEST_LOOKUP_ELEMENT_TYPES.len() + 1,
        TITLE_LOOKUP_ELEMENT_TYPES.len()
    );
}

#[test]
fn test_title_lookup_query() {
    let query = ElementType::join(TITLE_LOOKUP_ELEMENT_TYPES);
    assert!(query.starts_with("Extensions,OfficeAddIns,ExchangeAddIns,"));
    assert!(query.ends_with(",Gpts,DeclarativeCopilots,Plugins"));
}

// ============================================================================
// ActiveExperienceSet
// ============================================================================

#[test]
fn test_active_experiences_parse() {
    let set: ActiveExperienceSet = serde_json::from_value(json!({
        "activeExperiences": ["CopilotTeams", "Meetings"],
        "nextInterval": 3600
    }))
    .unwrap();
    assert_eq!(set.copilot_allowed(), Some(true));
    assert_eq!(set.contains("Chat"), Some(false));
    assert!(set.refresh_delay().is_none());
}

#[test]
fn test_active_experiences_absent() {
    let set: ActiveExperienceSet = serde_json::from_value(json!({})).unwrap();
    assert_eq!(set.copilot_allowed(), None);
    assert!(set.refresh_delay().is_none());
}

#[test]
fn test_active_experiences_from_body_is_lenient() {
    let set = ActiveExperienceSet::from_body(&json!({
        "activeExperiences": ["CopilotTeams", 3, null],
        "nextInterval": 5
    }));
    assert_eq!(set.copilot_allowed(), Some(true));
    assert_eq!(set.active_experiences.as_ref().map(|s| s.len()), Some(1));
    assert!(set.refresh_delay().is_some());

    let set = ActiveExperienceSet::from_body(&json!({
        "activeExperiences": {"CopilotTeams": true},
        "nextInterval": "5"
    }));
    assert_eq!(set, ActiveExperienceSet::default());

    for body in [json!(null), json!("text"), json!([1, 2])] {
        assert_eq!(ActiveExperienceSet::from_body(&body), ActiveExperienceSet::default());
    }
}

#[test]
fn test_refresh_delay_bounds() {
    let with_interval = |secs: f64| ActiveExperienceSet {
        active_experiences: None,
        next_interval: Some(secs),
    };
    assert_eq!(
        with_interval(5.0).refresh_delay(),
        Some(std::time::Duration::from_secs(5))
    );
    assert!(with_interval(0.0).refresh_delay().is_none());
    assert!(with_interval(10.0).refresh_delay().is_none());
    assert!(with_interval(15.0).refresh_delay().is_none());
    assert!(with_interval(-1.0).refresh_delay().is_none());
}

// ============================================================================
// TelemetryEvent
// ============================================================================

#[test]
fn test_telemetry_event_builder() {
    let event = TelemetryEvent::new("core", events::CHECK_COPILOT)
        .with_property(properties::IS_COPILOT_ALLOWED, "true");
    assert!(!event.is_error());
    assert_eq!(event.property(properties::IS_COPILOT_ALLOWED), Some("true"));

    let json = serde_json::to_value(&event).unwrap();
    assert!(json.get("error").is_none());
}

#[test]
fn test_telemetry_error_event() {
    let event = TelemetryEvent::new("core", events::CHECK_COPILOT).with_error("boom");
    assert!(event.is_error());
    assert_eq!(event.error.as_deref(), Some("boom"));
}
