//! Unit tests for API types serialization/deserialization and validation.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use verdant::api::{
    AttachmentJson, AttachmentRequest, DetailResponse, ErrorResponse, FieldsRequest, FileJson,
    HealthResponse, ListingJson, UploadResponse, status_for,
};
use verdant_core::{
    AttachmentKind, DraftField, IncomingFile, LedgerError, Repository, SampleRepository,
    UploadWizard, WizardStep,
    primitives::{MAX_ATTACHMENT_NAME_LENGTH, MAX_ATTACHMENTS_PER_REQUEST},
};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_health_response_deserialization() {
    let json = r#"{"status":"healthy","version":"1.0.0"}"#;
    let health: HealthResponse = serde_json::from_str(json).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "1.0.0");
}

// =============================================================================
// ERROR RESPONSE TESTS
// =============================================================================

#[test]
fn test_error_response_shape() {
    let json = serde_json::to_value(ErrorResponse::new("credit not found: 9")).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "credit not found: 9");
}

#[test]
fn test_status_mapping() {
    assert_eq!(status_for(&LedgerError::not_found("credit", 1)), StatusCode::NOT_FOUND);
    assert_eq!(
        status_for(&LedgerError::InvalidTransition {
            from: 1,
            action: "submit"
        }),
        StatusCode::CONFLICT
    );
    assert_eq!(status_for(&LedgerError::NoAttachments), StatusCode::CONFLICT);
    assert_eq!(
        status_for(&LedgerError::MissingFields(vec!["location"])),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        status_for(&LedgerError::InvalidInput("x".to_string())),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(status_for(&LedgerError::Config("x".to_string())), StatusCode::BAD_REQUEST);
    assert_eq!(
        status_for(&LedgerError::Io("x".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

// =============================================================================
// DETAIL & LISTING TESTS
// =============================================================================

#[test]
fn test_detail_response_closed_serializes_null() {
    let json = serde_json::to_string(&DetailResponse::<ListingJson>::closed()).unwrap();
    assert_eq!(json, r#"{"success":true,"selected":null}"#);
}

#[test]
fn test_listing_json_flattens_credit() {
    let credit = SampleRepository::new()
        .find_credit(verdant_core::CreditId(1))
        .unwrap();
    let json = serde_json::to_value(ListingJson::from(credit)).unwrap();

    assert_eq!(json["id"], 1);
    assert_eq!(json["price"], 1400);
    assert_eq!(json["category"], "reforestation");
    assert_eq!(json["rating_tenths"], 49);
    assert_eq!(json["rating"], "4.9");
    assert_eq!(json["trend_label"], "+11%");
}

#[test]
fn test_listing_json_round_trip() {
    let credit = SampleRepository::new()
        .find_credit(verdant_core::CreditId(2))
        .unwrap();
    let json = serde_json::to_string(&ListingJson::from(credit.clone())).unwrap();
    let back: ListingJson = serde_json::from_str(&json).unwrap();
    assert_eq!(back.credit, credit);
}

// =============================================================================
// FIELDS REQUEST TESTS
// =============================================================================

#[test]
fn test_fields_request_accepts_both_spellings() {
    let request: FieldsRequest = serde_json::from_str(
        r#"{"fields":{"projectName":"Reef Revival","expected_co2":"1200"}}"#,
    )
    .unwrap();
    let updates = request.to_updates().unwrap();

    assert!(updates.contains(&(DraftField::ProjectName, "Reef Revival")));
    assert!(updates.contains(&(DraftField::ExpectedCo2, "1200")));
}

#[test]
fn test_fields_request_rejects_unknown_field() {
    let request: FieldsRequest =
        serde_json::from_str(r#"{"fields":{"projectName":"A","budget":"9"}}"#).unwrap();
    assert!(matches!(
        request.to_updates(),
        Err(LedgerError::InvalidInput(_))
    ));
}

#[test]
fn test_fields_request_rejects_empty() {
    let request = FieldsRequest::default();
    assert!(request.to_updates().is_err());
}

// =============================================================================
// ATTACHMENT REQUEST TESTS
// =============================================================================

fn file(name: &str) -> FileJson {
    FileJson {
        name: name.to_string(),
        size_bytes: 10,
        content_type: "text/csv".to_string(),
    }
}

#[test]
fn test_attachment_request_valid() {
    let request: AttachmentRequest = serde_json::from_str(
        r#"{"files":[{"name":"a.jpg","size_bytes":2048,"content_type":"image/jpeg"},{"name":"b.csv","size_bytes":12}]}"#,
    )
    .unwrap();
    let incoming = request.to_incoming().unwrap();

    assert_eq!(incoming.len(), 2);
    assert_eq!(incoming[0], IncomingFile::new("a.jpg", 2048, "image/jpeg"));
    // Missing content type defaults to empty, which classifies as a document.
    assert_eq!(incoming[1].content_type, "");
}

#[test]
fn test_attachment_request_empty_rejected() {
    let request = AttachmentRequest::default();
    assert!(request.to_incoming().is_err());
}

#[test]
fn test_attachment_request_too_many_files() {
    let request = AttachmentRequest {
        files: (0..=MAX_ATTACHMENTS_PER_REQUEST)
            .map(|i| file(&format!("f{}.csv", i)))
            .collect(),
    };
    assert!(request.to_incoming().is_err());
}

#[test]
fn test_attachment_request_name_limits() {
    let blank = AttachmentRequest {
        files: vec![file("   ")],
    };
    assert!(blank.to_incoming().is_err());

    let long = AttachmentRequest {
        files: vec![file(&"x".repeat(MAX_ATTACHMENT_NAME_LENGTH + 1))],
    };
    assert!(long.to_incoming().is_err());

    let at_limit = AttachmentRequest {
        files: vec![file(&"x".repeat(MAX_ATTACHMENT_NAME_LENGTH))],
    };
    assert!(at_limit.to_incoming().is_ok());
}

// =============================================================================
// UPLOAD RESPONSE TESTS
// =============================================================================

#[test]
fn test_upload_response_initial() {
    let response = UploadResponse::new(&UploadWizard::new(), &SampleRepository::new()).unwrap();

    assert_eq!(response.step, WizardStep::ProjectInfo);
    assert_eq!(response.step_number, 1);
    assert_eq!(response.steps.len(), 4);
    assert!(response.steps[0].current);
    assert!(!response.steps[0].done);
    assert!(!response.can_submit);
    assert!(response.attachments.is_empty());
}

#[test]
fn test_upload_response_carries_step_options() {
    let response = UploadResponse::new(&UploadWizard::new(), &SampleRepository::new()).unwrap();

    assert_eq!(response.project_types.len(), 4);
    assert_eq!(response.project_types[1].label, "Solar Energy");
    let ids: Vec<&str> = response.data_types.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["plantation", "satellite", "iot", "photos"]);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["project_types"][0]["id"], "reforestation");
    assert_eq!(json["data_types"][2]["description"], "Sensor data and measurements");
}

#[test]
fn test_upload_response_marks_done_steps() {
    let mut wizard = UploadWizard::new();
    wizard.continue_to_upload().unwrap();
    wizard
        .attach(IncomingFile::new("scan.png", 1_310_720, "image/png"))
        .unwrap();
    let response = UploadResponse::new(&wizard, &SampleRepository::new()).unwrap();

    assert!(response.steps[0].done);
    assert!(response.steps[1].current);
    assert!(response.can_submit);
    assert_eq!(response.total_bytes, 1_310_720);

    let attachment: &AttachmentJson = &response.attachments[0];
    assert_eq!(attachment.kind, AttachmentKind::Image);
    assert_eq!(attachment.size_display, "1.25 MiB");
}

#[test]
fn test_upload_response_step_serializes_snake_case() {
    let response = UploadResponse::new(&UploadWizard::new(), &SampleRepository::new()).unwrap();
    let json = serde_json::to_value(response).unwrap();
    assert_eq!(json["step"], "project_info");
    assert_eq!(json["draft"]["category"], "reforestation");
    assert_eq!(json["draft"]["start_date"], serde_json::Value::Null);
}
