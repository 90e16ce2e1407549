//! Integration tests for the Verdant HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::time::Duration;
use verdant::api::{
    AppState, AuthorityResponse, BalanceResponse, DashboardResponse, DecisionResponse,
    ErrorResponse, HealthResponse, LandingResponse, MarketplaceResponse, ResetResponse,
    RoutesResponse, UploadResponse, create_router,
};
use verdant::config::AppConfig;
use verdant_core::{
    AttachmentKind, ReviewTab, Session, Timeframe, Verdict, WizardStep,
    primitives::MAX_FIELD_LENGTH,
};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Config without the rate limiter so tests can fire requests freely.
fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.rate_limit = 0;
    config
}

/// Create a test server with a fresh session over the sample store.
fn create_test_server() -> TestServer {
    let state = AppState::with_config(Session::new(), test_config());
    TestServer::new(create_router(state)).unwrap()
}

/// Create a test server from a config, as `verdant server` would.
fn create_configured_server(config: AppConfig) -> TestServer {
    TestServer::new(create_router(AppState::from_config(config))).unwrap()
}

fn prices(response: &MarketplaceResponse) -> Vec<u64> {
    response.listings.iter().map(|l| l.credit.price).collect()
}

/// Move the wizard to the upload step with one image attached.
async fn prepare_upload(server: &TestServer) {
    server
        .post("/api/upload/fields")
        .json(&json!({"fields": {"projectName": "Reef Revival", "location": "Andaman Islands"}}))
        .await
        .assert_status_ok();
    server.post("/api/upload/continue").await.assert_status_ok();
    server
        .post("/api/upload/attachments")
        .json(&json!({"files": [
            {"name": "site.jpg", "size_bytes": 2048, "content_type": "image/jpeg"}
        ]}))
        .await
        .assert_status_ok();
}

// =============================================================================
// HEALTH & ROUTES TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_routes_lists_every_view() {
    let server = create_test_server();

    let response = server.get("/routes").await;

    response.assert_status_ok();
    let routes: RoutesResponse = response.json();
    let paths: Vec<&str> = routes.routes.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/",
            "/dashboard",
            "/upload",
            "/marketplace",
            "/authority",
            "/balance"
        ]
    );
    let upload = routes.routes.iter().find(|r| r.path == "/upload").unwrap();
    assert!(upload.endpoints.iter().any(|e| e == "POST /api/upload/submit"));
}

#[tokio::test]
async fn test_landing() {
    let server = create_test_server();

    let response = server.get("/api/landing").await;

    response.assert_status_ok();
    let landing: LandingResponse = response.json();
    assert!(landing.success);
    assert!(!landing.features.is_empty());
    assert!(!landing.stats.is_empty());
}

// =============================================================================
// DASHBOARD TESTS
// =============================================================================

#[tokio::test]
async fn test_dashboard_totals() {
    let server = create_test_server();

    let response = server.get("/api/dashboard").await;

    response.assert_status_ok();
    let dashboard: DashboardResponse = response.json();
    assert_eq!(dashboard.projects.len(), 4);
    assert_eq!(dashboard.stats.total_co2_offset_tons, 65_040);
    assert_eq!(dashboard.stats.total_credits, 6_504);
    assert_eq!(dashboard.stats.active_projects, 3);
    assert_eq!(dashboard.stats.verified_projects, 2);
    assert!(dashboard.selected.is_none());
}

#[tokio::test]
async fn test_dashboard_select_and_close() {
    let server = create_test_server();

    let response = server.post("/api/dashboard/select/1").await;
    response.assert_status_ok();
    let detail: Value = response.json();
    assert_eq!(detail["selected"]["name"], "Amazon Reforestation Initiative");

    let dashboard: DashboardResponse = server.get("/api/dashboard").await.json();
    assert_eq!(dashboard.selected.unwrap().id.0, 1);

    server.post("/api/dashboard/close").await.assert_status_ok();
    let dashboard: DashboardResponse = server.get("/api/dashboard").await.json();
    assert!(dashboard.selected.is_none());
}

#[tokio::test]
async fn test_dashboard_select_unknown_project() {
    let server = create_test_server();

    let response = server.post("/api/dashboard/select/99").await;

    response.assert_status_not_found();
    let error: ErrorResponse = response.json();
    assert!(!error.success);
}

// =============================================================================
// MARKETPLACE TESTS
// =============================================================================

#[tokio::test]
async fn test_marketplace_initial_view() {
    let server = create_test_server();

    let response = server.get("/api/marketplace").await;

    response.assert_status_ok();
    let market: MarketplaceResponse = response.json();
    assert_eq!(market.category, "all");
    assert_eq!(market.sort, "price");
    assert_eq!(prices(&market), vec![1000, 1200, 1400, 1800]);
    assert_eq!(market.sort_options.len(), 3);
    assert!(market.duplicate_ids.is_empty());
}

#[tokio::test]
async fn test_marketplace_filter_and_sort() {
    let server = create_test_server();

    let response = server
        .get("/api/marketplace")
        .add_query_param("category", "reforestation")
        .add_query_param("sort", "price")
        .await;

    response.assert_status_ok();
    let market: MarketplaceResponse = response.json();
    assert_eq!(prices(&market), vec![1200, 1400]);
    assert!(
        market
            .listings
            .iter()
            .all(|l| l.credit.category.as_str() == "reforestation")
    );
}

#[tokio::test]
async fn test_marketplace_query_is_remembered() {
    let server = create_test_server();

    server
        .get("/api/marketplace")
        .add_query_param("category", "reforestation")
        .await
        .assert_status_ok();

    // No parameters: the session keeps the previous filter.
    let market: MarketplaceResponse = server.get("/api/marketplace").await.json();
    assert_eq!(market.category, "reforestation");
    assert_eq!(market.listings.len(), 2);
}

#[tokio::test]
async fn test_marketplace_unknown_sort_keeps_store_order() {
    let server = create_test_server();

    let response = server
        .get("/api/marketplace")
        .add_query_param("sort", "vintage")
        .await;

    response.assert_status_ok();
    let market: MarketplaceResponse = response.json();
    assert_eq!(market.sort, "vintage");
    assert_eq!(prices(&market), vec![1400, 1800, 1000, 1200]);
}

#[tokio::test]
async fn test_marketplace_unknown_category_is_empty() {
    let server = create_test_server();

    let response = server
        .get("/api/marketplace")
        .add_query_param("category", "geothermal")
        .await;

    response.assert_status_ok();
    let market: MarketplaceResponse = response.json();
    assert!(market.listings.is_empty());
}

#[tokio::test]
async fn test_marketplace_oversized_query_rejected() {
    let server = create_test_server();

    let response = server
        .get("/api/marketplace")
        .add_query_param("category", "x".repeat(MAX_FIELD_LENGTH + 1))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_marketplace_select_listing() {
    let server = create_test_server();

    let response = server.post("/api/marketplace/select/1").await;
    response.assert_status_ok();
    let detail: Value = response.json();
    assert_eq!(detail["selected"]["rating"], "4.9");
    assert_eq!(detail["selected"]["trend_label"], "+11%");

    let market: MarketplaceResponse = server.get("/api/marketplace").await.json();
    assert_eq!(market.selected.unwrap().credit.price, 1400);

    let response = server.post("/api/marketplace/close").await;
    response.assert_status_ok();
    let detail: Value = response.json();
    assert_eq!(detail["selected"], Value::Null);
}

#[tokio::test]
async fn test_marketplace_select_unknown_listing() {
    let server = create_test_server();

    server
        .post("/api/marketplace/select/42")
        .await
        .assert_status_not_found();
}

// =============================================================================
// AUTHORITY TESTS
// =============================================================================

#[tokio::test]
async fn test_authority_pending_tab() {
    let server = create_test_server();

    let response = server.get("/api/authority").await;

    response.assert_status_ok();
    let panel: AuthorityResponse = response.json();
    assert_eq!(panel.tab, ReviewTab::Pending);
    assert_eq!(panel.pending.len(), 3);
    assert!(panel.recent.is_empty());
    assert_eq!(panel.tabs.len(), 2);
    assert_eq!(panel.tabs[0].count, 3);
    assert_eq!(panel.tabs[1].count, 3);
}

#[tokio::test]
async fn test_authority_recent_tab() {
    let server = create_test_server();

    let response = server
        .get("/api/authority")
        .add_query_param("tab", "recent")
        .await;

    response.assert_status_ok();
    let panel: AuthorityResponse = response.json();
    assert_eq!(panel.tab, ReviewTab::Recent);
    assert!(panel.pending.is_empty());
    let ids: Vec<u64> = panel.recent.iter().map(|d| d.id.0).collect();
    assert_eq!(ids, vec![4, 5, 6]);
}

#[tokio::test]
async fn test_authority_unknown_tab() {
    let server = create_test_server();

    let response = server
        .get("/api/authority")
        .add_query_param("tab", "archived")
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_authority_open_and_close_submission() {
    let server = create_test_server();

    let response = server.post("/api/authority/select/2").await;
    response.assert_status_ok();
    let detail: Value = response.json();
    assert_eq!(detail["selected"]["project_name"], "Community Solar Grid");

    let panel: AuthorityResponse = server.get("/api/authority").await.json();
    assert_eq!(panel.selected.unwrap().id.0, 2);

    server.post("/api/authority/close").await.assert_status_ok();
    let panel: AuthorityResponse = server.get("/api/authority").await.json();
    assert!(panel.selected.is_none());
}

#[tokio::test]
async fn test_authority_select_decided_submission() {
    let server = create_test_server();

    // Decisions are not in the pending queue.
    server
        .post("/api/authority/select/4")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_approve_closes_detail() {
    let server = create_test_server();
    server.post("/api/authority/select/1").await.assert_status_ok();

    let response = server.post("/api/authority/submissions/1/approve").await;

    response.assert_status_ok();
    let decision: DecisionResponse = response.json();
    assert_eq!(decision.submission_id, 1);
    assert_eq!(decision.verdict, Verdict::Approved);

    let panel: AuthorityResponse = server.get("/api/authority").await.json();
    assert!(panel.selected.is_none());
}

#[tokio::test]
async fn test_reject_submission() {
    let server = create_test_server();

    let response = server.post("/api/authority/submissions/3/reject").await;

    response.assert_status_ok();
    let decision: DecisionResponse = response.json();
    assert_eq!(decision.verdict, Verdict::Rejected);
}

#[tokio::test]
async fn test_decide_unknown_submission_keeps_detail() {
    let server = create_test_server();
    server.post("/api/authority/select/1").await.assert_status_ok();

    server
        .post("/api/authority/submissions/77/approve")
        .await
        .assert_status_not_found();

    let panel: AuthorityResponse = server.get("/api/authority").await.json();
    assert_eq!(panel.selected.unwrap().id.0, 1);
}

// =============================================================================
// BALANCE TESTS
// =============================================================================

#[tokio::test]
async fn test_balance_defaults() {
    let server = create_test_server();

    let response = server.get("/api/balance").await;

    response.assert_status_ok();
    let balance: BalanceResponse = response.json();
    assert_eq!(balance.timeframe, Timeframe::Month);
    assert_eq!(balance.value_display, "678.5K");
    assert_eq!(balance.totals.net_credits, 3_624);
    assert_eq!(balance.totals.net_value, 163_080);
    assert_eq!(balance.bars.len(), balance.activity.len());
}

#[tokio::test]
async fn test_balance_timeframe() {
    let server = create_test_server();

    let response = server
        .get("/api/balance")
        .add_query_param("timeframe", "year")
        .await;
    response.assert_status_ok();
    let balance: BalanceResponse = response.json();
    assert_eq!(balance.timeframe, Timeframe::Year);

    let response = server
        .get("/api/balance")
        .add_query_param("timeframe", "decade")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    // The rejected value left the timeframe alone.
    let balance: BalanceResponse = server.get("/api/balance").await.json();
    assert_eq!(balance.timeframe, Timeframe::Year);
}

// =============================================================================
// UPLOAD WIZARD TESTS
// =============================================================================

#[tokio::test]
async fn test_upload_initial_state() {
    let server = create_test_server();

    let response = server.get("/api/upload").await;

    response.assert_status_ok();
    let upload: UploadResponse = response.json();
    assert_eq!(upload.step, WizardStep::ProjectInfo);
    assert_eq!(upload.steps.len(), 4);
    assert!(!upload.can_submit);
}

#[tokio::test]
async fn test_upload_lists_step_options() {
    let server = create_test_server();

    let upload: UploadResponse = server.get("/api/upload").await.json();

    assert_eq!(upload.project_types.len(), 4);
    assert_eq!(upload.project_types[0].label, "Reforestation");
    assert_eq!(upload.project_types[3].label, "Ocean Cleanup");
    assert_eq!(upload.data_types.len(), 4);
    assert_eq!(upload.data_types[1].label, "Satellite Images");
}

#[tokio::test]
async fn test_upload_fields_and_navigation() {
    let server = create_test_server();

    let response = server
        .post("/api/upload/fields")
        .json(&json!({"fields": {
            "projectName": "Reef Revival",
            "startDate": "2024-03-01",
            "expectedCO2": "1,500"
        }}))
        .await;
    response.assert_status_ok();
    let upload: UploadResponse = response.json();
    assert_eq!(upload.draft.project_name, "Reef Revival");
    assert_eq!(upload.draft.expected_co2_tons, Some(1_500));

    let upload: UploadResponse = server.post("/api/upload/continue").await.json();
    assert_eq!(upload.step, WizardStep::DataUpload);

    let upload: UploadResponse = server.post("/api/upload/back").await.json();
    assert_eq!(upload.step, WizardStep::ProjectInfo);
    assert_eq!(upload.draft.project_name, "Reef Revival");
}

#[tokio::test]
async fn test_upload_fields_are_atomic() {
    let server = create_test_server();

    let response = server
        .post("/api/upload/fields")
        .json(&json!({"fields": {"projectName": "Reef Revival", "startDate": "March 1st"}}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let upload: UploadResponse = server.get("/api/upload").await.json();
    assert_eq!(upload.draft.project_name, "");
}

#[tokio::test]
async fn test_upload_unknown_field() {
    let server = create_test_server();

    let response = server
        .post("/api/upload/fields")
        .json(&json!({"fields": {"budget": "9000"}}))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_upload_back_on_first_step_conflicts() {
    let server = create_test_server();

    let response = server.post("/api/upload/back").await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_upload_attach_and_remove() {
    let server = create_test_server();
    server.post("/api/upload/continue").await.assert_status_ok();

    let response = server
        .post("/api/upload/attachments")
        .json(&json!({"files": [
            {"name": "site.jpg", "size_bytes": 1310720, "content_type": "image/jpeg"},
            {"name": "plots.csv", "size_bytes": 512, "content_type": "text/csv"}
        ]}))
        .await;
    response.assert_status_ok();
    let upload: UploadResponse = response.json();
    assert_eq!(upload.attachments.len(), 2);
    assert_eq!(upload.attachments[0].kind, AttachmentKind::Image);
    assert_eq!(upload.attachments[0].size_display, "1.25 MiB");
    assert_eq!(upload.attachments[1].kind, AttachmentKind::Document);
    assert!(upload.can_submit);

    let first = upload.attachments[0].id;
    let upload: UploadResponse = server
        .delete(&format!("/api/upload/attachments/{}", first))
        .await
        .json();
    assert_eq!(upload.attachments.len(), 1);
    assert_eq!(upload.attachments[0].name, "plots.csv");

    // Unknown ids leave the list alone.
    let response = server.delete("/api/upload/attachments/999").await;
    response.assert_status_ok();
    let upload: UploadResponse = response.json();
    assert_eq!(upload.attachments.len(), 1);
}

#[tokio::test]
async fn test_upload_attach_on_first_step_conflicts() {
    let server = create_test_server();

    let response = server
        .post("/api/upload/attachments")
        .json(&json!({"files": [{"name": "site.jpg", "size_bytes": 10}]}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_upload_submit_without_files() {
    let server = create_test_server();
    server.post("/api/upload/continue").await.assert_status_ok();

    let response = server.post("/api/upload/submit").await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let upload: UploadResponse = server.get("/api/upload").await.json();
    assert_eq!(upload.step, WizardStep::DataUpload);
}

#[tokio::test]
async fn test_upload_processing_completes() {
    let mut config = test_config();
    config.upload.processing_delay_ms = 20;
    let server = create_configured_server(config);
    prepare_upload(&server).await;

    let response = server.post("/api/upload/submit").await;
    response.assert_status_ok();
    let upload: UploadResponse = response.json();
    assert_eq!(upload.step, WizardStep::Processing);
    assert_eq!(upload.processing_delay_ms, 20);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let upload: UploadResponse = server.get("/api/upload").await.json();
    assert_eq!(upload.step, WizardStep::Complete);
    assert!(upload.steps.iter().take(3).all(|s| s.done));

    // Completion does not add anything to the review queue.
    let panel: AuthorityResponse = server.get("/api/authority").await.json();
    assert_eq!(panel.pending.len(), 3);
}

#[tokio::test]
async fn test_upload_submit_another() {
    let mut config = test_config();
    config.upload.processing_delay_ms = 10;
    let server = create_configured_server(config);
    prepare_upload(&server).await;

    // Not complete yet.
    let response = server.post("/api/upload/another").await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    server.post("/api/upload/submit").await.assert_status_ok();
    tokio::time::sleep(Duration::from_millis(80)).await;

    let response = server.post("/api/upload/another").await;
    response.assert_status_ok();
    let upload: UploadResponse = response.json();
    assert_eq!(upload.step, WizardStep::ProjectInfo);
    assert_eq!(upload.draft.project_name, "");
    assert!(upload.attachments.is_empty());
}

#[tokio::test]
async fn test_upload_reset_abandons_processing() {
    let mut config = test_config();
    config.upload.processing_delay_ms = 30;
    let server = create_configured_server(config);
    prepare_upload(&server).await;
    server.post("/api/upload/submit").await.assert_status_ok();

    let response = server.post("/api/upload/reset").await;
    response.assert_status_ok();
    let upload: UploadResponse = response.json();
    assert_eq!(upload.step, WizardStep::ProjectInfo);

    // The abandoned timer fires without effect.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let upload: UploadResponse = server.get("/api/upload").await.json();
    assert_eq!(upload.step, WizardStep::ProjectInfo);
}

#[tokio::test]
async fn test_upload_required_fields_policy() {
    let mut config = test_config();
    config.upload.require_fields = true;
    let server = create_configured_server(config);

    let response = server.post("/api/upload/continue").await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("project_name"));
}

// =============================================================================
// SESSION TESTS
// =============================================================================

#[tokio::test]
async fn test_session_reset_restores_defaults() {
    let server = create_test_server();
    server
        .get("/api/marketplace")
        .add_query_param("category", "solar")
        .await
        .assert_status_ok();
    server.post("/api/marketplace/select/1").await.assert_status_ok();
    prepare_upload(&server).await;

    let response = server.post("/api/session/reset").await;
    response.assert_status_ok();
    let reset: ResetResponse = response.json();
    assert!(reset.success);

    let market: MarketplaceResponse = server.get("/api/marketplace").await.json();
    assert_eq!(market.category, "all");
    assert!(market.selected.is_none());
    let upload: UploadResponse = server.get("/api/upload").await.json();
    assert_eq!(upload.step, WizardStep::ProjectInfo);
    assert!(upload.attachments.is_empty());
}

#[tokio::test]
async fn test_session_reset_abandons_processing() {
    let mut config = test_config();
    config.upload.processing_delay_ms = 30;
    let server = create_configured_server(config);
    prepare_upload(&server).await;
    server.post("/api/upload/submit").await.assert_status_ok();

    server.post("/api/session/reset").await.assert_status_ok();
    server.post("/api/upload/continue").await.assert_status_ok();
    server
        .post("/api/upload/attachments")
        .json(&json!({"files": [{"name": "plots.csv", "size_bytes": 12}]}))
        .await
        .assert_status_ok();

    // The timer from before the reset must not finish the new draft.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let upload: UploadResponse = server.get("/api/upload").await.json();
    assert_eq!(upload.step, WizardStep::DataUpload);
    assert_eq!(upload.attachments.len(), 1);
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_unknown_route() {
    let server = create_test_server();

    server.get("/api/nonexistent").await.assert_status_not_found();
}

#[tokio::test]
async fn test_wrong_method() {
    let server = create_test_server();

    let response = server.get("/api/upload/submit").await;

    assert_eq!(response.status_code().as_u16(), 405);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let server = create_test_server();

    let response = server
        .post("/api/upload/fields")
        .text("{not json")
        .content_type("application/json")
        .await;

    assert!(response.status_code().is_client_error());
}

// =============================================================================
// CORS & RATE LIMIT TESTS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_localhost_origin() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("http://localhost:5173"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_cors_ignores_foreign_origin() {
    let server = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("https://evil.example"),
        )
        .await;

    response.assert_status_ok();
    assert!(
        response
            .maybe_header(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_rate_limit_rejects_burst() {
    let mut config = test_config();
    config.server.rate_limit = 1;
    let server = create_configured_server(config);

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let error: ErrorResponse = response.json();
    assert_eq!(error.error, "Too Many Requests");
}
