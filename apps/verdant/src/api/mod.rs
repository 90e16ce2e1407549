//! # Verdant HTTP API Module
//!
//! This module implements the JSON API server using axum. Each client view
//! has one endpoint group; see [`view_endpoints`].
//!
//! ## Security Configuration
//!
//! Read from [`AppConfig`] (file or `VERDANT_*` environment):
//! - `cors_origins`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `rate_limit`: Requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use handlers::{ApiError, status_for};
pub use middleware::{create_rate_limiter, rate_limit_middleware};
pub use types::{
    AttachmentJson, AttachmentRequest, AuthorityQuery, AuthorityResponse, BalanceQuery,
    BalanceResponse, DashboardResponse, DecisionResponse, DetailResponse, ErrorResponse,
    FieldsRequest, FileJson, HealthResponse, LandingResponse, ListingJson, MarketplaceQuery,
    MarketplaceResponse, ResetResponse, RouteEntry, RoutesResponse, SortOption, StepJson,
    UploadResponse,
};

use crate::config::AppConfig;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use verdant_core::{LedgerError, SampleRepository, Session, View};

/// Maximum request body size.
const MAX_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the session.
#[derive(Clone)]
pub struct AppState {
    /// The session of the single visitor this server serves.
    pub session: Arc<RwLock<Session>>,
    pub config: Arc<AppConfig>,
    started: Instant,
}

impl AppState {
    /// Create app state around a session with default configuration.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self::with_config(session, AppConfig::default())
    }

    #[must_use]
    pub fn with_config(session: Session, config: AppConfig) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            config: Arc::new(config),
            started: Instant::now(),
        }
    }

    /// Create app state with a session built from `config`.
    #[must_use]
    pub fn from_config(config: AppConfig) -> Self {
        let session = Session::with_settings(SampleRepository::new(), config.session_settings());
        Self::with_config(session, config)
    }

    /// Milliseconds since the server started. The wizard's clock.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// Endpoints serving one view.
#[must_use]
pub fn view_endpoints(view: View) -> &'static [&'static str] {
    match view {
        View::Landing => &["GET /api/landing"],
        View::Dashboard => &[
            "GET /api/dashboard",
            "POST /api/dashboard/select/{id}",
            "POST /api/dashboard/close",
        ],
        View::Marketplace => &[
            "GET /api/marketplace?category=&sort=",
            "POST /api/marketplace/select/{id}",
            "POST /api/marketplace/close",
        ],
        View::Authority => &[
            "GET /api/authority?tab=",
            "POST /api/authority/select/{id}",
            "POST /api/authority/close",
            "POST /api/authority/submissions/{id}/approve",
            "POST /api/authority/submissions/{id}/reject",
        ],
        View::Balance => &["GET /api/balance?timeframe="],
        View::Upload => &[
            "GET /api/upload",
            "POST /api/upload/fields",
            "POST /api/upload/continue",
            "POST /api/upload/back",
            "POST /api/upload/attachments",
            "DELETE /api/upload/attachments/{id}",
            "POST /api/upload/submit",
            "POST /api/upload/another",
            "POST /api/upload/reset",
        ],
    }
}

/// Every view with its endpoints, in navigation order.
#[must_use]
pub fn route_table() -> Vec<RouteEntry> {
    View::ALL
        .iter()
        .map(|view| RouteEntry {
            path: view.path().to_string(),
            label: view.label().to_string(),
            endpoints: view_endpoints(*view)
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
        })
        .collect()
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from the configured origins.
///
/// - `Some("*")`: allows all origins (development mode - use with caution!)
/// - `None`: localhost only
/// - Otherwise: comma-separated list of allowed origins
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (cors_origins = \"*\"). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5173",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5173",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(state.config.server.cors_origins.as_deref());

    let rate_limit = state.config.server.rate_limit;
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/routes", get(handlers::routes_handler))
        .route("/api/landing", get(handlers::landing_handler))
        .route("/api/session/reset", post(handlers::session_reset_handler))
        // Dashboard
        .route("/api/dashboard", get(handlers::dashboard_handler))
        .route(
            "/api/dashboard/select/{id}",
            post(handlers::dashboard_select_handler),
        )
        .route("/api/dashboard/close", post(handlers::dashboard_close_handler))
        // Marketplace
        .route("/api/marketplace", get(handlers::marketplace_handler))
        .route(
            "/api/marketplace/select/{id}",
            post(handlers::marketplace_select_handler),
        )
        .route(
            "/api/marketplace/close",
            post(handlers::marketplace_close_handler),
        )
        // Authority
        .route("/api/authority", get(handlers::authority_handler))
        .route(
            "/api/authority/select/{id}",
            post(handlers::authority_select_handler),
        )
        .route("/api/authority/close", post(handlers::authority_close_handler))
        .route(
            "/api/authority/submissions/{id}/approve",
            post(handlers::approve_handler),
        )
        .route(
            "/api/authority/submissions/{id}/reject",
            post(handlers::reject_handler),
        )
        // Balance
        .route("/api/balance", get(handlers::balance_handler))
        // Upload
        .route("/api/upload", get(handlers::upload_handler))
        .route("/api/upload/fields", post(handlers::upload_fields_handler))
        .route("/api/upload/continue", post(handlers::upload_continue_handler))
        .route("/api/upload/back", post(handlers::upload_back_handler))
        .route(
            "/api/upload/attachments",
            post(handlers::upload_attach_handler),
        )
        .route(
            "/api/upload/attachments/{id}",
            delete(handlers::upload_remove_handler),
        )
        .route("/api/upload/submit", post(handlers::upload_submit_handler))
        .route("/api/upload/another", post(handlers::upload_another_handler))
        .route("/api/upload/reset", post(handlers::upload_reset_handler));

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and serve until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), LedgerError> {
    let addr = config.server.addr();
    let state = AppState::from_config(config);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LedgerError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Verdant HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LedgerError::Io(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
