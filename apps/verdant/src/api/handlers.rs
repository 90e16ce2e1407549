//! # API Endpoint Handlers
//!
//! One handler per endpoint. Handlers take the session lock, run one core
//! operation and answer with the refreshed view.

use super::{
    AppState,
    types::{
        AttachmentRequest, AuthorityQuery, AuthorityResponse, BalanceQuery, BalanceResponse,
        DashboardResponse, DecisionResponse, DetailResponse, ErrorResponse, FieldsRequest,
        HealthResponse, LandingResponse, ListingJson, MarketplaceQuery, MarketplaceResponse,
        ResetResponse, RoutesResponse, SortOption, UploadResponse,
    },
};
use crate::review::LoggingReviewBackend;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::time::Duration;
use verdant_core::{
    AttachmentId, CategoryFilter, CreditId, LedgerError, ProcessingTicket, Project, ProjectId,
    Repository, ReviewDesk, ReviewTab, Session, SortField, SortKey, Submission, SubmissionId,
    Timeframe, Verdict, bar_heights, category_counts, primitives::MAX_FIELD_LENGTH,
    sample::duplicate_credit_ids,
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// A core error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        Self(e)
    }
}

/// HTTP status for a core error.
pub fn status_for(error: &LedgerError) -> StatusCode {
    match error {
        LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
        LedgerError::InvalidTransition { .. } | LedgerError::NoAttachments => StatusCode::CONFLICT,
        LedgerError::MissingFields(_) | LedgerError::InvalidInput(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LedgerError::Config(_) | LedgerError::Serialization(_) => StatusCode::BAD_REQUEST,
        LedgerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }
        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Reject oversized query values before they reach the session.
fn bounded(name: &str, value: &str) -> Result<(), LedgerError> {
    if value.len() > MAX_FIELD_LENGTH {
        return Err(LedgerError::InvalidInput(format!(
            "{} exceeds {} bytes",
            name, MAX_FIELD_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// HEALTH & ROUTES
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Route table: every view with the endpoints serving it.
pub async fn routes_handler() -> Json<RoutesResponse> {
    Json(RoutesResponse {
        success: true,
        routes: super::route_table(),
    })
}

/// Drop every view's filters, selections and upload draft.
pub async fn session_reset_handler(State(state): State<AppState>) -> Json<ResetResponse> {
    state.session.write().await.reset();
    tracing::info!("Session view state reset");
    Json(ResetResponse { success: true })
}

// =============================================================================
// LANDING
// =============================================================================

pub async fn landing_handler(State(state): State<AppState>) -> ApiResult<LandingResponse> {
    let session = state.session.read().await;
    let repo = session.repository();
    Ok(Json(LandingResponse {
        success: true,
        features: repo.landing_features()?,
        stats: repo.landing_stats()?,
    }))
}

// =============================================================================
// DASHBOARD
// =============================================================================

pub async fn dashboard_handler(State(state): State<AppState>) -> ApiResult<DashboardResponse> {
    let session = state.session.read().await;
    Ok(Json(DashboardResponse {
        success: true,
        stats: session.dashboard_stats()?,
        projects: session.repository().list_projects()?,
        selected: session.selected_project()?,
    }))
}

pub async fn dashboard_select_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<DetailResponse<Project>> {
    let mut session = state.session.write().await;
    let project = session.select_project(ProjectId(id))?;
    Ok(Json(DetailResponse::open(project)))
}

pub async fn dashboard_close_handler(
    State(state): State<AppState>,
) -> Json<DetailResponse<Project>> {
    if let Some(id) = state.session.write().await.close_project() {
        tracing::debug!(project = %id, "Project detail closed");
    }
    Json(DetailResponse::closed())
}

// =============================================================================
// MARKETPLACE
// =============================================================================

/// Marketplace view. Given parameters replace the session's filter or sort;
/// absent ones keep the current value.
pub async fn marketplace_handler(
    State(state): State<AppState>,
    Query(params): Query<MarketplaceQuery>,
) -> ApiResult<MarketplaceResponse> {
    let mut session = state.session.write().await;

    let mut query = session.listing_query().clone();
    if let Some(category) = params.category.as_deref() {
        bounded("category", category)?;
        query.filter = CategoryFilter::parse(category);
    }
    if let Some(sort) = params.sort.as_deref() {
        bounded("sort", sort)?;
        query.sort = SortKey::parse(sort);
    }
    session.set_listing_query(query);

    let credits = session.repository().list_credits()?;
    let listings = session.marketplace_listings()?;
    let query = session.listing_query();

    Ok(Json(MarketplaceResponse {
        success: true,
        category: query.filter.as_str().to_string(),
        sort: query.sort.as_str().to_string(),
        categories: category_counts(&credits),
        sort_options: SortField::ALL.into_iter().map(SortOption::from).collect(),
        stats: session.repository().market_stats()?,
        listings: listings.into_iter().map(ListingJson::from).collect(),
        selected: session.selected_credit()?.map(ListingJson::from),
        duplicate_ids: duplicate_credit_ids(&credits)
            .into_iter()
            .map(|id| id.0)
            .collect(),
    }))
}

pub async fn marketplace_select_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<DetailResponse<ListingJson>> {
    let mut session = state.session.write().await;
    let credit = session.select_credit(CreditId(id))?;
    Ok(Json(DetailResponse::open(ListingJson::from(credit))))
}

pub async fn marketplace_close_handler(
    State(state): State<AppState>,
) -> Json<DetailResponse<ListingJson>> {
    if let Some(id) = state.session.write().await.close_credit() {
        tracing::debug!(credit = %id, "Listing detail closed");
    }
    Json(DetailResponse::closed())
}

// =============================================================================
// AUTHORITY
// =============================================================================

pub async fn authority_handler(
    State(state): State<AppState>,
    Query(params): Query<AuthorityQuery>,
) -> ApiResult<AuthorityResponse> {
    let mut session = state.session.write().await;
    if let Some(tab) = params.tab.as_deref() {
        let tab = tab.parse::<ReviewTab>()?;
        session.review_mut().show_tab(tab);
    }

    let tab = session.review().tab();
    let repo = session.repository();
    let (pending, recent) = match tab {
        ReviewTab::Pending => (repo.list_submissions()?, Vec::new()),
        ReviewTab::Recent => (Vec::new(), repo.list_decisions()?),
    };

    Ok(Json(AuthorityResponse {
        success: true,
        tab,
        tabs: ReviewDesk::tab_counts(repo)?,
        stats: repo.review_stats()?,
        pending,
        recent,
        selected: session.selected_submission()?,
    }))
}

pub async fn authority_select_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<DetailResponse<Submission>> {
    let mut session = state.session.write().await;
    let submission = session.open_submission(SubmissionId(id))?;
    Ok(Json(DetailResponse::open(submission)))
}

pub async fn authority_close_handler(
    State(state): State<AppState>,
) -> Json<DetailResponse<Submission>> {
    if let Some(id) = state.session.write().await.review_mut().close() {
        tracing::debug!(submission = %id, "Submission detail closed");
    }
    Json(DetailResponse::closed())
}

async fn decide(state: &AppState, id: u64, verdict: Verdict) -> ApiResult<DecisionResponse> {
    let mut session = state.session.write().await;
    session.decide(SubmissionId(id), verdict, &LoggingReviewBackend)?;
    Ok(Json(DecisionResponse {
        success: true,
        submission_id: id,
        verdict,
    }))
}

pub async fn approve_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<DecisionResponse> {
    decide(&state, id, Verdict::Approved).await
}

pub async fn reject_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<DecisionResponse> {
    decide(&state, id, Verdict::Rejected).await
}

// =============================================================================
// BALANCE
// =============================================================================

pub async fn balance_handler(
    State(state): State<AppState>,
    Query(params): Query<BalanceQuery>,
) -> ApiResult<BalanceResponse> {
    let mut session = state.session.write().await;
    if let Some(timeframe) = params.timeframe.as_deref() {
        session.set_timeframe(timeframe.parse::<Timeframe>()?);
    }

    let repo = session.repository();
    let summary = repo.balance_summary()?;
    let activity = repo.monthly_activity()?;

    Ok(Json(BalanceResponse {
        success: true,
        timeframe: session.timeframe(),
        value_display: summary.value_in_thousands(),
        summary,
        breakdown: repo.portfolio_breakdown()?,
        achievements: repo.achievements()?,
        bars: bar_heights(&activity),
        activity,
        transactions: repo.list_transactions()?,
        totals: session.transaction_totals()?,
    }))
}

// =============================================================================
// UPLOAD
// =============================================================================

fn upload_response(session: &Session) -> ApiResult<UploadResponse> {
    Ok(Json(UploadResponse::new(
        session.upload(),
        session.repository(),
    )?))
}

/// Current wizard state. Completes processing whose deadline has passed.
pub async fn upload_handler(State(state): State<AppState>) -> ApiResult<UploadResponse> {
    let now = state.now_ms();
    let mut session = state.session.write().await;
    if session.upload_mut().tick(now) {
        tracing::info!("Upload processing complete");
    }
    upload_response(&session)
}

/// Set form fields. Either every update applies or none does.
pub async fn upload_fields_handler(
    State(state): State<AppState>,
    Json(request): Json<FieldsRequest>,
) -> ApiResult<UploadResponse> {
    let updates = request.to_updates()?;
    let mut session = state.session.write().await;

    let mut wizard = session.upload().clone();
    for (field, value) in updates {
        wizard.set_field(field, value)?;
    }
    *session.upload_mut() = wizard;

    upload_response(&session)
}

pub async fn upload_continue_handler(State(state): State<AppState>) -> ApiResult<UploadResponse> {
    let mut session = state.session.write().await;
    session.upload_mut().continue_to_upload()?;
    upload_response(&session)
}

pub async fn upload_back_handler(State(state): State<AppState>) -> ApiResult<UploadResponse> {
    let mut session = state.session.write().await;
    session.upload_mut().back()?;
    upload_response(&session)
}

pub async fn upload_attach_handler(
    State(state): State<AppState>,
    Json(request): Json<AttachmentRequest>,
) -> ApiResult<UploadResponse> {
    let files = request.to_incoming()?;
    let mut session = state.session.write().await;
    let ids = session.upload_mut().attach_all(files)?;
    tracing::debug!(count = ids.len(), "Attached files");
    upload_response(&session)
}

/// Remove one attachment. Unknown ids leave the list as it is.
pub async fn upload_remove_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<UploadResponse> {
    let mut session = state.session.write().await;
    if !session.upload_mut().remove_attachment(AttachmentId(id))? {
        tracing::debug!(attachment = id, "Remove ignored: no such attachment");
    }
    upload_response(&session)
}

/// Submit and start the processing timer.
pub async fn upload_submit_handler(State(state): State<AppState>) -> ApiResult<UploadResponse> {
    let now = state.now_ms();
    let mut session = state.session.write().await;
    let ticket = session.upload_mut().submit(now)?;
    tracing::info!(
        files = session.upload().attachments().len(),
        delay_ms = ticket.delay_ms,
        "Upload submitted"
    );
    spawn_processing_timer(state.clone(), ticket);
    upload_response(&session)
}

pub async fn upload_another_handler(State(state): State<AppState>) -> ApiResult<UploadResponse> {
    let mut session = state.session.write().await;
    session.upload_mut().submit_another()?;
    upload_response(&session)
}

/// Abandon the upload from any step.
pub async fn upload_reset_handler(State(state): State<AppState>) -> ApiResult<UploadResponse> {
    let mut session = state.session.write().await;
    session.upload_mut().reset();
    upload_response(&session)
}

/// Complete processing once the ticket's delay has elapsed.
///
/// Fire-and-forget: the task is never cancelled or retried. A ticket from an
/// abandoned submit is a no-op.
fn spawn_processing_timer(state: AppState, ticket: ProcessingTicket) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(ticket.delay_ms)).await;
        let mut session = state.session.write().await;
        if session.upload_mut().finish_processing(ticket) {
            tracing::info!(generation = ticket.generation, "Upload processing complete");
        } else {
            tracing::debug!(
                generation = ticket.generation,
                "Processing timer expired without effect"
            );
        }
    });
}
