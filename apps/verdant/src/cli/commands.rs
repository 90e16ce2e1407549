//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//! JSON mode prints the same documents the HTTP API returns.

use crate::api::{
    self, AuthorityResponse, BalanceResponse, DashboardResponse, DecisionResponse, ListingJson,
    MarketplaceResponse, RoutesResponse, SortOption, UploadResponse,
};
use crate::config::AppConfig;
use crate::review::LoggingReviewBackend;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use verdant_core::{
    CreditId, DraftField, IncomingFile, LedgerError, ListingQuery, ProjectId, Repository,
    ReviewDesk, ReviewTab, SampleRepository, Session, SortField, SubmissionId, Timeframe, Verdict,
    bar_heights, category_counts, sample::duplicate_credit_ids,
};

/// Extensions attached as images.
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "tif", "tiff", "webp"];

// =============================================================================
// HELPERS
// =============================================================================

/// A fresh session over the sample store, configured by `config`.
fn load_session(config: &AppConfig) -> Session {
    Session::with_settings(SampleRepository::new(), config.session_settings())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), LedgerError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| LedgerError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// Validate a file path before reading its metadata.
///
/// Canonicalizes the path to resolve symlinks and "..", and ensures it is a
/// regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, LedgerError> {
    let canonical = path.canonicalize().map_err(|e| {
        LedgerError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(LedgerError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Content type reported for a local file.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        "image/*"
    } else {
        "application/octet-stream"
    }
}

/// Describe a local file as an incoming attachment.
pub fn incoming_file(path: &Path) -> Result<IncomingFile, LedgerError> {
    let validated = validate_file_path(path)?;
    let metadata = std::fs::metadata(&validated)
        .map_err(|e| LedgerError::Io(format!("Cannot read file metadata: {}", e)))?;
    let name = validated
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| LedgerError::Io(format!("Path '{}' has no file name", path.display())))?;

    Ok(IncomingFile::new(name, metadata.len(), content_type_for(&validated)))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), LedgerError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    println!("Verdant Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:             {}", config.server.host);
    println!("  Port:             {}", config.server.port);
    println!("  Processing delay: {} ms", config.upload.processing_delay_ms);
    println!(
        "  Rate limit:       {}",
        match config.server.rate_limit {
            0 => "disabled".to_string(),
            n => format!("{} req/s", n),
        }
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /health - Health check");
    println!("  GET  /routes - Views and endpoints");
    for route in api::route_table() {
        for endpoint in route.endpoints {
            println!("  {}", endpoint);
        }
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(config).await
}

// =============================================================================
// ROUTES COMMAND
// =============================================================================

/// Show views and their endpoints.
pub fn cmd_routes(json_mode: bool) -> Result<(), LedgerError> {
    let routes = api::route_table();

    if json_mode {
        return print_json(&RoutesResponse {
            success: true,
            routes,
        });
    }

    println!("Verdant Views");
    println!("=============");
    for route in routes {
        println!();
        println!("{:<14} {}", route.path, route.label);
        for endpoint in route.endpoints {
            println!("    {}", endpoint);
        }
    }
    Ok(())
}

// =============================================================================
// DASHBOARD COMMAND
// =============================================================================

/// Show dashboard totals and projects.
pub fn cmd_dashboard(
    config: &AppConfig,
    json_mode: bool,
    project: Option<u64>,
) -> Result<(), LedgerError> {
    let mut session = load_session(config);
    if let Some(id) = project {
        session.select_project(ProjectId(id))?;
    }

    let response = DashboardResponse {
        success: true,
        stats: session.dashboard_stats()?,
        projects: session.repository().list_projects()?,
        selected: session.selected_project()?,
    };

    if json_mode {
        return print_json(&response);
    }

    println!("Project Dashboard");
    println!("=================");
    println!("Total CO2 Offset: {} tons", response.stats.total_co2_offset_tons);
    println!("Total Credits:    {}", response.stats.total_credits);
    println!("Active Projects:  {}", response.stats.active_projects);
    println!("Verified:         {}", response.stats.verified_projects);
    println!();
    for p in &response.projects {
        println!(
            "  [{}] {:<36} {:<9} {:>3}%  {} credits",
            p.id,
            p.name,
            p.status.as_str(),
            p.progress_percent,
            p.credits
        );
    }

    if let Some(p) = &response.selected {
        println!();
        println!("{}", p.name);
        println!("  Location:      {}", p.location);
        println!("  CO2 absorbed:  {} tons", p.co2_absorbed_tons);
        println!("  Uploaded:      {}", p.upload_date);
        match p.verification_date {
            Some(date) => println!("  Verified:      {}", date),
            None => println!("  Verified:      -"),
        }
    }
    Ok(())
}

// =============================================================================
// MARKETPLACE COMMANDS
// =============================================================================

/// List marketplace credits under a filter and sort.
pub fn cmd_market(
    config: &AppConfig,
    json_mode: bool,
    category: &str,
    sort: &str,
) -> Result<(), LedgerError> {
    let mut session = load_session(config);
    session.set_listing_query(ListingQuery::parse(category, sort));

    let credits = session.repository().list_credits()?;
    let duplicates = duplicate_credit_ids(&credits);
    if !duplicates.is_empty() {
        tracing::warn!(?duplicates, "Marketplace listings share ids");
    }

    let listings: Vec<ListingJson> = session
        .marketplace_listings()?
        .into_iter()
        .map(ListingJson::from)
        .collect();

    if json_mode {
        let query = session.listing_query();
        return print_json(&MarketplaceResponse {
            success: true,
            category: query.filter.as_str().to_string(),
            sort: query.sort.as_str().to_string(),
            categories: category_counts(&credits),
            sort_options: SortField::ALL.into_iter().map(SortOption::from).collect(),
            stats: session.repository().market_stats()?,
            listings,
            selected: None,
            duplicate_ids: duplicates.into_iter().map(|id| id.0).collect(),
        });
    }

    println!("Carbon Credit Marketplace");
    println!("=========================");
    let counts: Vec<String> = category_counts(&credits)
        .into_iter()
        .map(|c| format!("{} ({})", c.label, c.count))
        .collect();
    println!("Categories: {}", counts.join(", "));
    println!(
        "Showing {} listing(s), category '{}', sorted by '{}'",
        listings.len(),
        category,
        sort
    );
    println!();
    for l in &listings {
        println!(
            "  [{}] {:<48} Rs {:>5}  {:>6} t  {} {}",
            l.credit.id,
            l.credit.project,
            l.credit.price,
            l.credit.co2_amount_tons,
            l.rating,
            l.trend_label
        );
    }
    Ok(())
}

/// Show one marketplace listing.
pub fn cmd_credit(config: &AppConfig, json_mode: bool, id: u64) -> Result<(), LedgerError> {
    let mut session = load_session(config);
    let listing = ListingJson::from(session.select_credit(CreditId(id))?);

    if json_mode {
        return print_json(&listing);
    }

    let c = &listing.credit;
    println!("{}", c.project);
    println!("{}", "=".repeat(c.project.len()));
    println!("Location:     {}", c.location);
    println!("Category:     {}", c.category.label());
    println!("Price:        Rs {} per credit", c.price);
    println!("CO2 amount:   {} tons", c.co2_amount_tons);
    println!("Available:    {} units", c.available_units);
    println!("Verification: {} (vintage {})", c.verification, c.vintage);
    println!("Seller:       {}", c.seller);
    println!("Rating:       {}  Trend: {}", listing.rating, listing.trend_label);
    println!();
    println!("{}", c.description);
    Ok(())
}

// =============================================================================
// AUTHORITY COMMANDS
// =============================================================================

/// Show the authority panel.
pub fn cmd_review(config: &AppConfig, json_mode: bool, tab: &str) -> Result<(), LedgerError> {
    let mut session = load_session(config);
    let tab = tab.parse::<ReviewTab>()?;
    session.review_mut().show_tab(tab);

    let repo = session.repository();
    let (pending, recent) = match tab {
        ReviewTab::Pending => (repo.list_submissions()?, Vec::new()),
        ReviewTab::Recent => (Vec::new(), repo.list_decisions()?),
    };
    let response = AuthorityResponse {
        success: true,
        tab,
        tabs: ReviewDesk::tab_counts(repo)?,
        stats: repo.review_stats()?,
        pending,
        recent,
        selected: None,
    };

    if json_mode {
        return print_json(&response);
    }

    println!("Authority Review Panel");
    println!("======================");
    let tabs: Vec<String> = response
        .tabs
        .iter()
        .map(|t| format!("{} ({})", t.label, t.count))
        .collect();
    println!("{}", tabs.join(" | "));
    println!();
    for s in &response.pending {
        println!(
            "  [{}] {:<34} {:<7} {} by {}, {} files",
            s.id,
            s.project_name,
            s.priority.as_str(),
            s.submission_date,
            s.submitter,
            s.files.len()
        );
    }
    for d in &response.recent {
        println!(
            "  [{}] {:<34} {:<8} {} by {}",
            d.id,
            d.project_name,
            d.verdict.as_str(),
            d.decision_date,
            d.reviewer
        );
        if let Some(reason) = &d.rejection_reason {
            println!("        reason: {}", reason);
        }
    }
    Ok(())
}

/// Approve or reject a pending submission.
pub fn cmd_decide(
    config: &AppConfig,
    json_mode: bool,
    id: u64,
    verdict: Verdict,
) -> Result<(), LedgerError> {
    let mut session = load_session(config);
    let submission = session.decide(SubmissionId(id), verdict, &LoggingReviewBackend)?;

    if json_mode {
        return print_json(&DecisionResponse {
            success: true,
            submission_id: id,
            verdict,
        });
    }

    println!("{} '{}' ({})", verdict.as_str(), submission.project_name, submission.submitter);
    Ok(())
}

// =============================================================================
// BALANCE COMMAND
// =============================================================================

/// Show the credit balance.
pub fn cmd_balance(
    config: &AppConfig,
    json_mode: bool,
    timeframe: &str,
) -> Result<(), LedgerError> {
    let mut session = load_session(config);
    session.set_timeframe(timeframe.parse::<Timeframe>()?);

    let repo = session.repository();
    let summary = repo.balance_summary()?;
    let activity = repo.monthly_activity()?;
    let response = BalanceResponse {
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
    };

    if json_mode {
        return print_json(&response);
    }

    let s = &response.summary;
    println!("My Carbon Credits");
    println!("=================");
    println!("Total Credits:   {}", s.total_credits);
    println!("Portfolio Value: Rs {}", response.value_display);
    println!("Monthly Gain:    +{}", s.monthly_gain);
    println!("CO2 Offset:      {} tons", s.co2_offset_tons);
    println!("Rank:            {}", s.rank);
    println!();
    println!("Portfolio:");
    for slice in &response.breakdown {
        println!("  {:<16} {:>6} ({}%)", slice.label, slice.amount, slice.percentage);
    }
    println!();
    println!("Activity ({}):", response.timeframe);
    for bar in &response.bars {
        println!(
            "  {:<4} {:<20} {}",
            bar.month,
            "#".repeat((bar.earned_percent / 5) as usize),
            "+".repeat((bar.traded_percent / 5) as usize)
        );
    }
    println!();
    println!("Recent Transactions:");
    for tx in &response.transactions {
        println!("  {}  {:>+6}  {}", tx.date, tx.amount, tx.project);
    }
    println!(
        "  Net: {} credits, Rs {}",
        response.totals.net_credits, response.totals.net_value
    );
    Ok(())
}

// =============================================================================
// UPLOAD COMMAND
// =============================================================================

/// Form values for the upload command.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub name: String,
    pub location: String,
    pub category: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub expected_co2: Option<String>,
    pub area: Option<String>,
    pub description: Option<String>,
}

impl UploadForm {
    /// Field updates in form order; unset optional fields are skipped.
    pub fn updates(&self) -> Vec<(DraftField, &str)> {
        let mut updates = vec![
            (DraftField::ProjectName, self.name.as_str()),
            (DraftField::Location, self.location.as_str()),
            (DraftField::Category, self.category.as_str()),
        ];
        let optional = [
            (DraftField::StartDate, &self.start_date),
            (DraftField::EndDate, &self.end_date),
            (DraftField::ExpectedCo2, &self.expected_co2),
            (DraftField::Area, &self.area),
            (DraftField::Description, &self.description),
        ];
        updates.extend(
            optional
                .into_iter()
                .filter_map(|(field, value)| value.as_deref().map(|v| (field, v))),
        );
        updates
    }
}

/// Fill the form, attach `files`, submit and wait for processing.
pub async fn cmd_upload(
    config: &AppConfig,
    json_mode: bool,
    form: &UploadForm,
    files: &[PathBuf],
) -> Result<(), LedgerError> {
    let incoming = files
        .iter()
        .map(|path| incoming_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = load_session(config);
    let wizard = session.upload_mut();

    for (field, value) in form.updates() {
        wizard.set_field(field, value)?;
    }
    wizard.continue_to_upload()?;
    wizard.attach_all(incoming)?;

    let ticket = wizard.submit(0)?;
    tracing::info!(
        files = wizard.attachments().len(),
        delay_ms = ticket.delay_ms,
        "Upload submitted"
    );
    if !json_mode {
        println!(
            "Processing {} file(s), {} bytes...",
            wizard.attachments().len(),
            wizard.attachments().total_bytes()
        );
    }

    tokio::time::sleep(Duration::from_millis(ticket.delay_ms)).await;
    if wizard.finish_processing(ticket) {
        tracing::info!(generation = ticket.generation, "Upload processing complete");
    } else {
        tracing::warn!(
            generation = ticket.generation,
            "Processing timer expired without effect"
        );
    }

    let response = UploadResponse::new(session.upload(), session.repository())?;
    if json_mode {
        return print_json(&response);
    }

    println!("Step {}: {}", response.step_number, response.step.label());
    if let Some(kind) = response
        .project_types
        .iter()
        .find(|t| t.id == response.draft.category)
    {
        println!("Project type: {}", kind.label);
    }
    for a in &response.attachments {
        println!("  [{}] {} ({}, {:?})", a.id, a.name, a.size_display, a.kind);
    }
    println!("Your project has been submitted for verification.");
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
