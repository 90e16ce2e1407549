//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use verdant_core::{
    Achievement, Attachment, AttachmentKind, BalanceSummary, BarHeights, CarbonCredit,
    CategoryCount, DashboardStats, DataTypeGuide, Decision, DraftField, Feature, HeadlineStat,
    IncomingFile, LedgerError, MonthlyActivity, PortfolioSlice, Project, ProjectTypeOption,
    Repository, ReviewTab, SortField, Submission, TabCount, Timeframe, Transaction,
    TransactionTotals, UploadDraft, UploadWizard, Verdict, WizardStep,
    primitives::{MAX_ATTACHMENT_NAME_LENGTH, MAX_ATTACHMENTS_PER_REQUEST},
};

// =============================================================================
// COMMON RESPONSES
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

/// The record open in a detail view, after a select or close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse<T> {
    pub success: bool,
    pub selected: Option<T>,
}

impl<T> DetailResponse<T> {
    pub fn open(item: T) -> Self {
        Self {
            success: true,
            selected: Some(item),
        }
    }

    pub fn closed() -> Self {
        Self {
            success: true,
            selected: None,
        }
    }
}

// =============================================================================
// ROUTES
// =============================================================================

/// One view and the endpoints that serve it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub path: String,
    pub label: String,
    pub endpoints: Vec<String>,
}

/// Route table response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesResponse {
    pub success: bool,
    pub routes: Vec<RouteEntry>,
}

/// Answer to a session reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
}

// =============================================================================
// LANDING
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingResponse {
    pub success: bool,
    pub features: Vec<Feature>,
    pub stats: Vec<HeadlineStat>,
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub stats: DashboardStats,
    pub projects: Vec<Project>,
    pub selected: Option<Project>,
}

// =============================================================================
// MARKETPLACE
// =============================================================================

/// Marketplace query parameters. Both default to the initial view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketplaceQuery {
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// A listing with its display strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingJson {
    #[serde(flatten)]
    pub credit: CarbonCredit,
    /// Rating with one decimal, e.g. "4.9".
    pub rating: String,
    /// Signed trend, e.g. "+11%".
    pub trend_label: String,
}

impl From<CarbonCredit> for ListingJson {
    fn from(credit: CarbonCredit) -> Self {
        Self {
            rating: credit.rating_display(),
            trend_label: credit.trend_display(),
            credit,
        }
    }
}

/// An entry of the sort selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortOption {
    pub key: String,
    pub label: String,
}

impl From<SortField> for SortOption {
    fn from(field: SortField) -> Self {
        Self {
            key: field.name().to_string(),
            label: field.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceResponse {
    pub success: bool,
    pub category: String,
    pub sort: String,
    pub categories: Vec<CategoryCount>,
    pub sort_options: Vec<SortOption>,
    pub stats: Vec<HeadlineStat>,
    pub listings: Vec<ListingJson>,
    pub selected: Option<ListingJson>,
    /// Ids used by more than one listing in the store.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_ids: Vec<u64>,
}

// =============================================================================
// AUTHORITY
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorityQuery {
    pub tab: Option<String>,
}

/// Authority panel. Only the list of the active tab is filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorityResponse {
    pub success: bool,
    pub tab: ReviewTab,
    pub tabs: Vec<TabCount>,
    pub stats: Vec<HeadlineStat>,
    #[serde(default)]
    pub pending: Vec<Submission>,
    #[serde(default)]
    pub recent: Vec<Decision>,
    pub selected: Option<Submission>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub success: bool,
    pub submission_id: u64,
    pub verdict: Verdict,
}

// =============================================================================
// BALANCE
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceQuery {
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub success: bool,
    pub timeframe: Timeframe,
    pub summary: BalanceSummary,
    /// Portfolio value in thousands, e.g. "678.5K".
    pub value_display: String,
    pub breakdown: Vec<PortfolioSlice>,
    pub achievements: Vec<Achievement>,
    pub activity: Vec<MonthlyActivity>,
    pub bars: Vec<BarHeights>,
    pub transactions: Vec<Transaction>,
    pub totals: TransactionTotals,
}

// =============================================================================
// UPLOAD
// =============================================================================

/// One entry of the wizard's progress indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepJson {
    pub number: u8,
    pub label: String,
    pub done: bool,
    pub current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentJson {
    pub id: u64,
    pub name: String,
    pub size_bytes: u64,
    pub size_display: String,
    pub kind: AttachmentKind,
}

impl From<&Attachment> for AttachmentJson {
    fn from(attachment: &Attachment) -> Self {
        Self {
            id: attachment.id.0,
            name: attachment.name.clone(),
            size_bytes: attachment.size_bytes,
            size_display: attachment.size_display(),
            kind: attachment.kind,
        }
    }
}

/// Current state of the upload wizard, with the options its steps offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub step: WizardStep,
    pub step_number: u8,
    pub steps: Vec<StepJson>,
    pub draft: UploadDraft,
    pub attachments: Vec<AttachmentJson>,
    pub total_bytes: u64,
    pub can_submit: bool,
    pub processing_delay_ms: u64,
    /// Project type selector of the first step.
    pub project_types: Vec<ProjectTypeOption>,
    /// Evidence guide of the data upload step.
    pub data_types: Vec<DataTypeGuide>,
}

impl UploadResponse {
    /// Describe `wizard`, reading the step options from `repo`.
    pub fn new<R: Repository + ?Sized>(
        wizard: &UploadWizard,
        repo: &R,
    ) -> Result<Self, LedgerError> {
        let current = wizard.step();
        Ok(Self {
            success: true,
            step: current,
            step_number: current.number(),
            steps: WizardStep::ALL
                .iter()
                .map(|step| StepJson {
                    number: step.number(),
                    label: step.label().to_string(),
                    done: *step < current,
                    current: *step == current,
                })
                .collect(),
            draft: wizard.draft().clone(),
            attachments: wizard
                .attachments()
                .entries()
                .iter()
                .map(AttachmentJson::from)
                .collect(),
            total_bytes: wizard.attachments().total_bytes(),
            can_submit: wizard.can_submit(),
            processing_delay_ms: wizard.processing_delay_ms(),
            project_types: repo.project_types()?,
            data_types: repo.data_types()?,
        })
    }
}

/// Form field updates, keyed by field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldsRequest {
    pub fields: BTreeMap<String, String>,
}

impl FieldsRequest {
    /// Resolve field names.
    ///
    /// Rejects an empty update and unknown names before anything is applied.
    pub fn to_updates(&self) -> Result<Vec<(DraftField, &str)>, LedgerError> {
        if self.fields.is_empty() {
            return Err(LedgerError::InvalidInput("no fields given".to_string()));
        }
        self.fields
            .iter()
            .map(|(name, value)| Ok((name.parse::<DraftField>()?, value.as_str())))
            .collect()
    }
}

/// A file offered for attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileJson {
    pub name: String,
    pub size_bytes: u64,
    #[serde(default)]
    pub content_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachmentRequest {
    pub files: Vec<FileJson>,
}

impl AttachmentRequest {
    /// Convert to incoming files, validating counts and names.
    pub fn to_incoming(&self) -> Result<Vec<IncomingFile>, LedgerError> {
        if self.files.is_empty() {
            return Err(LedgerError::InvalidInput("no files given".to_string()));
        }
        if self.files.len() > MAX_ATTACHMENTS_PER_REQUEST {
            return Err(LedgerError::InvalidInput(format!(
                "File count {} exceeds maximum {}",
                self.files.len(),
                MAX_ATTACHMENTS_PER_REQUEST
            )));
        }

        self.files
            .iter()
            .map(|file| {
                let name = file.name.trim();
                if name.is_empty() {
                    return Err(LedgerError::InvalidInput("file name cannot be empty".to_string()));
                }
                if name.len() > MAX_ATTACHMENT_NAME_LENGTH {
                    return Err(LedgerError::InvalidInput(format!(
                        "File name length {} exceeds maximum {} bytes",
                        name.len(),
                        MAX_ATTACHMENT_NAME_LENGTH
                    )));
                }
                Ok(IncomingFile::new(name, file.size_bytes, file.content_type.as_str()))
            })
            .collect()
    }
}
