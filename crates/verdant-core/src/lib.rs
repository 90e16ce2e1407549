//! # verdant-core
//!
//! The view-state engine for Verdant - THE LOGIC.
//!
//! This crate holds everything the carbon-credit platform decides on its
//! own: which listings a visitor sees and in what order, which record is
//! open in a detail view, where an upload stands in its wizard, and which
//! files are attached to it.
//!
//! ## Layout
//!
//! - `types` → record structs, identifiers and `LedgerError`
//! - `pipeline` → category filter and table-driven sort
//! - `selection`, `review` → detail-view and authority panel state
//! - `wizard`, `attachments` → the upload flow
//! - `portfolio`, `view` → derived totals and page content
//! - `repository`, `sample` → the record store seam and its fixed data
//! - `session` → all of the above for one visitor
//!
//! ## Architectural Constraints
//!
//! - Records are read only through the `Repository` trait
//! - No clock: time enters as milliseconds passed by the caller
//! - Has NO async, NO network, NO logging dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod attachments;
pub mod pipeline;
pub mod portfolio;
pub mod primitives;
pub mod repository;
pub mod review;
pub mod sample;
pub mod selection;
pub mod session;
pub mod types;
pub mod view;
pub mod wizard;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AttachmentId, CarbonCredit, Category, CreditId, Decision, LedgerError, Priority, Project,
    ProjectId, ProjectStatus, Submission, SubmissionId, SubmissionStatus, Transaction,
    TransactionId, TransactionKind, Trend, Verdict,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use attachments::{Attachment, AttachmentKind, AttachmentList, IncomingFile};
pub use pipeline::{
    CategoryCount, CategoryFilter, Categorized, ListingQuery, SortDirection, SortField, SortKey,
    SortTable, Sortable, category_counts, filter_by, filter_category, sort_by_key,
};
pub use portfolio::{
    Achievement, BalanceSummary, BarHeights, DashboardStats, MonthlyActivity, PortfolioSlice,
    Timeframe, TransactionTotals, bar_heights,
};
pub use repository::{Repository, SampleRepository};
pub use review::{ReviewBackend, ReviewDesk, ReviewTab, TabCount};
pub use selection::Selection;
pub use session::{Session, SessionSettings, ViewState};
pub use view::{DataTypeGuide, Feature, HeadlineStat, ProjectTypeOption, View};
pub use wizard::{
    DraftField, ProcessingTicket, UploadDraft, UploadWizard, ValidationPolicy, WizardStep,
};
