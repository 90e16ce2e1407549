//! # Session Module
//!
//! A `Session` combines a [`Repository`] with volatile [`ViewState`].
//!
//! - View state is session-local and never written anywhere
//! - Cleared on session reset
//! - Records are always read through the repository, so the state holds
//!   only ids, filters and form input

use crate::pipeline::{ListingQuery, SortTable};
use crate::portfolio::{DashboardStats, Timeframe, TransactionTotals};
use crate::primitives::PROCESSING_DELAY_MS;
use crate::repository::{Repository, SampleRepository};
use crate::review::{ReviewBackend, ReviewDesk};
use crate::selection::Selection;
use crate::wizard::{UploadWizard, ValidationPolicy};
use crate::{
    CarbonCredit, CreditId, LedgerError, Project, ProjectId, Submission, SubmissionId, Verdict,
};

/// Fixed behaviour of a session, chosen at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Comparator table for listing sorts.
    pub sort_table: SortTable,
    /// Guard on leaving the first upload step.
    pub validation: ValidationPolicy,
    /// Delay between submit and completion of an upload.
    pub processing_delay_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            sort_table: SortTable::default(),
            validation: ValidationPolicy::default(),
            processing_delay_ms: PROCESSING_DELAY_MS,
        }
    }
}

/// Per-view state of one visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub marketplace: ListingQuery,
    pub selected_credit: Selection<CreditId>,
    pub selected_project: Selection<ProjectId>,
    pub review: ReviewDesk,
    pub timeframe: Timeframe,
    pub upload: UploadWizard,
}

impl ViewState {
    #[must_use]
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            marketplace: ListingQuery::default(),
            selected_credit: Selection::new(),
            selected_project: Selection::new(),
            review: ReviewDesk::new(),
            timeframe: Timeframe::default(),
            upload: UploadWizard::with_settings(settings.validation, settings.processing_delay_ms),
        }
    }
}

/// A repository plus the view state built on top of it.
#[derive(Debug, Clone)]
pub struct Session<R: Repository = SampleRepository> {
    repository: R,
    settings: SessionSettings,
    state: ViewState,
}

impl Session<SampleRepository> {
    /// A session over the sample records with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_repository(SampleRepository::new())
    }
}

impl Default for Session<SampleRepository> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Repository> Session<R> {
    #[must_use]
    pub fn with_repository(repository: R) -> Self {
        Self::with_settings(repository, SessionSettings::default())
    }

    #[must_use]
    pub fn with_settings(repository: R, settings: SessionSettings) -> Self {
        let state = ViewState::new(&settings);
        Self {
            repository,
            settings,
            state,
        }
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Drop all view state. The repository is untouched.
    ///
    /// The upload wizard is reset in place so processing tickets issued
    /// before the reset stay stale.
    pub fn reset(&mut self) {
        let previous = std::mem::replace(&mut self.state, ViewState::new(&self.settings));
        self.state.upload = previous.upload;
        self.state.upload.reset();
    }

    // =========================================================================
    // DASHBOARD
    // =========================================================================

    /// Totals over the dashboard projects.
    pub fn dashboard_stats(&self) -> Result<DashboardStats, LedgerError> {
        Ok(DashboardStats::from_projects(&self.repository.list_projects()?))
    }

    /// Open a project's detail view.
    pub fn select_project(&mut self, id: ProjectId) -> Result<Project, LedgerError> {
        let project = self.repository.find_project(id)?;
        self.state.selected_project.open(id);
        Ok(project)
    }

    /// Close the project detail. Returns the project that was open.
    pub fn close_project(&mut self) -> Option<ProjectId> {
        self.state.selected_project.close()
    }

    /// The open project, re-read from the repository.
    pub fn selected_project(&self) -> Result<Option<Project>, LedgerError> {
        self.state
            .selected_project
            .current()
            .map(|id| self.repository.find_project(*id))
            .transpose()
    }

    // =========================================================================
    // MARKETPLACE
    // =========================================================================

    pub fn set_listing_query(&mut self, query: ListingQuery) {
        self.state.marketplace = query;
    }

    #[must_use]
    pub fn listing_query(&self) -> &ListingQuery {
        &self.state.marketplace
    }

    /// Listings under the current filter and sort.
    pub fn marketplace_listings(&self) -> Result<Vec<CarbonCredit>, LedgerError> {
        let credits = self.repository.list_credits()?;
        Ok(self
            .state
            .marketplace
            .apply(&credits, &self.settings.sort_table))
    }

    /// Open a listing's detail view.
    pub fn select_credit(&mut self, id: CreditId) -> Result<CarbonCredit, LedgerError> {
        let credit = self.repository.find_credit(id)?;
        self.state.selected_credit.open(id);
        Ok(credit)
    }

    /// Close the listing detail. Returns the listing that was open.
    pub fn close_credit(&mut self) -> Option<CreditId> {
        self.state.selected_credit.close()
    }

    pub fn selected_credit(&self) -> Result<Option<CarbonCredit>, LedgerError> {
        self.state
            .selected_credit
            .current()
            .map(|id| self.repository.find_credit(*id))
            .transpose()
    }

    // =========================================================================
    // AUTHORITY
    // =========================================================================

    #[must_use]
    pub fn review(&self) -> &ReviewDesk {
        &self.state.review
    }

    pub fn review_mut(&mut self) -> &mut ReviewDesk {
        &mut self.state.review
    }

    pub fn open_submission(&mut self, id: SubmissionId) -> Result<Submission, LedgerError> {
        self.state.review.open(&self.repository, id)
    }

    pub fn selected_submission(&self) -> Result<Option<Submission>, LedgerError> {
        self.state
            .review
            .selected()
            .map(|id| self.repository.find_submission(id))
            .transpose()
    }

    /// Hand a verdict to `backend` and close the review.
    pub fn decide<B: ReviewBackend + ?Sized>(
        &mut self,
        id: SubmissionId,
        verdict: Verdict,
        backend: &B,
    ) -> Result<Submission, LedgerError> {
        self.state
            .review
            .decide(&self.repository, id, verdict, backend)
    }

    // =========================================================================
    // BALANCE
    // =========================================================================

    #[must_use]
    pub fn timeframe(&self) -> Timeframe {
        self.state.timeframe
    }

    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        self.state.timeframe = timeframe;
    }

    pub fn transaction_totals(&self) -> Result<TransactionTotals, LedgerError> {
        Ok(TransactionTotals::from_transactions(
            &self.repository.list_transactions()?,
        ))
    }

    // =========================================================================
    // UPLOAD
    // =========================================================================

    #[must_use]
    pub fn upload(&self) -> &UploadWizard {
        &self.state.upload
    }

    pub fn upload_mut(&mut self) -> &mut UploadWizard {
        &mut self.state.upload
    }
}

// =============================================================================
// TESTS
// =============================================================================
