//! # Repository
//!
//! The `Repository` trait is the seam between view logic and the record
//! store. Views read through it only, so a real backend can replace
//! [`SampleRepository`] without touching filter, sort or selection code.
//!
//! All methods return `Result<T, LedgerError>` so that fallible backends fit
//! the same interface; the sample store never fails.

use crate::portfolio::{Achievement, BalanceSummary, MonthlyActivity, PortfolioSlice};
use crate::sample;
use crate::view::{DataTypeGuide, Feature, HeadlineStat, ProjectTypeOption};
use crate::{
    CarbonCredit, CreditId, Decision, LedgerError, Project, ProjectId, Submission, SubmissionId,
    Transaction,
};

// =============================================================================
// REPOSITORY TRAIT
// =============================================================================

/// Read-only access to the platform records.
pub trait Repository {
    /// Dashboard projects, in presentation order.
    fn list_projects(&self) -> Result<Vec<Project>, LedgerError>;

    /// Submissions awaiting review, in presentation order.
    fn list_submissions(&self) -> Result<Vec<Submission>, LedgerError>;

    /// Recently settled reviews, newest first.
    fn list_decisions(&self) -> Result<Vec<Decision>, LedgerError>;

    /// Marketplace listings, in store order.
    fn list_credits(&self) -> Result<Vec<CarbonCredit>, LedgerError>;

    /// Credit history, newest first.
    fn list_transactions(&self) -> Result<Vec<Transaction>, LedgerError>;

    fn balance_summary(&self) -> Result<BalanceSummary, LedgerError>;

    fn portfolio_breakdown(&self) -> Result<Vec<PortfolioSlice>, LedgerError>;

    fn achievements(&self) -> Result<Vec<Achievement>, LedgerError>;

    fn monthly_activity(&self) -> Result<Vec<MonthlyActivity>, LedgerError>;

    fn market_stats(&self) -> Result<Vec<HeadlineStat>, LedgerError>;

    fn review_stats(&self) -> Result<Vec<HeadlineStat>, LedgerError>;

    fn landing_features(&self) -> Result<Vec<Feature>, LedgerError>;

    fn landing_stats(&self) -> Result<Vec<HeadlineStat>, LedgerError>;

    /// Project types offered on the first upload step.
    fn project_types(&self) -> Result<Vec<ProjectTypeOption>, LedgerError>;

    /// Evidence kinds described on the data upload step.
    fn data_types(&self) -> Result<Vec<DataTypeGuide>, LedgerError>;

    /// Look up one listing.
    fn find_credit(&self, id: CreditId) -> Result<CarbonCredit, LedgerError> {
        self.list_credits()?
            .into_iter()
            .find(|credit| credit.id == id)
            .ok_or_else(|| LedgerError::not_found("credit", id.0))
    }

    /// Look up one project.
    fn find_project(&self, id: ProjectId) -> Result<Project, LedgerError> {
        self.list_projects()?
            .into_iter()
            .find(|project| project.id == id)
            .ok_or_else(|| LedgerError::not_found("project", id.0))
    }

    /// Look up one pending submission.
    fn find_submission(&self, id: SubmissionId) -> Result<Submission, LedgerError> {
        self.list_submissions()?
            .into_iter()
            .find(|submission| submission.id == id)
            .ok_or_else(|| LedgerError::not_found("submission", id.0))
    }
}

// =============================================================================
// SAMPLE REPOSITORY
// =============================================================================

/// In-memory repository over the fixed sample records.
///
/// Records are built once at construction and handed out as copies.
#[derive(Debug, Clone)]
pub struct SampleRepository {
    projects: Vec<Project>,
    submissions: Vec<Submission>,
    decisions: Vec<Decision>,
    credits: Vec<CarbonCredit>,
    transactions: Vec<Transaction>,
}

impl SampleRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            projects: sample::projects(),
            submissions: sample::submissions(),
            decisions: sample::decisions(),
            credits: sample::credits(),
            transactions: sample::transactions(),
        }
    }

    /// A repository with custom listings and the default everything else.
    #[must_use]
    pub fn with_credits(credits: Vec<CarbonCredit>) -> Self {
        Self {
            credits,
            ..Self::new()
        }
    }
}

impl Default for SampleRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for SampleRepository {
    fn list_projects(&self) -> Result<Vec<Project>, LedgerError> {
        Ok(self.projects.clone())
    }

    fn list_submissions(&self) -> Result<Vec<Submission>, LedgerError> {
        Ok(self.submissions.clone())
    }

    fn list_decisions(&self) -> Result<Vec<Decision>, LedgerError> {
        Ok(self.decisions.clone())
    }

    fn list_credits(&self) -> Result<Vec<CarbonCredit>, LedgerError> {
        Ok(self.credits.clone())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.transactions.clone())
    }

    fn balance_summary(&self) -> Result<BalanceSummary, LedgerError> {
        Ok(sample::balance_summary())
    }

    fn portfolio_breakdown(&self) -> Result<Vec<PortfolioSlice>, LedgerError> {
        Ok(sample::portfolio_breakdown())
    }

    fn achievements(&self) -> Result<Vec<Achievement>, LedgerError> {
        Ok(sample::achievements())
    }

    fn monthly_activity(&self) -> Result<Vec<MonthlyActivity>, LedgerError> {
        Ok(sample::monthly_activity())
    }

    fn market_stats(&self) -> Result<Vec<HeadlineStat>, LedgerError> {
        Ok(sample::market_stats())
    }

    fn review_stats(&self) -> Result<Vec<HeadlineStat>, LedgerError> {
        Ok(sample::review_stats())
    }

    fn landing_features(&self) -> Result<Vec<Feature>, LedgerError> {
        Ok(sample::landing_features())
    }

    fn landing_stats(&self) -> Result<Vec<HeadlineStat>, LedgerError> {
        Ok(sample::landing_stats())
    }

    fn project_types(&self) -> Result<Vec<ProjectTypeOption>, LedgerError> {
        Ok(sample::project_types())
    }

    fn data_types(&self) -> Result<Vec<DataTypeGuide>, LedgerError> {
        Ok(sample::data_types())
    }
}

// =============================================================================
// TESTS
// =============================================================================
