//! # Review Desk
//!
//! State of the authority panel: which tab is showing and which pending
//! submission is open for review.
//!
//! Approve and reject go through [`ReviewBackend`]. The desk never edits the
//! pending queue or the decision history itself.

use crate::repository::Repository;
use crate::selection::Selection;
use crate::{LedgerError, Submission, SubmissionId, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tab of the authority panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTab {
    #[default]
    Pending,
    Recent,
}

impl ReviewTab {
    pub const ALL: [ReviewTab; 2] = [ReviewTab::Pending, ReviewTab::Recent];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Recent => "recent",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending Reviews",
            Self::Recent => "Recent Decisions",
        }
    }
}

impl fmt::Display for ReviewTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewTab {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "recent" => Ok(Self::Recent),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown review tab '{}'",
                other
            ))),
        }
    }
}

/// A tab with the number of records behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabCount {
    pub tab: ReviewTab,
    pub label: String,
    pub count: usize,
}

/// Receives verification decisions.
pub trait ReviewBackend {
    fn approve_submission(&self, id: SubmissionId) -> Result<(), LedgerError>;

    fn reject_submission(&self, id: SubmissionId) -> Result<(), LedgerError>;
}

/// Authority panel state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDesk {
    tab: ReviewTab,
    selection: Selection<SubmissionId>,
}

impl ReviewDesk {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tab(&self) -> ReviewTab {
        self.tab
    }

    pub fn show_tab(&mut self, tab: ReviewTab) {
        self.tab = tab;
    }

    /// Counts for each tab, in display order.
    pub fn tab_counts<R: Repository + ?Sized>(repo: &R) -> Result<Vec<TabCount>, LedgerError> {
        let pending = repo.list_submissions()?.len();
        let recent = repo.list_decisions()?.len();
        Ok(ReviewTab::ALL
            .iter()
            .map(|tab| TabCount {
                tab: *tab,
                label: tab.label().to_string(),
                count: match tab {
                    ReviewTab::Pending => pending,
                    ReviewTab::Recent => recent,
                },
            })
            .collect())
    }

    /// Open a pending submission for review.
    pub fn open<R: Repository + ?Sized>(
        &mut self,
        repo: &R,
        id: SubmissionId,
    ) -> Result<Submission, LedgerError> {
        let submission = repo.find_submission(id)?;
        self.selection.open(id);
        Ok(submission)
    }

    /// Close the submission detail. Returns the submission that was open.
    pub fn close(&mut self) -> Option<SubmissionId> {
        self.selection.close()
    }

    #[must_use]
    pub fn selected(&self) -> Option<SubmissionId> {
        self.selection.current().copied()
    }

    /// Hand a verdict for a pending submission to `backend`, then close the
    /// review. On error the selection is left as it was.
    pub fn decide<R, B>(
        &mut self,
        repo: &R,
        id: SubmissionId,
        verdict: Verdict,
        backend: &B,
    ) -> Result<Submission, LedgerError>
    where
        R: Repository + ?Sized,
        B: ReviewBackend + ?Sized,
    {
        let submission = repo.find_submission(id)?;
        match verdict {
            Verdict::Approved => backend.approve_submission(id)?,
            Verdict::Rejected => backend.reject_submission(id)?,
        }
        self.selection.close();
        Ok(submission)
    }
}
