//! # Review Backend
//!
//! The registry that receives approve/reject decisions. No registry is
//! wired up, so decisions are recorded as tracing events only.

use verdant_core::{LedgerError, ReviewBackend, SubmissionId};

/// Emits one `info` event per decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReviewBackend;

impl ReviewBackend for LoggingReviewBackend {
    fn approve_submission(&self, id: SubmissionId) -> Result<(), LedgerError> {
        tracing::info!(submission = id.0, verdict = "approved", "Review decision recorded");
        Ok(())
    }

    fn reject_submission(&self, id: SubmissionId) -> Result<(), LedgerError> {
        tracing::info!(submission = id.0, verdict = "rejected", "Review decision recorded");
        Ok(())
    }
}
