//! # Core Type Definitions
//!
//! This module contains the shared types for the Verdant view-state engine:
//! - Record identifiers (`ProjectId`, `SubmissionId`, `CreditId`, ...)
//! - Categorical values (`Category`, statuses, priorities, trends)
//! - Error types (`LedgerError`)
//!
//! The record structs themselves live in [`records`].
//!
//! ## Arithmetic
//!
//! All quantities are integers. Ratings are stored in tenths and file sizes
//! in bytes; fixed-point helpers render them for display.

pub mod records;

pub use records::{CarbonCredit, Decision, Project, Submission, Transaction};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a project on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub u64);

/// Identifier of a submission in the review queue.
///
/// Decisions reuse the id of the submission they settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub u64);

/// Identifier of a marketplace listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreditId(pub u64);

/// Identifier of a balance-history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

/// Identifier of a file attached to an upload draft.
/// Assigned at attach time, unique within one attachment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttachmentId(pub u64);

macro_rules! display_id {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

display_id!(ProjectId, SubmissionId, CreditId, TransactionId, AttachmentId);

// =============================================================================
// CATEGORY
// =============================================================================

/// Project category (reforestation, solar, waste, ...).
///
/// Categories form an open set: the filter stage compares them by string
/// equality and an unknown category simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    /// Create a new category from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the category as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label: first letter upper-cased.
    #[must_use]
    pub fn label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new(crate::primitives::DEFAULT_UPLOAD_CATEGORY)
    }
}

// =============================================================================
// STATUS ENUMS
// =============================================================================

/// Verification status of a dashboard project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Verified,
    Pending,
    Rejected,
}

impl ProjectStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }
}

/// Review status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Outcome of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Review priority of a submission.
///
/// Declared high-to-low so that `Ord` sorts urgent work first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Price direction of a marketplace listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// Sign prefix used when rendering a trend percentage.
    #[must_use]
    pub fn sign(&self) -> char {
        match self {
            Self::Up => '+',
            Self::Down => '-',
        }
    }
}

/// Kind of balance-history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Earned,
    Traded,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Verdant system.
///
/// - No silent failures
/// - Use `Result<T, LedgerError>` for fallible operations
/// - The core never panics; every error leaves state unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A record with the given id does not exist in the store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: u64 },

    /// The requested wizard action is not available in the current step.
    #[error("Cannot {action} from step {from}")]
    InvalidTransition { from: u8, action: &'static str },

    /// Submit was requested with an empty attachment list.
    #[error("At least one attachment is required before submitting")]
    NoAttachments,

    /// Required form fields are empty.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A form or request value could not be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl LedgerError {
    /// Shorthand for a `NotFound` error.
    #[must_use]
    pub fn not_found(kind: &'static str, id: u64) -> Self {
        Self::NotFound { kind, id }
    }
}

// =============================================================================
// TESTS
// =============================================================================
