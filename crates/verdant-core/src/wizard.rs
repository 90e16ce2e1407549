//! # Upload Wizard
//!
//! The four-step project submission flow:
//!
//! ```text
//! ProjectInfo (1) ──continue──▶ DataUpload (2) ──submit──▶ Processing (3) ──tick──▶ Complete (4)
//!        ▲                          │                                                   │
//!        └──────────back────────────┘                                                   │
//!        └─────────────────────────────── submit another ───────────────────────────────┘
//! ```
//!
//! The wizard is clock-free. `submit` records a deadline from the caller's
//! clock and returns a [`ProcessingTicket`]; the caller later either ticks the
//! wizard with the current time or redeems the ticket once its delay has
//! elapsed. Completion happens exactly once per submit, and a ticket from an
//! abandoned submit never completes a later one.
//!
//! Nothing produced here reaches the record store.

use crate::attachments::{AttachmentList, IncomingFile};
use crate::primitives::{MAX_FIELD_LENGTH, PROCESSING_DELAY_MS};
use crate::{AttachmentId, Category, LedgerError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// STEPS
// =============================================================================

/// Position in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    ProjectInfo = 1,
    DataUpload = 2,
    Processing = 3,
    Complete = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::ProjectInfo,
        WizardStep::DataUpload,
        WizardStep::Processing,
        WizardStep::Complete,
    ];

    /// 1-based step number shown in the progress indicator.
    #[must_use]
    pub fn number(&self) -> u8 {
        *self as u8
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProjectInfo => "Project Info",
            Self::DataUpload => "Upload Data",
            Self::Processing => "Processing",
            Self::Complete => "Complete",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.number())
    }
}

/// Whether leaving step 1 requires the identifying fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Continue unconditionally.
    #[default]
    Lenient,
    /// Project name and location must be non-empty.
    RequireFields,
}

// =============================================================================
// DRAFT
// =============================================================================

/// An editable field of the upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    ProjectName,
    Location,
    Category,
    StartDate,
    EndDate,
    Description,
    ExpectedCo2,
    Area,
}

impl DraftField {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProjectName => "project_name",
            Self::Location => "location",
            Self::Category => "category",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::Description => "description",
            Self::ExpectedCo2 => "expected_co2",
            Self::Area => "area",
        }
    }
}

impl FromStr for DraftField {
    type Err = LedgerError;

    /// Accepts snake_case names and the camelCase names form inputs use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project_name" | "projectName" => Ok(Self::ProjectName),
            "location" => Ok(Self::Location),
            "category" | "project_type" | "projectType" => Ok(Self::Category),
            "start_date" | "startDate" => Ok(Self::StartDate),
            "end_date" | "endDate" => Ok(Self::EndDate),
            "description" => Ok(Self::Description),
            "expected_co2" | "expectedCO2" => Ok(Self::ExpectedCo2),
            "area" => Ok(Self::Area),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown form field '{}'",
                other
            ))),
        }
    }
}

/// Form state of an upload in progress.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadDraft {
    pub project_name: String,
    pub location: String,
    pub category: Category,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: String,
    pub expected_co2_tons: Option<u64>,
    pub area_hectares: Option<u64>,
}

impl UploadDraft {
    /// Set one field from raw form input.
    ///
    /// Empty input clears optional fields. Malformed numbers or dates leave
    /// the field unchanged and return `InvalidInput`.
    pub fn set(&mut self, field: DraftField, raw: &str) -> Result<(), LedgerError> {
        if raw.len() > MAX_FIELD_LENGTH {
            return Err(LedgerError::InvalidInput(format!(
                "{} exceeds {} bytes",
                field.name(),
                MAX_FIELD_LENGTH
            )));
        }

        match field {
            DraftField::ProjectName => self.project_name = raw.to_string(),
            DraftField::Location => self.location = raw.to_string(),
            DraftField::Description => self.description = raw.to_string(),
            DraftField::Category => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(LedgerError::InvalidInput(
                        "category cannot be empty".to_string(),
                    ));
                }
                self.category = Category::new(trimmed);
            }
            DraftField::StartDate => self.start_date = parse_date(field, raw)?,
            DraftField::EndDate => self.end_date = parse_date(field, raw)?,
            DraftField::ExpectedCo2 => self.expected_co2_tons = parse_quantity(field, raw)?,
            DraftField::Area => self.area_hectares = parse_quantity(field, raw)?,
        }
        Ok(())
    }

    /// Names of required fields that are still blank.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.project_name.trim().is_empty() {
            missing.push(DraftField::ProjectName.name());
        }
        if self.location.trim().is_empty() {
            missing.push(DraftField::Location.name());
        }
        missing
    }
}

fn parse_date(field: DraftField, raw: &str) -> Result<Option<NaiveDate>, LedgerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| LedgerError::InvalidInput(format!("{}: {}", field.name(), e)))
}

fn parse_quantity(field: DraftField, raw: &str) -> Result<Option<u64>, LedgerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let digits: String = trimmed.chars().filter(|c| *c != ',').collect();
    digits
        .parse::<u64>()
        .map(Some)
        .map_err(|_| {
            LedgerError::InvalidInput(format!(
                "{}: '{}' is not a whole number",
                field.name(),
                trimmed
            ))
        })
}

// =============================================================================
// WIZARD
// =============================================================================

/// Proof of one submit, redeemable once its deadline has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingTicket {
    pub generation: u64,
    pub deadline_ms: u64,
    pub delay_ms: u64,
}

/// The upload wizard state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadWizard {
    step: WizardStep,
    draft: UploadDraft,
    attachments: AttachmentList,
    policy: ValidationPolicy,
    processing_delay_ms: u64,
    /// Incremented on every submit and every reset.
    generation: u64,
    deadline_ms: Option<u64>,
}

impl Default for UploadWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadWizard {
    /// A wizard on step 1 with the default delay and lenient validation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(ValidationPolicy::default(), PROCESSING_DELAY_MS)
    }

    #[must_use]
    pub fn with_settings(policy: ValidationPolicy, processing_delay_ms: u64) -> Self {
        Self {
            step: WizardStep::ProjectInfo,
            draft: UploadDraft::default(),
            attachments: AttachmentList::new(),
            policy,
            processing_delay_ms,
            generation: 0,
            deadline_ms: None,
        }
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn draft(&self) -> &UploadDraft {
        &self.draft
    }

    #[must_use]
    pub fn attachments(&self) -> &AttachmentList {
        &self.attachments
    }

    #[must_use]
    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    #[must_use]
    pub fn processing_delay_ms(&self) -> u64 {
        self.processing_delay_ms
    }

    /// Deadline of the running submit, while processing.
    #[must_use]
    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    fn require(&self, expected: WizardStep, action: &'static str) -> Result<(), LedgerError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(LedgerError::InvalidTransition {
                from: self.step.number(),
                action,
            })
        }
    }

    fn require_editable(&self, action: &'static str) -> Result<(), LedgerError> {
        match self.step {
            WizardStep::ProjectInfo | WizardStep::DataUpload => Ok(()),
            WizardStep::Processing | WizardStep::Complete => Err(LedgerError::InvalidTransition {
                from: self.step.number(),
                action,
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Form editing
    // -------------------------------------------------------------------------

    /// Edit one form field. Allowed on steps 1 and 2.
    pub fn set_field(&mut self, field: DraftField, raw: &str) -> Result<(), LedgerError> {
        self.require_editable("edit fields")?;
        self.draft.set(field, raw)
    }

    /// Attach one file. Allowed on step 2.
    pub fn attach(&mut self, file: IncomingFile) -> Result<AttachmentId, LedgerError> {
        self.require(WizardStep::DataUpload, "attach files")?;
        Ok(self.attachments.attach(file))
    }

    /// Attach a batch of files in order. Allowed on step 2.
    pub fn attach_all(
        &mut self,
        files: impl IntoIterator<Item = IncomingFile>,
    ) -> Result<Vec<AttachmentId>, LedgerError> {
        self.require(WizardStep::DataUpload, "attach files")?;
        Ok(self.attachments.attach_all(files))
    }

    /// Remove an attachment. Unknown ids are a no-op returning `false`.
    pub fn remove_attachment(&mut self, id: AttachmentId) -> Result<bool, LedgerError> {
        self.require(WizardStep::DataUpload, "remove files")?;
        Ok(self.attachments.remove(id))
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// 1 → 2.
    pub fn continue_to_upload(&mut self) -> Result<(), LedgerError> {
        self.require(WizardStep::ProjectInfo, "continue")?;
        if self.policy == ValidationPolicy::RequireFields {
            let missing = self.draft.missing_required();
            if !missing.is_empty() {
                return Err(LedgerError::MissingFields(missing));
            }
        }
        self.step = WizardStep::DataUpload;
        Ok(())
    }

    /// 2 → 1. Fields and attachments are kept.
    pub fn back(&mut self) -> Result<(), LedgerError> {
        self.require(WizardStep::DataUpload, "go back")?;
        self.step = WizardStep::ProjectInfo;
        Ok(())
    }

    /// Whether the submit action is available.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::DataUpload && !self.attachments.is_empty()
    }

    /// 2 → 3. Requires at least one attachment.
    pub fn submit(&mut self, now_ms: u64) -> Result<ProcessingTicket, LedgerError> {
        self.require(WizardStep::DataUpload, "submit")?;
        if self.attachments.is_empty() {
            return Err(LedgerError::NoAttachments);
        }

        self.generation = self.generation.saturating_add(1);
        let deadline_ms = now_ms.saturating_add(self.processing_delay_ms);
        self.deadline_ms = Some(deadline_ms);
        self.step = WizardStep::Processing;

        Ok(ProcessingTicket {
            generation: self.generation,
            deadline_ms,
            delay_ms: self.processing_delay_ms,
        })
    }

    /// 3 → 4 once `now_ms` reaches the deadline. Returns whether it fired.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match (self.step, self.deadline_ms) {
            (WizardStep::Processing, Some(deadline)) if now_ms >= deadline => {
                self.complete();
                true
            }
            _ => false,
        }
    }

    /// 3 → 4 for the submit that issued `ticket`.
    ///
    /// Returns `false` if the wizard already completed, was reset, or has
    /// since been submitted again.
    pub fn finish_processing(&mut self, ticket: ProcessingTicket) -> bool {
        if self.step == WizardStep::Processing && self.generation == ticket.generation {
            self.complete();
            true
        } else {
            false
        }
    }

    fn complete(&mut self) {
        self.step = WizardStep::Complete;
        self.deadline_ms = None;
    }

    /// 4 → 1 with an empty form and no attachments.
    pub fn submit_another(&mut self) -> Result<(), LedgerError> {
        self.require(WizardStep::Complete, "submit another")?;
        self.clear_form();
        Ok(())
    }

    /// Abandon the flow from any step, as when navigating away.
    pub fn reset(&mut self) {
        self.generation = self.generation.saturating_add(1);
        self.clear_form();
    }

    fn clear_form(&mut self) {
        self.step = WizardStep::ProjectInfo;
        self.draft = UploadDraft::default();
        self.attachments.clear();
        self.deadline_ms = None;
    }
}

// =============================================================================
// TESTS
// =============================================================================
