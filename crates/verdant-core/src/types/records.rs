//! Record types rendered by the views.
//!
//! Every record is an immutable value built once by the sample store.

use super::{
    Category, CreditId, Priority, ProjectId, ProjectStatus, SubmissionId, SubmissionStatus,
    TransactionId, TransactionKind, Trend, Verdict,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// PROJECT
// =============================================================================

/// A project shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub location: String,
    pub co2_absorbed_tons: u64,
    pub credits: u64,
    pub status: ProjectStatus,
    /// Completion in percent, 0..=100.
    pub progress_percent: u8,
    pub image_url: String,
    pub upload_date: NaiveDate,
    pub verification_date: Option<NaiveDate>,
}

impl Project {
    /// Whether the verification date is present exactly when the project is verified.
    ///
    /// Informational only; the store does not reject inconsistent records.
    #[must_use]
    pub fn has_consistent_verification(&self) -> bool {
        (self.status == ProjectStatus::Verified) == self.verification_date.is_some()
    }
}

// =============================================================================
// SUBMISSION & DECISION
// =============================================================================

/// A project submitted for authority review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub project_name: String,
    pub submitter: String,
    pub location: String,
    pub category: Category,
    pub submission_date: NaiveDate,
    pub expected_co2_tons: u64,
    pub area_hectares: u64,
    pub status: SubmissionStatus,
    pub priority: Priority,
    pub files: Vec<String>,
    pub description: String,
}

/// A settled review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: SubmissionId,
    pub project_name: String,
    pub submitter: String,
    pub location: String,
    pub verdict: Verdict,
    pub decision_date: NaiveDate,
    /// Zero for rejected submissions.
    pub credits_issued: u64,
    pub reviewer: String,
    pub rejection_reason: Option<String>,
}

// =============================================================================
// CARBON CREDIT
// =============================================================================

/// A marketplace listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonCredit {
    pub id: CreditId,
    pub project: String,
    pub location: String,
    pub category: Category,
    /// Price per ton of CO2, in whole rupees.
    pub price: u64,
    pub co2_amount_tons: u64,
    pub available_units: u64,
    /// Certification scheme label, treated as opaque text.
    pub verification: String,
    pub vintage: u16,
    pub seller: String,
    /// Rating in tenths of a star, 0..=50.
    pub rating_tenths: u8,
    pub trend: Trend,
    pub trend_percent: u8,
    pub description: String,
    pub image_url: String,
}

impl CarbonCredit {
    /// Rating formatted with one decimal, e.g. `4.9`.
    #[must_use]
    pub fn rating_display(&self) -> String {
        format!("{}.{}", self.rating_tenths / 10, self.rating_tenths % 10)
    }

    /// Trend formatted with its sign, e.g. `+11%`.
    #[must_use]
    pub fn trend_display(&self) -> String {
        format!("{}{}%", self.trend.sign(), self.trend_percent)
    }

    /// Total price of every available unit.
    #[must_use]
    pub fn listing_value(&self) -> u64 {
        self.price.saturating_mul(self.available_units)
    }
}

// =============================================================================
// TRANSACTION
// =============================================================================

/// An entry in the user's credit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// Signed credit amount: negative when credits left the portfolio.
    pub amount: i64,
    pub project: String,
    pub date: NaiveDate,
    /// Signed monetary value in rupees.
    pub value: i64,
    pub co2_tons: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn project(status: ProjectStatus, verified: Option<NaiveDate>) -> Project {
        Project {
            id: ProjectId(1),
            name: "Test".to_string(),
            location: "Nowhere".to_string(),
            co2_absorbed_tons: 10,
            credits: 1,
            status,
            progress_percent: 50,
            image_url: String::new(),
            upload_date: date(2024, 12, 1),
            verification_date: verified,
        }
    }

    #[test]
    fn verification_consistency() {
        assert!(
            project(ProjectStatus::Verified, Some(date(2024, 12, 2)))
                .has_consistent_verification()
        );
        assert!(project(ProjectStatus::Pending, None).has_consistent_verification());
        assert!(!project(ProjectStatus::Verified, None).has_consistent_verification());
        assert!(
            !project(ProjectStatus::Rejected, Some(date(2024, 12, 2)))
                .has_consistent_verification()
        );
    }

    #[test]
    fn credit_display_helpers() {
        let credit = CarbonCredit {
            id: CreditId(1),
            project: "P".to_string(),
            location: "L".to_string(),
            category: Category::new("reforestation"),
            price: 1400,
            co2_amount_tons: 12000,
            available_units: 3,
            verification: "VCS".to_string(),
            vintage: 2024,
            seller: "S".to_string(),
            rating_tenths: 49,
            trend: Trend::Down,
            trend_percent: 4,
            description: String::new(),
            image_url: String::new(),
        };
        assert_eq!(credit.rating_display(), "4.9");
        assert_eq!(credit.trend_display(), "-4%");
        assert_eq!(credit.listing_value(), 4200);
    }
}
