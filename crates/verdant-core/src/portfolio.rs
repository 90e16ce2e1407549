//! # Portfolio & Dashboard Derivations
//!
//! Balance-view records and the aggregate figures computed from the store.
//!
//! Dashboard and transaction totals are derived from the records they
//! summarize instead of being carried as separate literals.

use crate::{LedgerError, Project, ProjectStatus, Transaction, TransactionKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// BALANCE RECORDS
// =============================================================================

/// Headline figures of the user's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub total_credits: u64,
    /// Portfolio value in rupees.
    pub credit_value: u64,
    pub monthly_gain: u64,
    pub co2_offset_tons: u64,
    pub rank: String,
    pub active_projects: u32,
}

impl BalanceSummary {
    /// Portfolio value in thousands with one decimal, e.g. `678.5K`.
    #[must_use]
    pub fn value_in_thousands(&self) -> String {
        let tenths = self.credit_value / 100;
        format!("{}.{}K", tenths / 10, tenths % 10)
    }
}

/// Share of the portfolio held in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSlice {
    pub label: String,
    pub amount: u64,
    pub percentage: u8,
}

/// A badge shown on the balance view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub unlocked: bool,
}

/// Credits earned and traded in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyActivity {
    pub month: String,
    pub earned: u64,
    pub traded: u64,
}

impl MonthlyActivity {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.earned.saturating_add(self.traded)
    }
}

/// Bar heights of one month, in percent of the busiest month's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarHeights {
    pub month: String,
    pub earned_percent: u64,
    pub traded_percent: u64,
}

/// Scale monthly activity against the busiest month.
///
/// Heights are integer percentages rounded down. An empty or all-zero series
/// yields zero heights.
pub fn bar_heights(months: &[MonthlyActivity]) -> Vec<BarHeights> {
    let max = months.iter().map(MonthlyActivity::total).max().unwrap_or(0);
    months
        .iter()
        .map(|m| BarHeights {
            month: m.month.clone(),
            earned_percent: percent_of(m.earned, max),
            traded_percent: percent_of(m.traded, max),
        })
        .collect()
}

fn percent_of(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        0
    } else {
        part.saturating_mul(100) / whole
    }
}

// =============================================================================
// TIMEFRAME
// =============================================================================

/// Period selected on the balance history chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Week,
    #[default]
    Month,
    Year,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::Week, Timeframe::Month, Timeframe::Year];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown timeframe '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// DASHBOARD STATS
// =============================================================================

/// Aggregates shown above the dashboard project grid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_co2_offset_tons: u64,
    pub total_credits: u64,
    /// Projects that are not rejected.
    pub active_projects: usize,
    pub verified_projects: usize,
}

impl DashboardStats {
    #[must_use]
    pub fn from_projects(projects: &[Project]) -> Self {
        projects.iter().fold(Self::default(), |mut stats, project| {
            stats.total_co2_offset_tons = stats
                .total_co2_offset_tons
                .saturating_add(project.co2_absorbed_tons);
            stats.total_credits = stats.total_credits.saturating_add(project.credits);
            if project.status != ProjectStatus::Rejected {
                stats.active_projects += 1;
            }
            if project.status == ProjectStatus::Verified {
                stats.verified_projects += 1;
            }
            stats
        })
    }
}

// =============================================================================
// TRANSACTION TOTALS
// =============================================================================

/// Sums over the credit history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionTotals {
    pub earned_credits: i64,
    pub traded_credits: i64,
    pub net_credits: i64,
    pub net_value: i64,
}

impl TransactionTotals {
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions.iter().fold(Self::default(), |mut totals, tx| {
            match tx.kind {
                TransactionKind::Earned => {
                    totals.earned_credits = totals.earned_credits.saturating_add(tx.amount);
                }
                TransactionKind::Traded => {
                    totals.traded_credits = totals.traded_credits.saturating_add(tx.amount);
                }
            }
            totals.net_credits = totals.net_credits.saturating_add(tx.amount);
            totals.net_value = totals.net_value.saturating_add(tx.value);
            totals
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    #[test]
    fn dashboard_stats_from_sample_projects() {
        let stats = DashboardStats::from_projects(&sample::projects());
        assert_eq!(stats.total_co2_offset_tons, 65_040);
        assert_eq!(stats.total_credits, 6_504);
        assert_eq!(stats.active_projects, 3);
        assert_eq!(stats.verified_projects, 2);
    }

    #[test]
    fn transaction_totals_from_sample_history() {
        let totals = TransactionTotals::from_transactions(&sample::transactions());
        assert_eq!(totals.earned_credits, 3_924);
        assert_eq!(totals.traded_credits, -300);
        assert_eq!(totals.net_credits, 3_624);
        assert_eq!(totals.net_value, 163_080);
    }

    #[test]
    fn bar_heights_scale_to_busiest_month() {
        let heights = bar_heights(&sample::monthly_activity());
        // October is the busiest month: 1450 + 250 = 1700.
        let oct = heights.iter().find(|h| h.month == "Oct").expect("october");
        assert_eq!(oct.earned_percent, 85);
        assert_eq!(oct.traded_percent, 14);
        assert!(heights
            .iter()
            .all(|h| h.earned_percent + h.traded_percent <= 100));
    }

    #[test]
    fn bar_heights_empty_series() {
        assert!(bar_heights(&[]).is_empty());
        let zero = vec![MonthlyActivity {
            month: "Jan".to_string(),
            earned: 0,
            traded: 0,
        }];
        assert_eq!(bar_heights(&zero)[0].earned_percent, 0);
    }

    #[test]
    fn timeframe_parsing() {
        assert_eq!("week".parse::<Timeframe>().ok(), Some(Timeframe::Week));
        assert!("decade".parse::<Timeframe>().is_err());
        assert_eq!(Timeframe::default(), Timeframe::Month);
    }

    #[test]
    fn value_in_thousands_formatting() {
        let summary = sample::balance_summary();
        assert_eq!(summary.value_in_thousands(), "678.5K");
    }
}
