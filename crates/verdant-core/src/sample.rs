//! # Sample Store
//!
//! The fixed records every view renders. Each function builds a fresh copy;
//! nothing here is ever mutated.

use crate::portfolio::{Achievement, BalanceSummary, MonthlyActivity, PortfolioSlice};
use crate::view::{DataTypeGuide, Feature, HeadlineStat, ProjectTypeOption};
use crate::{
    CarbonCredit, Category, CreditId, Decision, Priority, Project, ProjectId, ProjectStatus,
    Submission, SubmissionId, SubmissionStatus, Transaction, TransactionId, TransactionKind,
    Trend, Verdict,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

// =============================================================================
// DASHBOARD
// =============================================================================

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: ProjectId(1),
            name: "Amazon Reforestation Initiative".to_string(),
            location: "Brazil".to_string(),
            co2_absorbed_tons: 15_240,
            credits: 1_524,
            status: ProjectStatus::Verified,
            progress_percent: 85,
            image_url: "https://images.pexels.com/photos/1402787/pexels-photo-1402787.jpeg?auto=compress&cs=tinysrgb&w=400".to_string(),
            upload_date: day(2024, 12, 15),
            verification_date: Some(day(2024, 12, 20)),
        },
        Project {
            id: ProjectId(2),
            name: "Solar Panel Installation".to_string(),
            location: "India".to_string(),
            co2_absorbed_tons: 8_950,
            credits: 895,
            status: ProjectStatus::Pending,
            progress_percent: 60,
            image_url: "https://images.pexels.com/photos/9875415/pexels-photo-9875415.jpeg?auto=compress&cs=tinysrgb&w=400".to_string(),
            upload_date: day(2024, 12, 18),
            verification_date: None,
        },
        Project {
            id: ProjectId(3),
            name: "Ocean Cleanup Project".to_string(),
            location: "Pacific Ocean".to_string(),
            co2_absorbed_tons: 22_100,
            credits: 2_210,
            status: ProjectStatus::Verified,
            progress_percent: 95,
            image_url: "https://images.pexels.com/photos/1001965/pexels-photo-1001965.jpeg?auto=compress&cs=tinysrgb&w=400".to_string(),
            upload_date: day(2024, 12, 10),
            verification_date: Some(day(2024, 12, 14)),
        },
        Project {
            id: ProjectId(4),
            name: "Wind Farm Development".to_string(),
            location: "Denmark".to_string(),
            co2_absorbed_tons: 18_750,
            credits: 1_875,
            status: ProjectStatus::Rejected,
            progress_percent: 40,
            image_url: "https://images.pexels.com/photos/414928/pexels-photo-414928.jpeg?auto=compress&cs=tinysrgb&w=400".to_string(),
            upload_date: day(2024, 12, 12),
            verification_date: None,
        },
    ]
}

// =============================================================================
// AUTHORITY PANEL
// =============================================================================

pub fn submissions() -> Vec<Submission> {
    vec![
        Submission {
            id: SubmissionId(1),
            project_name: "Coastal Mangrove Restoration".to_string(),
            submitter: "Green Coast Initiative".to_string(),
            location: "Philippines".to_string(),
            category: Category::new("reforestation"),
            submission_date: day(2024, 12, 20),
            expected_co2_tons: 12_500,
            area_hectares: 450,
            status: SubmissionStatus::Pending,
            priority: Priority::High,
            files: vec![
                "satellite_images.jpg".to_string(),
                "plantation_data.csv".to_string(),
                "impact_report.pdf".to_string(),
            ],
            description: "Large-scale mangrove restoration project aimed at protecting coastal communities and marine biodiversity while sequestering significant amounts of carbon.".to_string(),
        },
        Submission {
            id: SubmissionId(2),
            project_name: "Community Solar Grid".to_string(),
            submitter: "Rural Energy Solutions".to_string(),
            location: "Kenya".to_string(),
            category: Category::new("solar"),
            submission_date: day(2024, 12, 19),
            expected_co2_tons: 8_750,
            area_hectares: 200,
            status: SubmissionStatus::Pending,
            priority: Priority::Medium,
            files: vec![
                "installation_photos.jpg".to_string(),
                "energy_output.csv".to_string(),
                "community_report.pdf".to_string(),
            ],
            description: "Solar panel installation providing clean energy access to rural communities while reducing reliance on fossil fuel generators.".to_string(),
        },
        Submission {
            id: SubmissionId(3),
            project_name: "Organic Waste Recycling".to_string(),
            submitter: "EcoWaste Management".to_string(),
            location: "Bangladesh".to_string(),
            category: Category::new("waste"),
            submission_date: day(2024, 12, 18),
            expected_co2_tons: 15_200,
            area_hectares: 75,
            status: SubmissionStatus::Pending,
            priority: Priority::High,
            files: vec![
                "facility_images.jpg".to_string(),
                "waste_data.csv".to_string(),
                "emission_calculations.pdf".to_string(),
            ],
            description: "Innovative organic waste processing facility converting municipal waste into biogas and compost, reducing methane emissions.".to_string(),
        },
    ]
}

pub fn decisions() -> Vec<Decision> {
    vec![
        Decision {
            id: SubmissionId(4),
            project_name: "Amazon Forest Protection".to_string(),
            submitter: "Rainforest Alliance".to_string(),
            location: "Brazil".to_string(),
            verdict: Verdict::Approved,
            decision_date: day(2024, 12, 15),
            credits_issued: 25_000,
            reviewer: "Dr. Maria Santos".to_string(),
            rejection_reason: None,
        },
        Decision {
            id: SubmissionId(5),
            project_name: "Wind Farm Expansion".to_string(),
            submitter: "Nordic Green Energy".to_string(),
            location: "Norway".to_string(),
            verdict: Verdict::Approved,
            decision_date: day(2024, 12, 14),
            credits_issued: 18_500,
            reviewer: "Prof. Erik Hansen".to_string(),
            rejection_reason: None,
        },
        Decision {
            id: SubmissionId(6),
            project_name: "Desert Solar Installation".to_string(),
            submitter: "Desert Power Corp".to_string(),
            location: "Morocco".to_string(),
            verdict: Verdict::Rejected,
            decision_date: day(2024, 12, 13),
            credits_issued: 0,
            reviewer: "Dr. Ahmed Al-Rashid".to_string(),
            rejection_reason: Some("Insufficient environmental impact documentation".to_string()),
        },
    ]
}

pub fn review_stats() -> Vec<HeadlineStat> {
    vec![
        HeadlineStat::new("Pending Reviews", "23"),
        HeadlineStat::new("Approved This Month", "47"),
        HeadlineStat::new("Total Credits Issued", "2.4M"),
        HeadlineStat::new("Active Reviewers", "12"),
    ]
}

// =============================================================================
// MARKETPLACE
// =============================================================================

/// The four distinct listings.
///
/// Earlier data repeated the first two listings under the same ids; those
/// copies are not carried.
pub fn credits() -> Vec<CarbonCredit> {
    vec![
        CarbonCredit {
            id: CreditId(1),
            project: "Mangrove Carbon Credits - Sundarbans".to_string(),
            location: "West Bengal, India".to_string(),
            category: Category::new("reforestation"),
            price: 1400,
            co2_amount_tons: 12_000,
            available_units: 6_000,
            verification: "VCS".to_string(),
            vintage: 2024,
            seller: "Sundarbans Eco Trust".to_string(),
            rating_tenths: 49,
            trend: Trend::Up,
            trend_percent: 11,
            description: "Certified mangrove carbon credits from Sundarbans, supporting coastal protection, biodiversity, and carbon sequestration.".to_string(),
            image_url: "https://www.shutterstock.com/image-photo/pichavaram-mangrove-forests-second-largest-600nw-2187072287.jpg".to_string(),
        },
        CarbonCredit {
            id: CreditId(2),
            project: "Seagrass Restoration Credits - Gulf of Mannar".to_string(),
            location: "Tamil Nadu, India".to_string(),
            category: Category::new("restoration"),
            price: 1800,
            co2_amount_tons: 8_000,
            available_units: 4_000,
            verification: "Gold Standard".to_string(),
            vintage: 2024,
            seller: "BlueSeas Foundation".to_string(),
            rating_tenths: 48,
            trend: Trend::Up,
            trend_percent: 9,
            description: "Community-led seagrass restoration generating blue carbon credits while improving marine biodiversity and fisheries.".to_string(),
            image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSx8KPZHps_ESfAolwRQMzCX0oYG3NqYH0ujA&s".to_string(),
        },
        CarbonCredit {
            id: CreditId(3),
            project: "Salt Marsh Protection Units - Chilika Lake".to_string(),
            location: "Odisha, India".to_string(),
            category: Category::new("conservation"),
            price: 1000,
            co2_amount_tons: 5_000,
            available_units: 2_500,
            verification: "CDM".to_string(),
            vintage: 2023,
            seller: "Odisha Coastal Alliance".to_string(),
            rating_tenths: 47,
            trend: Trend::Down,
            trend_percent: 4,
            description: "Salt marsh ecosystem conservation credits from Chilika Lake, enhancing carbon storage and coastal flood resilience.".to_string(),
            image_url: "https://natureindiatoursblog.wordpress.com/wp-content/uploads/2019/11/mangrooves.jpg?w=688".to_string(),
        },
        CarbonCredit {
            id: CreditId(4),
            project: "Mangrove Reforestation Pre-Sale - Pichavaram".to_string(),
            location: "Tamil Nadu, India".to_string(),
            category: Category::new("reforestation"),
            price: 1200,
            co2_amount_tons: 15_000,
            available_units: 7_500,
            verification: "Pending VCS".to_string(),
            vintage: 2025,
            seller: "Tamil Nadu Blue Carbon Initiative".to_string(),
            rating_tenths: 46,
            trend: Trend::Up,
            trend_percent: 13,
            description: "Forward credits from upcoming mangrove reforestation in Pichavaram. Early buyers benefit from discounted rates.".to_string(),
            image_url: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTBinQuyxJIUmk-O_UAE8h_D9zTau3ViCNvIw&s".to_string(),
        },
    ]
}

pub fn market_stats() -> Vec<HeadlineStat> {
    vec![
        HeadlineStat::new("Total Volume", "2.4M")
            .with_unit("tons CO2")
            .with_trend(Trend::Up, "+15%"),
        HeadlineStat::new("Avg Price", "Rs.43")
            .with_unit("per ton")
            .with_trend(Trend::Up, "+8%"),
        HeadlineStat::new("Active Listings", "1,247")
            .with_unit("credits")
            .with_trend(Trend::Up, "+12%"),
        HeadlineStat::new("Trading Volume", "Rs.108M")
            .with_unit("today")
            .with_trend(Trend::Down, "-3%"),
    ]
}

/// Ids that occur more than once in `credits`, in ascending order.
pub fn duplicate_credit_ids(credits: &[CarbonCredit]) -> Vec<CreditId> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for credit in credits {
        if !seen.insert(credit.id) {
            duplicates.insert(credit.id);
        }
    }
    duplicates.into_iter().collect()
}

// =============================================================================
// BALANCE
// =============================================================================

pub fn transactions() -> Vec<Transaction> {
    let earned = |id, amount: i64, project: &str, date, value| Transaction {
        id: TransactionId(id),
        kind: TransactionKind::Earned,
        amount,
        project: project.to_string(),
        date,
        value,
        co2_tons: amount,
    };

    vec![
        earned(1, 1_524, "Mangrove Reforestation - Sundarbans", day(2024, 12, 20), 68_580),
        earned(2, 1_100, "Sundari Mangrove Conservation - Sundarbans", day(2024, 12, 18), 49_500),
        earned(3, 800, "Seagrass Restoration - Gulf of Mannar", day(2024, 12, 14), 36_000),
        earned(4, 500, "Salt Marsh Protection - Chilika Lake", day(2024, 12, 10), 22_500),
        Transaction {
            id: TransactionId(5),
            kind: TransactionKind::Traded,
            amount: -300,
            project: "Marketplace Blue Carbon Sale".to_string(),
            date: day(2024, 12, 8),
            value: -13_500,
            co2_tons: -300,
        },
    ]
}

pub fn balance_summary() -> BalanceSummary {
    BalanceSummary {
        total_credits: 15_750,
        credit_value: 678_500,
        monthly_gain: 1_250,
        co2_offset_tons: 15_750,
        rank: "Gold Contributor".to_string(),
        active_projects: 8,
    }
}

pub fn portfolio_breakdown() -> Vec<PortfolioSlice> {
    [
        ("Reforestation", 6_250, 40),
        ("Renewable Energy", 4_725, 30),
        ("Ocean Cleanup", 2_363, 15),
        ("Waste Management", 1_575, 10),
        ("Other", 788, 5),
    ]
    .into_iter()
    .map(|(label, amount, percentage)| PortfolioSlice {
        label: label.to_string(),
        amount,
        percentage,
    })
    .collect()
}

pub fn achievements() -> Vec<Achievement> {
    [
        ("Carbon Hero", "Offset 10,000+ tons CO2", true),
        ("Early Adopter", "First 100 platform users", true),
        ("Green Investor", "Invested in 5+ projects", true),
        ("Planet Protector", "Offset 25,000+ tons CO2", false),
    ]
    .into_iter()
    .map(|(title, description, unlocked)| Achievement {
        title: title.to_string(),
        description: description.to_string(),
        unlocked,
    })
    .collect()
}

pub fn monthly_activity() -> Vec<MonthlyActivity> {
    [
        ("Jul", 850, 200),
        ("Aug", 1_200, 150),
        ("Sep", 950, 300),
        ("Oct", 1_450, 250),
        ("Nov", 1_100, 400),
        ("Dec", 1_250, 180),
    ]
    .into_iter()
    .map(|(month, earned, traded)| MonthlyActivity {
        month: month.to_string(),
        earned,
        traded,
    })
    .collect()
}

// =============================================================================
// LANDING
// =============================================================================

pub fn landing_features() -> Vec<Feature> {
    [
        (
            "Carbon Credit Tracking",
            "Real-time monitoring of your environmental projects and carbon credit generation",
        ),
        (
            "Verified Projects",
            "Authority-approved verification system ensuring authenticity of all carbon credits",
        ),
        (
            "Marketplace Trading",
            "Trade and exchange carbon credits in our secure, transparent marketplace",
        ),
        (
            "Community Impact",
            "Connect NGOs, communities, and organizations for maximum environmental impact",
        ),
    ]
    .into_iter()
    .map(|(title, description)| Feature {
        title: title.to_string(),
        description: description.to_string(),
    })
    .collect()
}

pub fn landing_stats() -> Vec<HeadlineStat> {
    vec![
        HeadlineStat::new("CO2 Tons Offset", "2.5M"),
        HeadlineStat::new("Active Projects", "1,200+"),
        HeadlineStat::new("Verified Partners", "500+"),
        HeadlineStat::new("Approval Rate", "98%"),
    ]
}

// =============================================================================
// UPLOAD
// =============================================================================

pub fn project_types() -> Vec<ProjectTypeOption> {
    [
        ("reforestation", "Reforestation"),
        ("solar", "Solar Energy"),
        ("wind", "Wind Energy"),
        ("ocean", "Ocean Cleanup"),
    ]
    .into_iter()
    .map(|(id, label)| ProjectTypeOption {
        id: Category::new(id),
        label: label.to_string(),
    })
    .collect()
}

pub fn data_types() -> Vec<DataTypeGuide> {
    [
        (
            "plantation",
            "Plantation Counts",
            "Tree count data and species information",
        ),
        (
            "satellite",
            "Satellite Images",
            "High-resolution satellite imagery",
        ),
        ("iot", "IoT Readings", "Sensor data and measurements"),
        ("photos", "Field Photos", "On-ground documentation photos"),
    ]
    .into_iter()
    .map(|(id, label, description)| DataTypeGuide {
        id: id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
    })
    .collect()
}
