//! # Views
//!
//! The route surface of the platform and the static content blocks the
//! views display.

use crate::{Category, Trend};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A top-level view, addressed by its client-side path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Landing,
    Dashboard,
    Marketplace,
    Authority,
    Balance,
    Upload,
}

impl View {
    /// Every view, in navigation order.
    pub const ALL: [View; 6] = [
        View::Landing,
        View::Dashboard,
        View::Upload,
        View::Marketplace,
        View::Authority,
        View::Balance,
    ];

    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Dashboard => "/dashboard",
            Self::Marketplace => "/marketplace",
            Self::Authority => "/authority",
            Self::Balance => "/balance",
            Self::Upload => "/upload",
        }
    }

    /// Navigation label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Landing => "Home",
            Self::Dashboard => "Dashboard",
            Self::Marketplace => "Marketplace",
            Self::Authority => "Authority",
            Self::Balance => "My Balance",
            Self::Upload => "Upload Project",
        }
    }

    /// Resolve a path. Trailing slashes are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|view| view.path() == normalized)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A platform capability advertised on the landing view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

/// A project type offered on the first upload step.
///
/// The label is the selector's caption and may differ from
/// [`Category::label`], e.g. `solar` is offered as "Solar Energy".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTypeOption {
    pub id: Category,
    pub label: String,
}

/// A kind of evidence the data upload step asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeGuide {
    pub id: String,
    pub label: String,
    pub description: String,
}

/// A labelled figure in a stats strip.
///
/// Values are preformatted platform-wide figures, not derived from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineStat {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
}

impl HeadlineStat {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            unit: None,
            trend: None,
            change: None,
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub fn with_trend(mut self, trend: Trend, change: impl Into<String>) -> Self {
        self.trend = Some(trend);
        self.change = Some(change.into());
        self
    }
}
