//! # List Derivation Pipeline
//!
//! Filter → sort stages shared by every list view.
//!
//! - The filter stage keeps records whose categorical field equals the
//!   selected value, or everything when the `all` sentinel is selected.
//! - The sort stage orders a copy of its input by one integer key using a
//!   stable comparison. The direction of each key comes from a [`SortTable`],
//!   which the app layer may load from configuration.
//!
//! Neither stage fails: unknown categories match nothing and unknown sort
//! keys leave the input order untouched.

use crate::primitives::{ALL_CATEGORIES, DEFAULT_SORT_KEY};
use crate::{CarbonCredit, Category, LedgerError, Project, Submission};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// FILTER STAGE
// =============================================================================

/// Selected value of a category filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Pass everything through.
    #[default]
    All,
    /// Keep only records of this category.
    Only(Category),
}

impl CategoryFilter {
    /// Parse a filter value. `"all"` selects everything; anything else,
    /// including unknown categories, selects that exact category.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(Category::new(value))
        }
    }

    /// Whether a record with this category passes the filter.
    #[must_use]
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }

    /// The filter value as it was selected.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records that expose a categorical field to the filter stage.
pub trait Categorized {
    fn category(&self) -> &Category;
}

impl Categorized for CarbonCredit {
    fn category(&self) -> &Category {
        &self.category
    }
}

impl Categorized for Submission {
    fn category(&self) -> &Category {
        &self.category
    }
}

/// Keep the records matching `predicate`, preserving their relative order.
fn filter_where<T: Clone>(items: &[T], predicate: impl Fn(&T) -> bool) -> Vec<T> {
    items.iter().filter(|item| predicate(item)).cloned().collect()
}

/// Filter on an arbitrary categorical field.
pub fn filter_by<T, F>(items: &[T], filter: &CategoryFilter, field: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &Category,
{
    match filter {
        CategoryFilter::All => items.to_vec(),
        CategoryFilter::Only(_) => filter_where(items, |item| filter.matches(field(item))),
    }
}

/// Filter records on their own category.
pub fn filter_category<T: Categorized + Clone>(items: &[T], filter: &CategoryFilter) -> Vec<T> {
    filter_by(items, filter, Categorized::category)
}

// =============================================================================
// SORT KEYS
// =============================================================================

/// Fields the sort stage knows how to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortField {
    Price,
    Co2Amount,
    Rating,
}

impl SortField {
    /// All sortable fields, in presentation order.
    pub const ALL: [SortField; 3] = [SortField::Price, SortField::Co2Amount, SortField::Rating];

    /// Key name as used in URLs and configuration.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Co2Amount => "co2Amount",
            Self::Rating => "rating",
        }
    }

    /// Resolve a key name. Accepts the snake_case spelling of `co2Amount`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "price" => Some(Self::Price),
            "co2Amount" | "co2_amount" => Some(Self::Co2Amount),
            "rating" => Some(Self::Rating),
            _ => None,
        }
    }

    /// Label for sort selectors.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Price => "Price",
            Self::Co2Amount => "CO2 Amount",
            Self::Rating => "Rating",
        }
    }
}

/// A selected sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Field(SortField),
    /// A key with no comparator; sorting keeps input order.
    Unrecognized(String),
}

impl SortKey {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match SortField::from_name(value) {
            Some(field) => Self::Field(field),
            None => Self::Unrecognized(value.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Field(field) => field.name(),
            Self::Unrecognized(name) => name,
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::parse(DEFAULT_SORT_KEY)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison direction for one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

// =============================================================================
// SORT TABLE
// =============================================================================

/// Comparator table: which direction each sort key orders in.
///
/// Serialized as a map from key name to direction, e.g.
/// `{ price = "ascending", co2Amount = "descending" }`. Keys missing from the
/// table behave like unrecognized keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, SortDirection>",
    into = "BTreeMap<String, SortDirection>"
)]
pub struct SortTable {
    directions: BTreeMap<SortField, SortDirection>,
}

impl SortTable {
    /// An empty table; every key leaves order unchanged.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            directions: BTreeMap::new(),
        }
    }

    /// Set the direction of one field.
    #[must_use]
    pub fn with(mut self, field: SortField, direction: SortDirection) -> Self {
        self.directions.insert(field, direction);
        self
    }

    /// Direction configured for a field.
    #[must_use]
    pub fn direction(&self, field: SortField) -> Option<SortDirection> {
        self.directions.get(&field).copied()
    }

    /// Fields present in the table, in field order.
    pub fn fields(&self) -> impl Iterator<Item = SortField> + '_ {
        self.directions.keys().copied()
    }

    fn resolve(&self, key: &SortKey) -> Option<(SortField, SortDirection)> {
        match key {
            SortKey::Field(field) => self.direction(*field).map(|dir| (*field, dir)),
            SortKey::Unrecognized(_) => None,
        }
    }
}

impl Default for SortTable {
    fn default() -> Self {
        Self::empty()
            .with(SortField::Price, SortDirection::Ascending)
            .with(SortField::Co2Amount, SortDirection::Descending)
            .with(SortField::Rating, SortDirection::Descending)
    }
}

impl TryFrom<BTreeMap<String, SortDirection>> for SortTable {
    type Error = LedgerError;

    fn try_from(raw: BTreeMap<String, SortDirection>) -> Result<Self, Self::Error> {
        let mut table = Self::empty();
        for (name, direction) in raw {
            let field = SortField::from_name(&name)
                .ok_or_else(|| LedgerError::Config(format!("unknown sort key '{}'", name)))?;
            table = table.with(field, direction);
        }
        Ok(table)
    }
}

impl From<SortTable> for BTreeMap<String, SortDirection> {
    fn from(table: SortTable) -> Self {
        table
            .directions
            .into_iter()
            .map(|(field, direction)| (field.name().to_string(), direction))
            .collect()
    }
}

// =============================================================================
// SORT STAGE
// =============================================================================

/// Records that expose integer sort values.
pub trait Sortable {
    /// Value of `field`, or `None` when the record has no such field.
    fn sort_value(&self, field: SortField) -> Option<i64>;
}

fn widen(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl Sortable for CarbonCredit {
    fn sort_value(&self, field: SortField) -> Option<i64> {
        match field {
            SortField::Price => Some(widen(self.price)),
            SortField::Co2Amount => Some(widen(self.co2_amount_tons)),
            SortField::Rating => Some(i64::from(self.rating_tenths)),
        }
    }
}

impl Sortable for Project {
    fn sort_value(&self, field: SortField) -> Option<i64> {
        match field {
            SortField::Co2Amount => Some(widen(self.co2_absorbed_tons)),
            SortField::Price | SortField::Rating => None,
        }
    }
}

/// Records without a value sort after every record with one, in any direction.
fn compare_values(a: Option<i64>, b: Option<i64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort a copy of `items` by `key`.
///
/// The sort is stable: records with equal keys keep their input order. An
/// unrecognized key, or one absent from `table`, returns the input order.
pub fn sort_by_key<T: Sortable + Clone>(items: &[T], key: &SortKey, table: &SortTable) -> Vec<T> {
    let mut sorted = items.to_vec();
    if let Some((field, direction)) = table.resolve(key) {
        sorted.sort_by(|a, b| compare_values(a.sort_value(field), b.sort_value(field), direction));
    }
    sorted
}

// =============================================================================
// LISTING QUERY
// =============================================================================

/// Filter then sort, as the marketplace does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingQuery {
    pub filter: CategoryFilter,
    pub sort: SortKey,
}

impl ListingQuery {
    /// Build a query from raw filter and sort values.
    #[must_use]
    pub fn parse(category: &str, sort: &str) -> Self {
        Self {
            filter: CategoryFilter::parse(category),
            sort: SortKey::parse(sort),
        }
    }

    /// Run both stages over `items`.
    pub fn apply<T>(&self, items: &[T], table: &SortTable) -> Vec<T>
    where
        T: Categorized + Sortable + Clone,
    {
        let filtered = filter_category(items, &self.filter);
        sort_by_key(&filtered, &self.sort, table)
    }
}

// =============================================================================
// DERIVED COUNTS
// =============================================================================

/// One entry of a category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub id: String,
    pub label: String,
    pub count: usize,
}

/// Category selector entries: the `all` entry with the total, then each
/// category in order of first appearance.
pub fn category_counts<T: Categorized>(items: &[T]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = vec![CategoryCount {
        id: ALL_CATEGORIES.to_string(),
        label: "All Projects".to_string(),
        count: items.len(),
    }];

    for item in items {
        let category = item.category();
        match counts
            .iter_mut()
            .skip(1)
            .find(|entry| entry.id == category.as_str())
        {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                id: category.as_str().to_string(),
                label: category.label(),
                count: 1,
            }),
        }
    }

    counts
}

// =============================================================================
// TESTS
// =============================================================================
