use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::trip::{TripStatus, TripTheme};

pub const MAX_QUERY_LEN: usize = 100;
pub const DEFAULT_TRIP_LIMIT: u64 = 20;
pub const MAX_TRIP_LIMIT: u64 = 50;
pub const DEFAULT_USER_LIMIT: u64 = 10;
pub const MAX_USER_LIMIT: u64 = 20;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TripSort {
    /// Newest first.
    #[default]
    Relevance,
    Date,
    Budget,
    Popularity,
    Name,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TripSearchParams {
    pub q: Option<String>,
    pub theme: Option<TripTheme>,
    pub status: Option<TripStatus>,
    pub country: Option<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub sort_by: Option<TripSort>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchParams {
    pub q: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// A fully resolved trip search, ready for a store to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuery {
    /// Sanitised free text, matched case-insensitively as a substring.
    pub text: String,
    /// The requesting user; only trips they may see are returned.
    pub viewer: String,
    pub theme: Option<TripTheme>,
    pub status: Option<TripStatus>,
    pub country: Option<String>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
    pub starts_on_or_after: Option<DateTime<Utc>>,
    pub ends_on_or_before: Option<DateTime<Utc>>,
    pub sort: TripSort,
    pub limit: u64,
    pub offset: u64,
}

impl TripQuery {
    /// Regex source for the free-text part.
    pub fn pattern(&self) -> String {
        regex::escape(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserQuery {
    pub text: String,
    pub limit: u64,
    pub offset: u64,
}

impl UserQuery {
    pub fn pattern(&self) -> String {
        regex::escape(&self.text)
    }
}

/// Restricts trip counts for platform statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripCountFilter {
    pub public_only: bool,
    pub status: Option<TripStatus>,
    pub created_after: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub has_more: bool,
}

impl<T> PagedResponse<T> {
    pub fn new(page: Page<T>, limit: u64, offset: u64) -> Self {
        Self {
            has_more: offset.saturating_add(limit) < page.total,
            items: page.items,
            total: page.total,
            limit,
            offset,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopularDestination {
    pub city: String,
    pub country: String,
    pub trip_count: u64,
    pub occurrences: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Location,
    Trip,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub text: String,
    pub trip_id: Option<String>,
}
