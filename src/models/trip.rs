use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::itinerary::Itinerary;
use super::user::TravelStyle;
use crate::services::budget::day_span;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Edit,
    Delete,
    Invite,
    View,
    Analytics,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Edit => "edit",
            Permission::Delete => "delete",
            Permission::Invite => "invite",
            Permission::View => "view",
            Permission::Analytics => "analytics",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorRole {
    Owner,
    Editor,
    Viewer,
}

impl CollaboratorRole {
    pub fn default_permissions(&self) -> Vec<Permission> {
        match self {
            CollaboratorRole::Owner => vec![
                Permission::Edit,
                Permission::Delete,
                Permission::Invite,
                Permission::View,
            ],
            CollaboratorRole::Editor => vec![Permission::Edit, Permission::View],
            CollaboratorRole::Viewer => vec![Permission::View],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub user: String,
    pub role: CollaboratorRole,
    pub permissions: Vec<Permission>,
    #[serde(with = "super::timestamp")]
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Planning,
    Active,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Active => "active",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TripTheme {
    Adventure,
    Cultural,
    Relaxation,
    Business,
    Family,
    Romantic,
    Backpacking,
    Luxury,
    #[default]
    Other,
}

impl TripTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripTheme::Adventure => "adventure",
            TripTheme::Cultural => "cultural",
            TripTheme::Relaxation => "relaxation",
            TripTheme::Business => "business",
            TripTheme::Family => "family",
            TripTheme::Romantic => "romantic",
            TripTheme::Backpacking => "backpacking",
            TripTheme::Luxury => "luxury",
            TripTheme::Other => "other",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBreakdown {
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub accommodation: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub transportation: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub food: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub activities: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub shopping: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub other: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripBudget {
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub total: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub spent: f64,
    #[validate(length(equal = 3))]
    #[serde(default = "default_currency")]
    pub currency: String,
    #[validate(nested)]
    #[serde(default)]
    pub breakdown: BudgetBreakdown,
}

impl Default for TripBudget {
    fn default() -> Self {
        Self {
            total: 0.0,
            spent: 0.0,
            currency: default_currency(),
            breakdown: BudgetBreakdown::default(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripStats {
    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub shares: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripCounter {
    Views,
    Likes,
    Shares,
}

impl TripCounter {
    pub fn field(&self) -> &'static str {
        match self {
            TripCounter::Views => "stats.views",
            TripCounter::Likes => "stats.likes",
            TripCounter::Shares => "stats.shares",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub owner: String,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    #[serde(with = "super::timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub end_date: DateTime<Utc>,
    pub duration: i64,
    pub travelers: u32,
    #[serde(default)]
    pub theme: TripTheme,
    #[serde(default)]
    pub travel_style: TravelStyle,
    #[serde(default)]
    pub status: TripStatus,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub budget: TripBudget,
    #[serde(default)]
    pub itinerary: Itinerary,
    #[serde(default)]
    pub stats: TripStats,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub version: i64,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    pub const COLLECTION: &'static str = "trips";

    /// Creates a trip owned by `owner`, who is also recorded as its first collaborator.
    pub fn new(owner: &str, input: NewTrip) -> Self {
        let now = Utc::now();
        let mut trip = Trip {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            description: input.description,
            owner: owner.to_string(),
            collaborators: vec![Collaborator {
                user: owner.to_string(),
                role: CollaboratorRole::Owner,
                permissions: CollaboratorRole::Owner.default_permissions(),
                added_at: now,
            }],
            start_date: input.start_date,
            end_date: input.end_date,
            duration: 0,
            travelers: input.travelers.unwrap_or(1),
            theme: input.theme.unwrap_or_default(),
            travel_style: input.travel_style.unwrap_or_default(),
            status: TripStatus::Planning,
            is_public: input.is_public.unwrap_or(false),
            budget: input.budget.unwrap_or_default(),
            itinerary: Itinerary::default(),
            stats: TripStats::default(),
            cover_image: input.cover_image,
            photos: Vec::new(),
            tags: input.tags.unwrap_or_default(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        trip.refresh_derived();
        trip
    }

    /// Recomputes every field derived from other fields. Runs before each write.
    pub fn refresh_derived(&mut self) {
        self.duration = day_span(self.start_date, self.end_date);
        self.itinerary.stops.sort_by_key(|stop| stop.order);
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn collaborator(&self, user_id: &str) -> Option<&Collaborator> {
        self.collaborators.iter().find(|c| c.user == user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.owner == user_id || self.collaborator(user_id).is_some()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(range(min = 1, max = 100))]
    pub travelers: Option<u32>,
    pub theme: Option<TripTheme>,
    pub travel_style: Option<TravelStyle>,
    pub is_public: Option<bool>,
    #[validate(nested)]
    pub budget: Option<TripBudget>,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Fields a client may change on an existing trip. Anything else in the
/// request body is ignored.
#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 100))]
    pub travelers: Option<u32>,
    pub theme: Option<TripTheme>,
    pub travel_style: Option<TravelStyle>,
    pub status: Option<TripStatus>,
    pub is_public: Option<bool>,
    #[validate(nested)]
    pub budget: Option<TripBudget>,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Version the client last read; a mismatch rejects the update.
    pub version: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorInvite {
    pub user_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: CollaboratorRole,
    pub permissions: Option<Vec<Permission>>,
}
