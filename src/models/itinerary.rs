use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    #[serde(default)]
    pub stops: Vec<Stop>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Validate)]
pub struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Flight,
    Train,
    Bus,
    Car,
    Ferry,
    Walking,
    #[default]
    Other,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Transportation {
    #[serde(default)]
    pub mode: TransportMode,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub cost: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccommodationKind {
    #[default]
    Hotel,
    Hostel,
    Apartment,
    Guesthouse,
    Resort,
    Camping,
    Other,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub name: Option<String>,
    #[serde(default)]
    pub kind: AccommodationKind,
    pub address: Option<String>,
    #[serde(with = "super::timestamp")]
    pub check_in: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub check_out: DateTime<Utc>,
    pub nights: i64,
    #[serde(default)]
    pub cost_per_night: f64,
    #[serde(default)]
    pub total_cost: f64,
    pub booking_reference: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
}

impl Accommodation {
    /// Placeholder accommodation spanning the whole stop.
    pub fn spanning(check_in: DateTime<Utc>, check_out: DateTime<Utc>, nights: i64) -> Self {
        Self {
            name: None,
            kind: AccommodationKind::default(),
            address: None,
            check_in,
            check_out,
            nights,
            cost_per_night: 0.0,
            total_cost: 0.0,
            booking_reference: None,
            confirmed: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Sightseeing,
    Adventure,
    Cultural,
    Food,
    Shopping,
    Nightlife,
    Relaxation,
    Transportation,
    #[default]
    Other,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "_id")]
    pub id: String,
    pub day: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub category: ActivityCategory,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub booking_required: bool,
    pub booking_url: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub rating: Option<u8>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(rename = "_id")]
    pub id: String,
    pub city: String,
    pub country: String,
    pub coordinates: Option<Coordinates>,
    #[serde(with = "super::timestamp")]
    pub arrival_date: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub departure_date: DateTime<Utc>,
    pub duration: i64,
    pub accommodation: Accommodation,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub daily_budget: f64,
    pub transportation: Option<Transportation>,
    pub notes: Option<String>,
    pub order: usize,
    #[serde(default)]
    pub total_budget: f64,
}

/// Budget figures returned alongside every itinerary mutation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: f64,
    pub activities_cost: f64,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StopChange {
    pub stop: Stop,
    pub budget: BudgetSummary,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivityChange {
    pub activity: Activity,
    pub budget: BudgetSummary,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewStop {
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(nested)]
    pub coordinates: Option<Coordinates>,
    pub arrival_date: DateTime<Utc>,
    pub departure_date: DateTime<Utc>,
    #[validate(range(min = 0.0))]
    pub daily_budget: Option<f64>,
    #[validate(nested)]
    pub transportation: Option<Transportation>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub kind: Option<AccommodationKind>,
    pub address: Option<String>,
    #[validate(range(min = 0.0))]
    pub cost_per_night: Option<f64>,
    #[validate(range(min = 0.0))]
    pub total_cost: Option<f64>,
    pub booking_reference: Option<String>,
    pub confirmed: Option<bool>,
}

/// Fields a client may change on a stop.
#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StopUpdate {
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,
    #[validate(nested)]
    pub coordinates: Option<Coordinates>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub departure_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0))]
    pub daily_budget: Option<f64>,
    #[validate(nested)]
    pub transportation: Option<Transportation>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(nested)]
    pub accommodation: Option<AccommodationUpdate>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReorderStops {
    pub stop_ids: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub day: i64,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub category: Option<ActivityCategory>,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,
    pub booking_required: Option<bool>,
    #[validate(url)]
    pub booking_url: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
}

/// Fields a client may change on an activity.
#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityUpdate {
    pub day: Option<i64>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub category: Option<ActivityCategory>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,
    pub booking_required: Option<bool>,
    #[validate(url)]
    pub booking_url: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityToggle {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
}
