use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    pub total: f64,
    pub spent: f64,
    pub remaining: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripAnalytics {
    pub trip_id: String,
    pub views: u32,
    pub likes: u32,
    pub shares: u32,
    pub collaborators: usize,
    pub stops: usize,
    pub activities: usize,
    pub completed_activities: usize,
    pub budget: BudgetOverview,
    pub countries: Vec<String>,
    pub cities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub planning: u64,
    pub active: u64,
    pub completed: u64,
    pub cancelled: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserBudgetTotals {
    pub total: f64,
    pub average: f64,
    pub spent: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub total_views: u64,
    pub total_likes: u64,
    pub average_views: f64,
    pub average_likes: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub total_trips: u64,
    pub status_breakdown: StatusBreakdown,
    pub budget: UserBudgetTotals,
    pub engagement: Engagement,
    pub recent_trips: u64,
    pub countries_visited: usize,
    pub cities_visited: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryCount {
    pub country: String,
    pub trip_count: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Growth {
    pub new_users: u64,
    pub new_trips: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAnalytics {
    pub total_users: u64,
    pub total_trips: u64,
    pub public_trips: u64,
    pub completed_trips: u64,
    pub top_destinations: Vec<CountryCount>,
    pub growth: Growth,
}
