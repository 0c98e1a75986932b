use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::permission::authorize;
use crate::config::AnalyticsAccess;
use crate::db::{TripStore, UserStore};
use crate::error::ApiError;
use crate::models::analytics::{
    BudgetOverview, CountryCount, Engagement, GlobalAnalytics, Growth, StatusBreakdown,
    TripAnalytics, UserAnalytics, UserBudgetTotals,
};
use crate::models::search::TripCountFilter;
use crate::models::trip::{Permission, Trip, TripStatus};

const RECENT_DAYS: i64 = 30;
const GROWTH_DAYS: i64 = 7;
const TOP_DESTINATIONS: usize = 10;

#[derive(Clone)]
pub struct AnalyticsService {
    trips: Arc<dyn TripStore>,
    users: Arc<dyn UserStore>,
    access: AnalyticsAccess,
}

impl AnalyticsService {
    pub fn new(
        trips: Arc<dyn TripStore>,
        users: Arc<dyn UserStore>,
        access: AnalyticsAccess,
    ) -> Self {
        Self {
            trips,
            users,
            access,
        }
    }

    pub async fn for_trip(&self, trip_id: &str, user_id: &str) -> Result<TripAnalytics, ApiError> {
        let trip = self.trips.find_trip(trip_id).await?;
        let (trip, _) = authorize(trip, user_id, Permission::Analytics, self.access).into_result()?;
        Ok(trip_analytics(&trip))
    }

    pub async fn for_user(&self, user_id: &str) -> Result<UserAnalytics, ApiError> {
        let trips = self.trips.trips_for_member(user_id).await?;
        Ok(user_analytics(&trips, Utc::now()))
    }

    pub async fn global(&self) -> Result<GlobalAnalytics, ApiError> {
        let week_ago = Utc::now() - Duration::days(GROWTH_DAYS);

        let total_users = self.users.count_users(None).await?;
        let total_trips = self.trips.count_trips(&TripCountFilter::default()).await?;
        let public_trips = self
            .trips
            .count_trips(&TripCountFilter {
                public_only: true,
                ..Default::default()
            })
            .await?;
        let completed_trips = self
            .trips
            .count_trips(&TripCountFilter {
                status: Some(TripStatus::Completed),
                ..Default::default()
            })
            .await?;
        let growth = Growth {
            new_users: self.users.count_users(Some(week_ago)).await?,
            new_trips: self
                .trips
                .count_trips(&TripCountFilter {
                    created_after: Some(week_ago),
                    ..Default::default()
                })
                .await?,
        };
        let public = self.trips.public_trips().await?;

        Ok(GlobalAnalytics {
            total_users,
            total_trips,
            public_trips,
            completed_trips,
            top_destinations: top_countries(&public, TOP_DESTINATIONS),
            growth,
        })
    }
}

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

pub fn trip_analytics(trip: &Trip) -> TripAnalytics {
    let stops = &trip.itinerary.stops;
    let activities = stops.iter().flat_map(|s| s.activities.iter());

    TripAnalytics {
        trip_id: trip.id.clone(),
        views: trip.stats.views,
        likes: trip.stats.likes,
        shares: trip.stats.shares,
        collaborators: trip.collaborators.len(),
        stops: stops.len(),
        activities: activities.clone().count(),
        completed_activities: activities.filter(|a| a.completed).count(),
        budget: BudgetOverview {
            total: trip.budget.total,
            spent: trip.budget.spent,
            remaining: trip.budget.total - trip.budget.spent,
        },
        countries: distinct(stops.iter().map(|s| s.country.as_str())),
        cities: distinct(stops.iter().map(|s| s.city.as_str())),
    }
}

pub fn user_analytics(trips: &[Trip], now: DateTime<Utc>) -> UserAnalytics {
    let mut status_breakdown = StatusBreakdown::default();
    for trip in trips {
        match trip.status {
            TripStatus::Planning => status_breakdown.planning += 1,
            TripStatus::Active => status_breakdown.active += 1,
            TripStatus::Completed => status_breakdown.completed += 1,
            TripStatus::Cancelled => status_breakdown.cancelled += 1,
        }
    }

    let count = trips.len();
    let average = |sum: f64| if count == 0 { 0.0 } else { sum / count as f64 };

    let budget_total: f64 = trips.iter().map(|t| t.budget.total).sum();
    let total_views: u64 = trips.iter().map(|t| u64::from(t.stats.views)).sum();
    let total_likes: u64 = trips.iter().map(|t| u64::from(t.stats.likes)).sum();

    let since = now - Duration::days(RECENT_DAYS);
    let stops = || trips.iter().flat_map(|t| t.itinerary.stops.iter());

    UserAnalytics {
        total_trips: count as u64,
        status_breakdown,
        budget: UserBudgetTotals {
            total: budget_total,
            average: average(budget_total),
            spent: trips.iter().map(|t| t.budget.spent).sum(),
        },
        engagement: Engagement {
            total_views,
            total_likes,
            average_views: average(total_views as f64),
            average_likes: average(total_likes as f64),
        },
        recent_trips: trips.iter().filter(|t| t.created_at >= since).count() as u64,
        countries_visited: distinct(stops().map(|s| s.country.as_str())).len(),
        cities_visited: distinct(stops().map(|s| s.city.as_str())).len(),
    }
}

/// Countries ranked by how many of `trips` visit them.
pub fn top_countries(trips: &[Trip], limit: usize) -> Vec<CountryCount> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for trip in trips {
        for country in distinct(trip.itinerary.stops.iter().map(|s| s.country.as_str())) {
            *counts.entry(country).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<CountryCount> = counts
        .into_iter()
        .map(|(country, trip_count)| CountryCount {
            country,
            trip_count,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.trip_count
            .cmp(&a.trip_count)
            .then_with(|| a.country.cmp(&b.country))
    });
    ranked.truncate(limit);
    ranked
}
