use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use regex::RegexBuilder;

use crate::db::{TripStore, UserStore};
use crate::error::ApiError;
use crate::models::search::{
    Page, PopularDestination, Suggestion, SuggestionKind, TripQuery, TripSearchParams, UserQuery,
    UserSearchParams, DEFAULT_TRIP_LIMIT, DEFAULT_USER_LIMIT, MAX_QUERY_LEN, MAX_TRIP_LIMIT,
    MAX_USER_LIMIT,
};
use crate::models::trip::Trip;
use crate::models::user::UserProfile;

pub const DEFAULT_DESTINATION_LIMIT: usize = 10;
pub const MAX_DESTINATION_LIMIT: usize = 50;
const LOCATION_SUGGESTIONS: usize = 5;
const TRIP_SUGGESTIONS: usize = 3;

/// Keeps word characters, whitespace and `-`, trimmed and capped at
/// [`MAX_QUERY_LEN`] characters.
pub fn sanitize_query(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace() || *c == '-')
        .collect();
    kept.trim().chars().take(MAX_QUERY_LEN).collect()
}

pub fn clamp_limit(requested: Option<u64>, default: u64, max: u64) -> u64 {
    requested.unwrap_or(default).clamp(1, max)
}

#[derive(Clone)]
pub struct SearchService {
    trips: Arc<dyn TripStore>,
    users: Arc<dyn UserStore>,
}

impl SearchService {
    pub fn new(trips: Arc<dyn TripStore>, users: Arc<dyn UserStore>) -> Self {
        Self { trips, users }
    }

    /// Resolves request parameters into a store query, or `None` when the
    /// text sanitises to nothing.
    pub fn trip_query(params: &TripSearchParams, viewer: &str) -> Option<TripQuery> {
        let text = sanitize_query(params.q.as_deref().unwrap_or_default());
        if text.is_empty() {
            return None;
        }
        Some(TripQuery {
            text,
            viewer: viewer.to_string(),
            theme: params.theme,
            status: params.status,
            country: params
                .country
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            min_budget: params.min_budget,
            max_budget: params.max_budget,
            starts_on_or_after: params.start_date,
            ends_on_or_before: params.end_date,
            sort: params.sort_by.unwrap_or_default(),
            limit: clamp_limit(params.limit, DEFAULT_TRIP_LIMIT, MAX_TRIP_LIMIT),
            offset: params.offset.unwrap_or(0),
        })
    }

    pub async fn search_trips(
        &self,
        params: &TripSearchParams,
        viewer: &str,
    ) -> Result<Page<Trip>, ApiError> {
        match Self::trip_query(params, viewer) {
            Some(query) => Ok(self.trips.search_trips(&query).await?),
            None => Ok(Page::empty()),
        }
    }

    pub async fn search_users(
        &self,
        params: &UserSearchParams,
    ) -> Result<Page<UserProfile>, ApiError> {
        let text = sanitize_query(params.q.as_deref().unwrap_or_default());
        if text.is_empty() {
            return Ok(Page::empty());
        }
        let query = UserQuery {
            text,
            limit: clamp_limit(params.limit, DEFAULT_USER_LIMIT, MAX_USER_LIMIT),
            offset: params.offset.unwrap_or(0),
        };

        let page = self.users.search_users(&query).await?;
        Ok(Page {
            items: page.items.iter().map(UserProfile::from).collect(),
            total: page.total,
        })
    }

    pub async fn popular_destinations(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<PopularDestination>, ApiError> {
        let limit = limit
            .unwrap_or(DEFAULT_DESTINATION_LIMIT)
            .clamp(1, MAX_DESTINATION_LIMIT);
        let trips = self.trips.public_trips().await?;
        Ok(popular_destinations(&trips, limit))
    }

    pub async fn suggestions(&self, q: Option<&str>) -> Result<Vec<Suggestion>, ApiError> {
        let text = sanitize_query(q.unwrap_or_default());
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let trips = self.trips.public_trips().await?;
        suggestions(&trips, &text)
    }
}

/// Groups every stop of `trips` by (city, country).
pub fn popular_destinations(trips: &[Trip], limit: usize) -> Vec<PopularDestination> {
    let mut groups: HashMap<(String, String), (HashSet<&str>, u64)> = HashMap::new();
    for trip in trips {
        for stop in &trip.itinerary.stops {
            let entry = groups
                .entry((stop.city.clone(), stop.country.clone()))
                .or_default();
            entry.0.insert(trip.id.as_str());
            entry.1 += 1;
        }
    }

    let mut destinations: Vec<PopularDestination> = groups
        .into_iter()
        .map(|((city, country), (trip_ids, occurrences))| PopularDestination {
            city,
            country,
            trip_count: trip_ids.len() as u64,
            occurrences,
        })
        .collect();
    destinations.sort_by(|a, b| {
        b.trip_count
            .cmp(&a.trip_count)
            .then(b.occurrences.cmp(&a.occurrences))
            .then_with(|| a.city.cmp(&b.city))
    });
    destinations.truncate(limit);
    destinations
}

/// Location matches first, then trip-name matches, each in source order.
pub fn suggestions(trips: &[Trip], text: &str) -> Result<Vec<Suggestion>, ApiError> {
    let pattern = RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()
        .map_err(|err| ApiError::Unexpected(err.to_string()))?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    'trips: for trip in trips {
        for stop in &trip.itinerary.stops {
            if seen.len() >= LOCATION_SUGGESTIONS {
                break 'trips;
            }
            if !(pattern.is_match(&stop.city) || pattern.is_match(&stop.country)) {
                continue;
            }
            if seen.insert((stop.city.as_str(), stop.country.as_str())) {
                out.push(Suggestion {
                    kind: SuggestionKind::Location,
                    text: format!("{}, {}", stop.city, stop.country),
                    trip_id: None,
                });
            }
        }
    }

    out.extend(
        trips
            .iter()
            .filter(|trip| pattern.is_match(&trip.name))
            .take(TRIP_SUGGESTIONS)
            .map(|trip| Suggestion {
                kind: SuggestionKind::Trip,
                text: trip.name.clone(),
                trip_id: Some(trip.id.clone()),
            }),
    );
    Ok(out)
}
