use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{StoreError, TripStore, UserStore};
use crate::models::search::{Page, TripCountFilter, TripQuery, TripSort, UserQuery};
use crate::models::trip::{Trip, TripCounter};
use crate::models::user::User;

/// Process-local store with the same filtering and ordering rules as the
/// MongoDB store. Used by the test suite and `STORAGE=memory` runs.
#[derive(Default)]
pub struct MemoryStore {
    trips: RwLock<HashMap<String, Trip>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, StoreError> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

fn trip_matches(trip: &Trip, query: &TripQuery, text: &Regex, country: Option<&Regex>) -> bool {
    let stops = &trip.itinerary.stops;
    let text_hit = text.is_match(&trip.name)
        || trip.description.as_deref().is_some_and(|d| text.is_match(d))
        || stops.iter().any(|s| text.is_match(&s.city) || text.is_match(&s.country))
        || text.is_match(trip.theme.as_str());
    if !text_hit {
        return false;
    }

    if !(trip.is_public || trip.is_member(&query.viewer)) {
        return false;
    }

    if query.theme.is_some_and(|theme| trip.theme != theme) {
        return false;
    }
    if query.status.is_some_and(|status| trip.status != status) {
        return false;
    }
    if let Some(country) = country {
        if !stops.iter().any(|s| country.is_match(&s.country)) {
            return false;
        }
    }
    if query.min_budget.is_some_and(|min| trip.budget.total < min) {
        return false;
    }
    if query.max_budget.is_some_and(|max| trip.budget.total > max) {
        return false;
    }
    if query.starts_on_or_after.is_some_and(|start| trip.start_date < start) {
        return false;
    }
    if query.ends_on_or_before.is_some_and(|end| trip.end_date > end) {
        return false;
    }
    true
}

fn compare_trips(a: &Trip, b: &Trip, sort: TripSort) -> Ordering {
    match sort {
        TripSort::Relevance => b.created_at.cmp(&a.created_at),
        TripSort::Date => a.start_date.cmp(&b.start_date),
        TripSort::Budget => b.budget.total.total_cmp(&a.budget.total),
        TripSort::Popularity => b
            .stats
            .views
            .cmp(&a.stats.views)
            .then(b.stats.likes.cmp(&a.stats.likes)),
        TripSort::Name => a.name.cmp(&b.name),
    }
}

fn paginate<T>(mut items: Vec<T>, offset: u64, limit: u64) -> Page<T> {
    let total = items.len() as u64;
    let start = (offset as usize).min(items.len());
    let end = start.saturating_add(limit as usize).min(items.len());
    let items = items.drain(start..end).collect();
    Page { items, total }
}

#[async_trait]
impl TripStore for MemoryStore {
    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        let mut trips = self.trips.write().await;
        if trips.contains_key(&trip.id) {
            return Err(StoreError::Duplicate("Trip"));
        }
        trips.insert(trip.id.clone(), trip.clone());
        Ok(())
    }

    async fn find_trip(&self, id: &str) -> Result<Option<Trip>, StoreError> {
        Ok(self.trips.read().await.get(id).cloned())
    }

    async fn replace_trip(&self, trip: &Trip) -> Result<Trip, StoreError> {
        let mut trips = self.trips.write().await;
        match trips.get(&trip.id) {
            Some(stored) if stored.version == trip.version => {
                let mut next = trip.clone();
                next.version = trip.version + 1;
                next.stats = stored.stats;
                trips.insert(next.id.clone(), next.clone());
                Ok(next)
            }
            _ => Err(StoreError::VersionConflict),
        }
    }

    async fn delete_trip(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.trips.write().await.remove(id).is_some())
    }

    async fn increment_counter(&self, id: &str, counter: TripCounter) -> Result<(), StoreError> {
        if let Some(trip) = self.trips.write().await.get_mut(id) {
            let stats = &mut trip.stats;
            match counter {
                TripCounter::Views => stats.views += 1,
                TripCounter::Likes => stats.likes += 1,
                TripCounter::Shares => stats.shares += 1,
            }
        }
        Ok(())
    }

    async fn search_trips(&self, query: &TripQuery) -> Result<Page<Trip>, StoreError> {
        let text = case_insensitive(&query.pattern())?;
        let country = match &query.country {
            Some(c) => Some(case_insensitive(&format!("^{}$", regex::escape(c)))?),
            None => None,
        };

        let mut hits: Vec<Trip> = self
            .trips
            .read()
            .await
            .values()
            .filter(|trip| trip_matches(trip, query, &text, country.as_ref()))
            .cloned()
            .collect();
        hits.sort_by(|a, b| compare_trips(a, b, query.sort));

        Ok(paginate(hits, query.offset, query.limit))
    }

    async fn trips_for_member(&self, user_id: &str) -> Result<Vec<Trip>, StoreError> {
        let mut trips: Vec<Trip> = self
            .trips
            .read()
            .await
            .values()
            .filter(|trip| trip.is_member(user_id))
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    async fn public_trips(&self) -> Result<Vec<Trip>, StoreError> {
        let mut trips: Vec<Trip> = self
            .trips
            .read()
            .await
            .values()
            .filter(|trip| trip.is_public)
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    async fn count_trips(&self, filter: &TripCountFilter) -> Result<u64, StoreError> {
        let count = self
            .trips
            .read()
            .await
            .values()
            .filter(|trip| !filter.public_only || trip.is_public)
            .filter(|trip| filter.status.map_or(true, |status| trip.status == status))
            .filter(|trip| filter.created_after.map_or(true, |after| trip.created_at >= after))
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("User"));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn replace_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            users.insert(user.id.clone(), user.clone());
        }
        Ok(())
    }

    async fn search_users(&self, query: &UserQuery) -> Result<Page<User>, StoreError> {
        let text = case_insensitive(&query.pattern())?;
        let mut hits: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_active)
            .filter(|u| {
                text.is_match(&u.first_name) || text.is_match(&u.last_name) || text.is_match(&u.email)
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| {
            a.first_name
                .cmp(&b.first_name)
                .then_with(|| a.last_name.cmp(&b.last_name))
        });
        Ok(paginate(hits, query.offset, query.limit))
    }

    async fn count_users(&self, created_after: Option<DateTime<Utc>>) -> Result<u64, StoreError> {
        let count = self
            .users
            .read()
            .await
            .values()
            .filter(|u| created_after.map_or(true, |after| u.created_at >= after))
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::{NewTrip, TripStatus, TripTheme};
    use chrono::{Duration, TimeZone};

    fn trip(owner: &str, name: &str, public: bool) -> Trip {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).unwrap();
        Trip::new(
            owner,
            NewTrip {
                name: name.to_string(),
                description: None,
                start_date: start,
                end_date: end,
                travelers: None,
                theme: None,
                travel_style: None,
                is_public: Some(public),
                budget: None,
                cover_image: None,
                tags: None,
            },
        )
    }

    fn query(text: &str, viewer: &str) -> TripQuery {
        TripQuery {
            text: text.to_string(),
            viewer: viewer.to_string(),
            theme: None,
            status: None,
            country: None,
            min_budget: None,
            max_budget: None,
            starts_on_or_after: None,
            ends_on_or_before: None,
            sort: TripSort::Name,
            limit: 20,
            offset: 0,
        }
    }

    #[actix_rt::test]
    async fn test_replace_requires_current_version() {
        let store = MemoryStore::new();
        let original = trip("owner", "Alps", false);
        store.insert_trip(&original).await.unwrap();

        let mut first = original.clone();
        first.name = "Alps in winter".to_string();
        let saved = store.replace_trip(&first).await.unwrap();
        assert_eq!(saved.version, 1);

        let mut stale = original.clone();
        stale.name = "Alps in summer".to_string();
        let err = store.replace_trip(&stale).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict));

        let stored = store.find_trip(&original.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Alps in winter");
    }

    #[actix_rt::test]
    async fn test_search_respects_access() {
        let store = MemoryStore::new();
        store.insert_trip(&trip("alice", "Paris public", true)).await.unwrap();
        store.insert_trip(&trip("alice", "Paris private", false)).await.unwrap();
        store.insert_trip(&trip("bob", "Paris for bob", false)).await.unwrap();

        let page = store.search_trips(&query("paris", "alice")).await.unwrap();
        let names: Vec<_> = page.items.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Paris private", "Paris public"]);
        assert_eq!(page.total, 2);

        let page = store.search_trips(&query("PARIS", "carol")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Paris public");
    }

    #[actix_rt::test]
    async fn test_search_paginates() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert_trip(&trip("alice", &format!("Trip {}", i), true))
                .await
                .unwrap();
        }
        let mut q = query("trip", "alice");
        q.limit = 2;
        q.offset = 4;
        let page = store.search_trips(&q).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Trip 4");
    }

    fn names(page: &Page<Trip>) -> Vec<&str> {
        page.items.iter().map(|t| t.name.as_str()).collect()
    }

    async fn seeded(trips: Vec<Trip>) -> MemoryStore {
        let store = MemoryStore::new();
        for t in &trips {
            store.insert_trip(t).await.unwrap();
        }
        store
    }

    #[actix_rt::test]
    async fn test_theme_and_status_filters() {
        let mut romantic = trip("alice", "Trip romantic", true);
        romantic.theme = TripTheme::Romantic;
        let mut done = trip("alice", "Trip done", true);
        done.status = TripStatus::Completed;
        let store = seeded(vec![romantic, done, trip("alice", "Trip plain", true)]).await;

        let mut q = query("trip", "alice");
        q.theme = Some(TripTheme::Romantic);
        assert_eq!(names(&store.search_trips(&q).await.unwrap()), vec!["Trip romantic"]);

        let mut q = query("trip", "alice");
        q.status = Some(TripStatus::Completed);
        assert_eq!(names(&store.search_trips(&q).await.unwrap()), vec!["Trip done"]);
    }

    #[actix_rt::test]
    async fn test_budget_bounds_are_inclusive() {
        let mut trips = Vec::new();
        let budgets = [
            ("Trip 100", 100.0),
            ("Trip 250", 250.0),
            ("Trip 500", 500.0),
            ("Trip 900", 900.0),
        ];
        for (name, total) in budgets {
            let mut t = trip("alice", name, true);
            t.budget.total = total;
            trips.push(t);
        }
        let store = seeded(trips).await;

        let mut q = query("trip", "alice");
        q.min_budget = Some(250.0);
        q.max_budget = Some(500.0);
        let page = store.search_trips(&q).await.unwrap();
        assert_eq!(names(&page), vec!["Trip 250", "Trip 500"]);
        assert_eq!(page.total, 2);

        q.min_budget = Some(900.0);
        q.max_budget = None;
        assert_eq!(names(&store.search_trips(&q).await.unwrap()), vec!["Trip 900"]);
    }

    #[actix_rt::test]
    async fn test_date_bounds_are_inclusive() {
        let june = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut early = trip("alice", "Trip early", true);
        early.start_date = june - Duration::days(10);
        early.end_date = june - Duration::days(5);
        let mut exact = trip("alice", "Trip exact", true);
        exact.start_date = june;
        exact.end_date = june + Duration::days(4);
        let mut late = trip("alice", "Trip late", true);
        late.start_date = june + Duration::milliseconds(500);
        late.end_date = june + Duration::days(20);
        let store = seeded(vec![early, exact, late]).await;

        let mut q = query("trip", "alice");
        q.starts_on_or_after = Some(june);
        assert_eq!(
            names(&store.search_trips(&q).await.unwrap()),
            vec!["Trip exact", "Trip late"]
        );

        q.ends_on_or_before = Some(june + Duration::days(4));
        assert_eq!(names(&store.search_trips(&q).await.unwrap()), vec!["Trip exact"]);
    }

    #[actix_rt::test]
    async fn test_sort_orders() {
        let june = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut a = trip("alice", "Trip a", true);
        a.start_date = june + Duration::days(2);
        a.budget.total = 300.0;
        a.stats.views = 10;
        a.stats.likes = 1;
        let mut b = trip("alice", "Trip b", true);
        b.start_date = june;
        b.budget.total = 900.0;
        b.stats.views = 10;
        b.stats.likes = 5;
        let mut c = trip("alice", "Trip c", true);
        c.start_date = june + Duration::days(1);
        c.budget.total = 50.0;
        c.stats.views = 40;
        let store = seeded(vec![a, b, c]).await;

        let mut q = query("trip", "alice");
        q.sort = TripSort::Date;
        assert_eq!(
            names(&store.search_trips(&q).await.unwrap()),
            vec!["Trip b", "Trip c", "Trip a"]
        );

        q.sort = TripSort::Budget;
        assert_eq!(
            names(&store.search_trips(&q).await.unwrap()),
            vec!["Trip b", "Trip a", "Trip c"]
        );

        q.sort = TripSort::Popularity;
        assert_eq!(
            names(&store.search_trips(&q).await.unwrap()),
            vec!["Trip c", "Trip b", "Trip a"]
        );
    }

    #[actix_rt::test]
    async fn test_replace_keeps_stored_counters() {
        let store = MemoryStore::new();
        let t = trip("alice", "Oslo", true);
        store.insert_trip(&t).await.unwrap();

        let mut edited = store.find_trip(&t.id).await.unwrap().unwrap();
        store.increment_counter(&t.id, TripCounter::Likes).await.unwrap();
        store.increment_counter(&t.id, TripCounter::Views).await.unwrap();

        edited.name = "Oslo in spring".to_string();
        let saved = store.replace_trip(&edited).await.unwrap();
        assert_eq!(saved.version, 1);
        assert_eq!(saved.stats.likes, 1);

        let stored = store.find_trip(&t.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Oslo in spring");
        assert_eq!(stored.stats.likes, 1);
        assert_eq!(stored.stats.views, 1);
    }

    #[actix_rt::test]
    async fn test_counters_increment() {
        let store = MemoryStore::new();
        let t = trip("alice", "Rome", true);
        store.insert_trip(&t).await.unwrap();
        store.increment_counter(&t.id, TripCounter::Likes).await.unwrap();
        store.increment_counter(&t.id, TripCounter::Likes).await.unwrap();

        let stored = store.find_trip(&t.id).await.unwrap().unwrap();
        assert_eq!(stored.stats.likes, 2);
        assert_eq!(stored.version, t.version);
    }
}
