pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::search::{Page, TripCountFilter, TripQuery, UserQuery};
use crate::models::trip::{Trip, TripCounter};
use crate::models::user::User;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("invalid query pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("{0} already exists")]
    Duplicate(&'static str),
    #[error("document version changed since it was read")]
    VersionConflict,
}

/// Persistence for trip documents. Stops, activities and accommodation live
/// inside the trip and are only ever written through it.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Reachability check behind the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError>;

    async fn find_trip(&self, id: &str) -> Result<Option<Trip>, StoreError>;

    /// Writes `trip` over the stored document if its version still equals
    /// `trip.version`, storing it with the version bumped by one. The stored
    /// engagement counters are kept; only `increment_counter` moves them.
    async fn replace_trip(&self, trip: &Trip) -> Result<Trip, StoreError>;

    async fn delete_trip(&self, id: &str) -> Result<bool, StoreError>;

    async fn increment_counter(&self, id: &str, counter: TripCounter) -> Result<(), StoreError>;

    async fn search_trips(&self, query: &TripQuery) -> Result<Page<Trip>, StoreError>;

    /// Trips the user owns or collaborates on, newest first.
    async fn trips_for_member(&self, user_id: &str) -> Result<Vec<Trip>, StoreError>;

    async fn public_trips(&self) -> Result<Vec<Trip>, StoreError>;

    async fn count_trips(&self, filter: &TripCountFilter) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn replace_user(&self, user: &User) -> Result<(), StoreError>;

    /// Active users whose name or email matches the query.
    async fn search_users(&self, query: &UserQuery) -> Result<Page<User>, StoreError>;

    async fn count_users(&self, created_after: Option<DateTime<Utc>>) -> Result<u64, StoreError>;
}
