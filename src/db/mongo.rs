use async_trait::async_trait;
use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    error::{Error, ErrorKind, WriteError, WriteFailure},
    options::{ClientOptions, IndexOptions, ReturnDocument, ServerApi, ServerApiVersion},
    Client, Collection, Database, IndexModel,
};
use std::time::Duration;

use super::{StoreError, TripStore, UserStore};
use crate::models::search::{Page, TripCountFilter, TripQuery, TripSort, UserQuery};
use crate::models::trip::{Trip, TripCounter};
use crate::models::timestamp;
use crate::models::user::User;

const DUPLICATE_KEY: i32 = 11000;
// The server takes skip as a signed 64-bit value.
const MAX_SKIP: u64 = i64::MAX as u64;

pub async fn create_mongo_client(uri: &str) -> Result<Client, Error> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match client.database("admin").run_command(doc! {"ping": 1}).await {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping failed: {}", e);
            log::warn!("The API may still work, but some functionality might be impaired");
        }
    }

    Ok(client)
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = create_mongo_client(uri).await?;
        let store = Self {
            db: client.database(database),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(unique_email).await?;

        let members = IndexModel::builder()
            .keys(doc! { "owner": 1, "collaborators.user": 1 })
            .build();
        self.trips().create_index(members).await?;
        Ok(())
    }

    fn trips(&self) -> Collection<Trip> {
        self.db.collection(Trip::COLLECTION)
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(User::COLLECTION)
    }
}

fn is_duplicate_key(err: &Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY,
            ..
        }))
    )
}

/// Range bounds must use the same fixed-width string form the models persist.
fn date_bson(date: &DateTime<Utc>) -> Bson {
    Bson::String(timestamp::format(date))
}

fn case_insensitive(pattern: String) -> Document {
    doc! { "$regex": pattern, "$options": "i" }
}

/// Translates a trip search into a filter document.
pub fn trip_filter(query: &TripQuery) -> Document {
    let text = case_insensitive(query.pattern());
    let mut clauses = vec![
        doc! {
            "$or": [
                { "name": text.clone() },
                { "description": text.clone() },
                { "itinerary.stops.city": text.clone() },
                { "itinerary.stops.country": text.clone() },
                { "theme": text },
            ]
        },
        doc! {
            "$or": [
                { "isPublic": true },
                { "owner": query.viewer.as_str() },
                { "collaborators.user": query.viewer.as_str() },
            ]
        },
    ];

    if let Some(theme) = query.theme {
        clauses.push(doc! { "theme": theme.as_str() });
    }
    if let Some(status) = query.status {
        clauses.push(doc! { "status": status.as_str() });
    }
    if let Some(country) = &query.country {
        clauses.push(doc! {
            "itinerary.stops.country":
                case_insensitive(format!("^{}$", regex::escape(country)))
        });
    }

    let mut budget = Document::new();
    if let Some(min) = query.min_budget {
        budget.insert("$gte", min);
    }
    if let Some(max) = query.max_budget {
        budget.insert("$lte", max);
    }
    if !budget.is_empty() {
        clauses.push(doc! { "budget.total": budget });
    }

    if let Some(start) = &query.starts_on_or_after {
        clauses.push(doc! { "startDate": { "$gte": date_bson(start) } });
    }
    if let Some(end) = &query.ends_on_or_before {
        clauses.push(doc! { "endDate": { "$lte": date_bson(end) } });
    }

    doc! { "$and": clauses }
}

pub fn trip_sort(sort: TripSort) -> Document {
    match sort {
        TripSort::Relevance => doc! { "createdAt": -1 },
        TripSort::Date => doc! { "startDate": 1 },
        TripSort::Budget => doc! { "budget.total": -1 },
        TripSort::Popularity => doc! { "stats.views": -1, "stats.likes": -1 },
        TripSort::Name => doc! { "name": 1 },
    }
}

fn count_filter(filter: &TripCountFilter) -> Document {
    let mut out = Document::new();
    if filter.public_only {
        out.insert("isPublic", true);
    }
    if let Some(status) = filter.status {
        out.insert("status", status.as_str());
    }
    if let Some(after) = &filter.created_after {
        out.insert("createdAt", doc! { "$gte": date_bson(after) });
    }
    out
}

/// Every trip field except the id and the engagement counters, with the
/// version bumped. Counters are only ever moved by `$inc`.
fn replacement_fields(trip: &Trip) -> Result<Document, StoreError> {
    let mut next = trip.clone();
    next.version = trip.version + 1;
    let mut fields = bson::to_document(&next)?;
    fields.remove("_id");
    fields.remove("stats");
    Ok(fields)
}

fn member_filter(user_id: &str) -> Document {
    doc! {
        "$or": [
            { "owner": user_id },
            { "collaborators.user": user_id },
        ]
    }
}

pub fn user_filter(query: &UserQuery) -> Document {
    let text = case_insensitive(query.pattern());
    doc! {
        "isActive": true,
        "$or": [
            { "firstName": text.clone() },
            { "lastName": text.clone() },
            { "email": text },
        ]
    }
}

#[async_trait]
impl TripStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn insert_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        self.trips().insert_one(trip).await?;
        Ok(())
    }

    async fn find_trip(&self, id: &str) -> Result<Option<Trip>, StoreError> {
        Ok(self.trips().find_one(doc! { "_id": id }).await?)
    }

    async fn replace_trip(&self, trip: &Trip) -> Result<Trip, StoreError> {
        let stored = self
            .trips()
            .find_one_and_update(
                doc! { "_id": trip.id.as_str(), "version": trip.version },
                doc! { "$set": replacement_fields(trip)? },
            )
            .return_document(ReturnDocument::After)
            .await?;

        match stored {
            Some(stored) => Ok(stored),
            None => {
                log::warn!(
                    "Trip {} was not written, stored version is no longer {}",
                    trip.id,
                    trip.version
                );
                Err(StoreError::VersionConflict)
            }
        }
    }

    async fn delete_trip(&self, id: &str) -> Result<bool, StoreError> {
        let result = self.trips().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn increment_counter(&self, id: &str, counter: TripCounter) -> Result<(), StoreError> {
        self.trips()
            .update_one(doc! { "_id": id }, doc! { "$inc": { (counter.field()): 1 } })
            .await?;
        Ok(())
    }

    async fn search_trips(&self, query: &TripQuery) -> Result<Page<Trip>, StoreError> {
        let filter = trip_filter(query);
        let total = self.trips().count_documents(filter.clone()).await?;
        let items = self
            .trips()
            .find(filter)
            .sort(trip_sort(query.sort))
            .skip(query.offset.min(MAX_SKIP))
            .limit(query.limit as i64)
            .await?
            .try_collect()
            .await?;
        Ok(Page { items, total })
    }

    async fn trips_for_member(&self, user_id: &str) -> Result<Vec<Trip>, StoreError> {
        Ok(self
            .trips()
            .find(member_filter(user_id))
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?)
    }

    async fn public_trips(&self) -> Result<Vec<Trip>, StoreError> {
        Ok(self
            .trips()
            .find(doc! { "isPublic": true })
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?)
    }

    async fn count_trips(&self, filter: &TripCountFilter) -> Result<u64, StoreError> {
        Ok(self.trips().count_documents(count_filter(filter)).await?)
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        match self.users().insert_one(user).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::Duplicate("User")),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "_id": id }).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn replace_user(&self, user: &User) -> Result<(), StoreError> {
        self.users()
            .replace_one(doc! { "_id": user.id.as_str() }, user)
            .await?;
        Ok(())
    }

    async fn search_users(&self, query: &UserQuery) -> Result<Page<User>, StoreError> {
        let filter = user_filter(query);
        let total = self.users().count_documents(filter.clone()).await?;
        let items = self
            .users()
            .find(filter)
            .sort(doc! { "firstName": 1, "lastName": 1 })
            .skip(query.offset.min(MAX_SKIP))
            .limit(query.limit as i64)
            .await?
            .try_collect()
            .await?;
        Ok(Page { items, total })
    }

    async fn count_users(&self, created_after: Option<DateTime<Utc>>) -> Result<u64, StoreError> {
        let filter = match created_after {
            Some(after) => doc! { "createdAt": { "$gte": date_bson(&after) } },
            None => doc! {},
        };
        Ok(self.users().count_documents(filter).await?)
    }
}
