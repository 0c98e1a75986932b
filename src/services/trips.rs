use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use super::itinerary;
use super::permission::{authorize, AccessRole};
use crate::config::AnalyticsAccess;
use crate::db::{StoreError, TripStore, UserStore};
use crate::error::ApiError;
use crate::models::itinerary::{
    Activity, ActivityChange, ActivityToggle, ActivityUpdate, BudgetSummary, NewActivity, NewStop,
    Stop, StopChange, StopUpdate,
};
use crate::models::trip::{
    Collaborator, CollaboratorInvite, CollaboratorRole, NewTrip, Permission, Trip, TripCounter,
    TripStats, TripStatus, TripUpdate,
};

/// Trip lifecycle and every edit routed into a trip document.
///
/// Writes follow one shape: load, authorize, mutate in memory, then
/// `replace_trip` with the version that was read.
#[derive(Clone)]
pub struct TripService {
    trips: Arc<dyn TripStore>,
    users: Arc<dyn UserStore>,
    analytics: AnalyticsAccess,
}

impl TripService {
    pub fn new(
        trips: Arc<dyn TripStore>,
        users: Arc<dyn UserStore>,
        analytics: AnalyticsAccess,
    ) -> Self {
        Self {
            trips,
            users,
            analytics,
        }
    }

    /// Loads a trip and checks `capability` for `user_id`.
    pub async fn load(
        &self,
        trip_id: &str,
        user_id: &str,
        capability: Permission,
    ) -> Result<(Trip, AccessRole), ApiError> {
        let trip = self.trips.find_trip(trip_id).await?;
        authorize(trip, user_id, capability, self.analytics).into_result()
    }

    async fn save(&self, mut trip: Trip) -> Result<Trip, ApiError> {
        trip.refresh_derived();
        Ok(self.trips.replace_trip(&trip).await?)
    }

    /// Runs `edit` against a trip the user may edit and persists the result.
    async fn edit<T, F>(&self, trip_id: &str, user_id: &str, edit: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Trip) -> Result<T, ApiError>,
    {
        let (mut trip, _) = self.load(trip_id, user_id, Permission::Edit).await?;
        let out = edit(&mut trip)?;
        self.save(trip).await?;
        Ok(out)
    }

    pub async fn create(&self, owner: &str, input: NewTrip) -> Result<Trip, ApiError> {
        input.validate()?;
        if input.end_date <= input.start_date {
            return Err(ApiError::invalid("endDate", "endDate must be after startDate"));
        }

        let trip = Trip::new(owner, input);
        self.trips.insert_trip(&trip).await?;
        log::info!("Trip {} created by {}", trip.id, owner);

        if let Err(err) = self.bump_trip_count(owner).await {
            log::warn!("Failed to update trip count for user {}: {}", owner, err);
        }
        Ok(trip)
    }

    async fn bump_trip_count(&self, user_id: &str) -> Result<(), StoreError> {
        if let Some(mut user) = self.users.find_user(user_id).await? {
            user.stats.total_trips += 1;
            user.updated_at = Utc::now();
            self.users.replace_user(&user).await?;
        }
        Ok(())
    }

    /// Returns the trip and, for anyone but the owner, counts the view.
    pub async fn get(&self, trip_id: &str, user_id: &str) -> Result<(Trip, AccessRole), ApiError> {
        let (mut trip, role) = self.load(trip_id, user_id, Permission::View).await?;
        if role != AccessRole::Owner {
            self.trips
                .increment_counter(&trip.id, TripCounter::Views)
                .await?;
            trip.stats.views += 1;
        }
        Ok((trip, role))
    }

    pub async fn list_mine(
        &self,
        user_id: &str,
        status: Option<TripStatus>,
    ) -> Result<Vec<Trip>, ApiError> {
        let trips = self.trips.trips_for_member(user_id).await?;
        Ok(trips
            .into_iter()
            .filter(|trip| status.map_or(true, |s| trip.status == s))
            .collect())
    }

    pub async fn update(
        &self,
        trip_id: &str,
        user_id: &str,
        update: TripUpdate,
    ) -> Result<Trip, ApiError> {
        update.validate()?;
        let (mut trip, _) = self.load(trip_id, user_id, Permission::Edit).await?;
        if update.version.is_some_and(|v| v != trip.version) {
            return Err(StoreError::VersionConflict.into());
        }

        let start = update.start_date.unwrap_or(trip.start_date);
        let end = update.end_date.unwrap_or(trip.end_date);
        if end <= start {
            return Err(ApiError::invalid("endDate", "endDate must be after startDate"));
        }
        trip.start_date = start;
        trip.end_date = end;

        if let Some(name) = update.name {
            trip.name = name.trim().to_string();
        }
        if let Some(description) = update.description {
            trip.description = Some(description);
        }
        if let Some(travelers) = update.travelers {
            trip.travelers = travelers;
        }
        if let Some(theme) = update.theme {
            trip.theme = theme;
        }
        if let Some(style) = update.travel_style {
            trip.travel_style = style;
        }
        if let Some(status) = update.status {
            trip.status = status;
        }
        if let Some(is_public) = update.is_public {
            trip.is_public = is_public;
        }
        if let Some(budget) = update.budget {
            trip.budget = budget;
        }
        if let Some(cover) = update.cover_image {
            trip.cover_image = Some(cover);
        }
        if let Some(tags) = update.tags {
            trip.tags = tags;
        }

        trip.touch();
        self.save(trip).await
    }

    pub async fn delete(&self, trip_id: &str, user_id: &str) -> Result<(), ApiError> {
        let (trip, _) = self.load(trip_id, user_id, Permission::Delete).await?;
        if !self.trips.delete_trip(&trip.id).await? {
            return Err(ApiError::NotFound("Trip"));
        }
        log::info!("Trip {} deleted by {}", trip.id, user_id);
        Ok(())
    }

    pub async fn like(&self, trip_id: &str, user_id: &str) -> Result<TripStats, ApiError> {
        let (trip, _) = self.load(trip_id, user_id, Permission::View).await?;
        self.trips
            .increment_counter(&trip.id, TripCounter::Likes)
            .await?;
        let mut stats = trip.stats;
        stats.likes += 1;
        Ok(stats)
    }

    pub async fn invite(
        &self,
        trip_id: &str,
        user_id: &str,
        invite: CollaboratorInvite,
    ) -> Result<Trip, ApiError> {
        let (mut trip, role) = self.load(trip_id, user_id, Permission::Invite).await?;
        invite.validate()?;

        if invite.role == CollaboratorRole::Owner {
            return Err(ApiError::invalid("role", "role must be editor or viewer"));
        }

        let target = match (&invite.user_id, &invite.email) {
            (Some(id), _) => self.users.find_user(id).await?,
            (None, Some(email)) => {
                self.users
                    .find_user_by_email(&email.trim().to_lowercase())
                    .await?
            }
            (None, None) => {
                return Err(ApiError::invalid("userId", "userId or email is required"));
            }
        };
        let target = target.ok_or(ApiError::NotFound("User"))?;
        if target.id == trip.owner {
            return Err(ApiError::invalid("userId", "the owner is already on this trip"));
        }
        if target.id == user_id {
            return Err(ApiError::invalid("userId", "you cannot change your own access"));
        }

        let permissions = invite
            .permissions
            .unwrap_or_else(|| invite.role.default_permissions());
        // Collaborators can only hand out capabilities they hold themselves.
        if role != AccessRole::Owner {
            let held = trip
                .collaborator(user_id)
                .map(|c| c.permissions.as_slice())
                .unwrap_or_default();
            if let Some(missing) = permissions.iter().find(|p| !held.contains(p)) {
                return Err(ApiError::Forbidden {
                    capability: *missing,
                });
            }
        }
        match trip.collaborators.iter_mut().find(|c| c.user == target.id) {
            Some(existing) => {
                existing.role = invite.role;
                existing.permissions = permissions;
            }
            None => trip.collaborators.push(Collaborator {
                user: target.id.clone(),
                role: invite.role,
                permissions,
                added_at: Utc::now(),
            }),
        }

        trip.touch();
        let saved = self.save(trip).await?;
        log::info!("User {} invited to trip {} as {:?}", target.id, saved.id, invite.role);
        Ok(saved)
    }

    pub async fn remove_collaborator(
        &self,
        trip_id: &str,
        user_id: &str,
        collaborator_id: &str,
    ) -> Result<Trip, ApiError> {
        let (mut trip, _) = self.load(trip_id, user_id, Permission::Invite).await?;
        if collaborator_id == trip.owner {
            return Err(ApiError::invalid("userId", "the owner cannot be removed"));
        }
        let before = trip.collaborators.len();
        trip.collaborators.retain(|c| c.user != collaborator_id);
        if trip.collaborators.len() == before {
            return Err(ApiError::NotFound("Collaborator"));
        }

        trip.touch();
        self.save(trip).await
    }

    pub async fn add_stop(
        &self,
        trip_id: &str,
        user_id: &str,
        input: NewStop,
    ) -> Result<StopChange, ApiError> {
        self.edit(trip_id, user_id, |trip| itinerary::add_stop(trip, input))
            .await
    }

    pub async fn update_stop(
        &self,
        trip_id: &str,
        stop_id: &str,
        user_id: &str,
        update: StopUpdate,
    ) -> Result<StopChange, ApiError> {
        self.edit(trip_id, user_id, |trip| {
            itinerary::update_stop(trip, stop_id, update)
        })
        .await
    }

    pub async fn delete_stop(
        &self,
        trip_id: &str,
        stop_id: &str,
        user_id: &str,
    ) -> Result<Stop, ApiError> {
        self.edit(trip_id, user_id, |trip| itinerary::delete_stop(trip, stop_id))
            .await
    }

    pub async fn reorder_stops(
        &self,
        trip_id: &str,
        user_id: &str,
        stop_ids: &[String],
    ) -> Result<Vec<Stop>, ApiError> {
        self.edit(trip_id, user_id, |trip| {
            itinerary::reorder_stops(trip, stop_ids)
        })
        .await
    }

    pub async fn list_activities(
        &self,
        trip_id: &str,
        stop_id: &str,
        user_id: &str,
        day: Option<i64>,
    ) -> Result<Vec<Activity>, ApiError> {
        let (trip, _) = self.load(trip_id, user_id, Permission::View).await?;
        itinerary::list_activities(&trip, stop_id, day)
    }

    pub async fn add_activity(
        &self,
        trip_id: &str,
        stop_id: &str,
        user_id: &str,
        input: NewActivity,
    ) -> Result<ActivityChange, ApiError> {
        self.edit(trip_id, user_id, |trip| {
            itinerary::add_activity(trip, stop_id, input)
        })
        .await
    }

    pub async fn update_activity(
        &self,
        trip_id: &str,
        stop_id: &str,
        activity_id: &str,
        user_id: &str,
        update: ActivityUpdate,
    ) -> Result<ActivityChange, ApiError> {
        self.edit(trip_id, user_id, |trip| {
            itinerary::update_activity(trip, stop_id, activity_id, update)
        })
        .await
    }

    pub async fn delete_activity(
        &self,
        trip_id: &str,
        stop_id: &str,
        activity_id: &str,
        user_id: &str,
    ) -> Result<BudgetSummary, ApiError> {
        self.edit(trip_id, user_id, |trip| {
            itinerary::delete_activity(trip, stop_id, activity_id)
        })
        .await
    }

    pub async fn toggle_activity(
        &self,
        trip_id: &str,
        stop_id: &str,
        activity_id: &str,
        user_id: &str,
        toggle: ActivityToggle,
    ) -> Result<ActivityChange, ApiError> {
        self.edit(trip_id, user_id, |trip| {
            itinerary::toggle_activity(trip, stop_id, activity_id, toggle)
        })
        .await
    }
}
