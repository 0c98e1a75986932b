use serde::Serialize;

use crate::config::AnalyticsAccess;
use crate::error::ApiError;
use crate::models::trip::{CollaboratorRole, Permission, Trip};

/// How the requester relates to the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRole {
    Owner,
    Editor,
    Viewer,
    Public,
    None,
}

impl From<CollaboratorRole> for AccessRole {
    fn from(role: CollaboratorRole) -> Self {
        match role {
            CollaboratorRole::Owner => AccessRole::Owner,
            CollaboratorRole::Editor => AccessRole::Editor,
            CollaboratorRole::Viewer => AccessRole::Viewer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub allowed: bool,
    pub role: AccessRole,
    pub reason: &'static str,
}

impl Resolution {
    fn granted(role: AccessRole, reason: &'static str) -> Self {
        Self {
            allowed: true,
            role,
            reason,
        }
    }

    fn denied(role: AccessRole, reason: &'static str) -> Self {
        Self {
            allowed: false,
            role,
            reason,
        }
    }
}

/// Decides whether `user_id` may exercise `capability` on `trip`.
pub fn resolve(
    trip: &Trip,
    user_id: &str,
    capability: Permission,
    analytics: AnalyticsAccess,
) -> Resolution {
    if trip.owner == user_id {
        return Resolution::granted(AccessRole::Owner, "owner");
    }

    let capability = match (capability, analytics) {
        (Permission::Analytics, AnalyticsAccess::View) => Permission::View,
        (other, _) => other,
    };

    if let Some(collaborator) = trip.collaborator(user_id) {
        let role = AccessRole::from(collaborator.role);
        if collaborator.permissions.contains(&capability) {
            return Resolution::granted(role, "collaborator permission");
        }
        if capability == Permission::View && trip.is_public {
            return Resolution::granted(role, "public trip");
        }
        return Resolution::denied(role, "collaborator lacks permission");
    }

    if capability == Permission::View && trip.is_public {
        return Resolution::granted(AccessRole::Public, "public trip");
    }

    Resolution::denied(AccessRole::None, "not a collaborator")
}

/// Outcome of gating a (possibly missing) trip.
#[derive(Debug)]
pub enum TripAccess {
    NotFound,
    Forbidden { required_capability: Permission },
    Ok(Trip, AccessRole),
}

impl TripAccess {
    pub fn into_result(self) -> Result<(Trip, AccessRole), ApiError> {
        match self {
            TripAccess::NotFound => Err(ApiError::NotFound("Trip")),
            TripAccess::Forbidden {
                required_capability,
            } => Err(ApiError::Forbidden {
                capability: required_capability,
            }),
            TripAccess::Ok(trip, role) => Ok((trip, role)),
        }
    }
}

pub fn authorize(
    trip: Option<Trip>,
    user_id: &str,
    capability: Permission,
    analytics: AnalyticsAccess,
) -> TripAccess {
    let Some(trip) = trip else {
        return TripAccess::NotFound;
    };
    let resolution = resolve(&trip, user_id, capability, analytics);
    if resolution.allowed {
        TripAccess::Ok(trip, resolution.role)
    } else {
        log::debug!(
            "Denied '{}' on trip {} for user {}: {}",
            capability,
            trip.id,
            user_id,
            resolution.reason
        );
        TripAccess::Forbidden {
            required_capability: capability,
        }
    }
}
