use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::trip::{CollaboratorInvite, NewTrip, Trip, TripStatus, TripUpdate};
use crate::models::ApiResponse;
use crate::services::permission::AccessRole;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<TripStatus>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TripDetail {
    #[serde(flatten)]
    trip: Trip,
    access_role: AccessRole,
}

pub async fn create(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<NewTrip>,
) -> Result<HttpResponse, ApiError> {
    let trip = state.trips.create(&user.user_id, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Trip created", trip)))
}

pub async fn list_mine(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, ApiError> {
    let trips = state.trips.list_mine(&user.user_id, params.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Trips retrieved", trips)))
}

pub async fn get_by_id(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let (trip, access_role) = state.trips.get(&path, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Trip retrieved",
        TripDetail { trip, access_role },
    )))
}

pub async fn update(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    input: web::Json<TripUpdate>,
) -> Result<HttpResponse, ApiError> {
    let trip = state
        .trips
        .update(&path, &user.user_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Trip updated", trip)))
}

pub async fn delete(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state.trips.delete(&path, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Trip deleted")))
}

pub async fn like(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let stats = state.trips.like(&path, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Trip liked", stats)))
}

pub async fn invite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    input: web::Json<CollaboratorInvite>,
) -> Result<HttpResponse, ApiError> {
    let trip = state
        .trips
        .invite(&path, &user.user_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Collaborator added",
        trip.collaborators,
    )))
}

pub async fn remove_collaborator(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, collaborator_id) = path.into_inner();
    let trip = state
        .trips
        .remove_collaborator(&trip_id, &user.user_id, &collaborator_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Collaborator removed",
        trip.collaborators,
    )))
}
