use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::itinerary::{ActivityToggle, ActivityUpdate, NewActivity};
use crate::models::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DayFilter {
    pub day: Option<i64>,
}

pub async fn list(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    params: web::Query<DayFilter>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, stop_id) = path.into_inner();
    let activities = state
        .trips
        .list_activities(&trip_id, &stop_id, &user.user_id, params.day)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Activities retrieved", activities)))
}

pub async fn add(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    input: web::Json<NewActivity>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, stop_id) = path.into_inner();
    let change = state
        .trips
        .add_activity(&trip_id, &stop_id, &user.user_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Activity added", change)))
}

pub async fn update(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String, String)>,
    input: web::Json<ActivityUpdate>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, stop_id, activity_id) = path.into_inner();
    let change = state
        .trips
        .update_activity(
            &trip_id,
            &stop_id,
            &activity_id,
            &user.user_id,
            input.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Activity updated", change)))
}

pub async fn delete(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, stop_id, activity_id) = path.into_inner();
    let budget = state
        .trips
        .delete_activity(&trip_id, &stop_id, &activity_id, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Activity deleted", budget)))
}

/// The body is optional; an empty request just flips completion.
pub async fn toggle(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String, String)>,
    input: Option<web::Json<ActivityToggle>>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, stop_id, activity_id) = path.into_inner();
    let toggle = input.map(web::Json::into_inner).unwrap_or_default();
    let change = state
        .trips
        .toggle_activity(&trip_id, &stop_id, &activity_id, &user.user_id, toggle)
        .await?;
    let message = if change.activity.completed {
        "Activity marked as completed"
    } else {
        "Activity marked as not completed"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(message, change)))
}
