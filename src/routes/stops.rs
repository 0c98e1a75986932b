use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::itinerary::{NewStop, ReorderStops, StopUpdate};
use crate::models::ApiResponse;
use crate::state::AppState;

pub async fn add(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    input: web::Json<NewStop>,
) -> Result<HttpResponse, ApiError> {
    let change = state
        .trips
        .add_stop(&path, &user.user_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Stop added", change)))
}

pub async fn update(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    input: web::Json<StopUpdate>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, stop_id) = path.into_inner();
    let change = state
        .trips
        .update_stop(&trip_id, &stop_id, &user.user_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Stop updated", change)))
}

pub async fn delete(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (trip_id, stop_id) = path.into_inner();
    state
        .trips
        .delete_stop(&trip_id, &stop_id, &user.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Stop deleted")))
}

pub async fn reorder(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    input: web::Json<ReorderStops>,
) -> Result<HttpResponse, ApiError> {
    let stops = state
        .trips
        .reorder_stops(&path, &user.user_id, &input.stop_ids)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Stops reordered", stops)))
}
