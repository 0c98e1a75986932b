use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::search::{
    PagedResponse, TextParams, TripSearchParams, UserSearchParams, DEFAULT_TRIP_LIMIT,
    DEFAULT_USER_LIMIT, MAX_TRIP_LIMIT, MAX_USER_LIMIT,
};
use crate::models::ApiResponse;
use crate::services::search::clamp_limit;
use crate::state::AppState;

pub async fn trips(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    params: web::Query<TripSearchParams>,
) -> Result<HttpResponse, ApiError> {
    let page = state.search.search_trips(&params, &user.user_id).await?;
    let limit = clamp_limit(params.limit, DEFAULT_TRIP_LIMIT, MAX_TRIP_LIMIT);
    let offset = params.offset.unwrap_or(0);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Search completed",
        PagedResponse::new(page, limit, offset),
    )))
}

pub async fn users(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    params: web::Query<UserSearchParams>,
) -> Result<HttpResponse, ApiError> {
    let page = state.search.search_users(&params).await?;
    let limit = clamp_limit(params.limit, DEFAULT_USER_LIMIT, MAX_USER_LIMIT);
    let offset = params.offset.unwrap_or(0);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Search completed",
        PagedResponse::new(page, limit, offset),
    )))
}

pub async fn popular_destinations(
    state: web::Data<AppState>,
    params: web::Query<TextParams>,
) -> Result<HttpResponse, ApiError> {
    let destinations = state.search.popular_destinations(params.limit).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Popular destinations retrieved",
        destinations,
    )))
}

pub async fn suggestions(
    state: web::Data<AppState>,
    params: web::Query<TextParams>,
) -> Result<HttpResponse, ApiError> {
    let suggestions = state.search.suggestions(params.q.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Suggestions retrieved", suggestions)))
}
