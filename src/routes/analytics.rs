use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::ApiResponse;
use crate::state::AppState;

pub async fn trip(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let analytics = state.analytics.for_trip(&path, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Trip analytics retrieved", analytics)))
}

pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let analytics = state.analytics.for_user(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("User analytics retrieved", analytics)))
}

pub async fn global(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let analytics = state.analytics.global().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Platform analytics retrieved",
        analytics,
    )))
}
