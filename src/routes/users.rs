use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::ProfileUpdate;
use crate::models::ApiResponse;
use crate::state::AppState;

pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state.accounts.profile(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Profile retrieved", profile)))
}

pub async fn update_me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .accounts
        .update_profile(&user.user_id, input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Profile updated", profile)))
}
