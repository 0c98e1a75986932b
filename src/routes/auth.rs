use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{SigninRequest, SignupRequest};
use crate::models::ApiResponse;
use crate::state::AppState;

pub async fn signup(
    state: web::Data<AppState>,
    input: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let auth = state.accounts.signup(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Account created", auth)))
}

pub async fn signin(
    state: web::Data<AppState>,
    input: web::Json<SigninRequest>,
) -> Result<HttpResponse, ApiError> {
    let auth = state.accounts.signin(input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Signed in", auth)))
}

pub async fn session(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state.accounts.profile(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Session is valid", profile)))
}
