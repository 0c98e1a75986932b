pub mod activities;
pub mod analytics;
pub mod auth;
pub mod health;
pub mod search;
pub mod stops;
pub mod trips;
pub mod users;

use actix_web::{error, web, HttpRequest};

use crate::error::ApiError;
use crate::middleware::auth::AuthMiddleware;
use crate::middleware::role_auth::RequireRole;
use crate::models::user::UserRole;

fn bad_json(err: error::JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    ApiError::invalid("body", err.to_string()).into()
}

fn bad_query(err: error::QueryPayloadError, _: &HttpRequest) -> actix_web::Error {
    ApiError::invalid("query", err.to_string()).into()
}

fn bad_path(err: error::PathError, _: &HttpRequest) -> actix_web::Error {
    ApiError::invalid("path", err.to_string()).into()
}

/// Registers the full route table. Expects `web::Data<AppState>` on the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(bad_json))
        .app_data(web::QueryConfig::default().error_handler(bad_query))
        .app_data(web::PathConfig::default().error_handler(bad_path))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/signup", web::post().to(auth::signup))
                        .route("/signin", web::post().to(auth::signin))
                        .service(
                            web::scope("")
                                .wrap(AuthMiddleware)
                                .route("/session", web::get().to(auth::session)),
                        ),
                )
                .service(
                    web::scope("/search")
                        .route(
                            "/destinations/popular",
                            web::get().to(search::popular_destinations),
                        )
                        .route("/suggestions", web::get().to(search::suggestions))
                        .service(
                            web::scope("")
                                .wrap(AuthMiddleware)
                                .route("/trips", web::get().to(search::trips))
                                .route("/users", web::get().to(search::users)),
                        ),
                )
                .service(
                    web::scope("/users")
                        .wrap(AuthMiddleware)
                        .route("/me", web::get().to(users::me))
                        .route("/me", web::put().to(users::update_me)),
                )
                .service(
                    web::scope("/trips")
                        .wrap(AuthMiddleware)
                        .route("", web::post().to(trips::create))
                        .route("", web::get().to(trips::list_mine))
                        .route("/{trip_id}", web::get().to(trips::get_by_id))
                        .route("/{trip_id}", web::put().to(trips::update))
                        .route("/{trip_id}", web::delete().to(trips::delete))
                        .route("/{trip_id}/like", web::post().to(trips::like))
                        .route("/{trip_id}/collaborators", web::post().to(trips::invite))
                        .route(
                            "/{trip_id}/collaborators/{user_id}",
                            web::delete().to(trips::remove_collaborator),
                        )
                        .route("/{trip_id}/stops", web::post().to(stops::add))
                        .route("/{trip_id}/stops/reorder", web::put().to(stops::reorder))
                        .route("/{trip_id}/stops/{stop_id}", web::put().to(stops::update))
                        .route(
                            "/{trip_id}/stops/{stop_id}",
                            web::delete().to(stops::delete),
                        )
                        .route(
                            "/{trip_id}/stops/{stop_id}/activities",
                            web::get().to(activities::list),
                        )
                        .route(
                            "/{trip_id}/stops/{stop_id}/activities",
                            web::post().to(activities::add),
                        )
                        .route(
                            "/{trip_id}/stops/{stop_id}/activities/{activity_id}",
                            web::put().to(activities::update),
                        )
                        .route(
                            "/{trip_id}/stops/{stop_id}/activities/{activity_id}",
                            web::delete().to(activities::delete),
                        )
                        .route(
                            "/{trip_id}/stops/{stop_id}/activities/{activity_id}/toggle",
                            web::patch().to(activities::toggle),
                        ),
                )
                .service(
                    web::scope("/analytics")
                        .wrap(AuthMiddleware)
                        .route("/trips/{trip_id}", web::get().to(analytics::trip))
                        .route("/me", web::get().to(analytics::me))
                        .service(
                            web::scope("/global")
                                .wrap(RequireRole::new(UserRole::Admin))
                                .route("", web::get().to(analytics::global)),
                        ),
                ),
        );
}
