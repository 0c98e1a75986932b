#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{
    body::{self, MessageBody},
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    middleware::Logger,
    web, App,
};
use serde_json::{json, Value};
use std::sync::Arc;

use globetrotter_api::config::AppConfig;
use globetrotter_api::db::{memory::MemoryStore, UserStore};
use globetrotter_api::models::user::{SignupRequest, UserRole};
use globetrotter_api::routes;
use globetrotter_api::state::AppState;

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub store: Arc<MemoryStore>,
}

/// A registered user and a token to act as them.
pub struct Session {
    pub user_id: String,
    pub token: String,
}

impl Session {
    pub fn auth(&self) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", self.token))
    }
}

pub fn test_config(analytics: &str) -> AppConfig {
    AppConfig::from_lookup(|name| match name {
        "STORAGE" => Some("memory".to_string()),
        "JWT_SECRET" => Some("integration-secret".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        "ANALYTICS_ACCESS" => Some(analytics.to_string()),
        _ => None,
    })
    .expect("test config")
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config("grant"))
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = web::Data::new(AppState::new(config, store.clone(), store.clone()));
        Self { state, store }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    }

    pub async fn signup(&self, first_name: &str) -> Session {
        let auth = self
            .state
            .accounts
            .signup(SignupRequest {
                first_name: first_name.to_string(),
                last_name: "Tester".to_string(),
                email: format!("{}@example.com", first_name.to_lowercase()),
                password: "password123".to_string(),
                preferences: None,
            })
            .await
            .expect("signup");
        Session {
            user_id: auth.user.id,
            token: auth.auth_token,
        }
    }

    /// Creates a trip through the service layer and returns it as JSON.
    pub async fn create_trip(&self, session: &Session, name: &str, public: bool) -> Value {
        let input = serde_json::from_value(trip_body(name, public)).expect("trip body");
        let trip = self
            .state
            .trips
            .create(&session.user_id, input)
            .await
            .expect("create trip");
        serde_json::to_value(trip).expect("trip json")
    }

    /// Adds a stop through the service layer and returns its id.
    pub async fn add_stop(
        &self,
        session: &Session,
        trip_id: &str,
        city: &str,
        country: &str,
        days: (u32, u32),
    ) -> String {
        let input = serde_json::from_value(stop_body(city, country, days.0, days.1))
            .expect("stop body");
        self.state
            .trips
            .add_stop(trip_id, &session.user_id, input)
            .await
            .expect("add stop")
            .stop
            .id
    }

    pub async fn admin(&self, first_name: &str) -> Session {
        let session = self.signup(first_name).await;
        let mut user = self
            .store
            .find_user(&session.user_id)
            .await
            .unwrap()
            .expect("user exists");
        user.role = UserRole::Admin;
        self.store.replace_user(&user).await.unwrap();

        let auth = self.state.accounts.issue_token(&user).expect("token");
        Session {
            user_id: user.id,
            token: auth.auth_token,
        }
    }
}

pub fn trip_body(name: &str, public: bool) -> Value {
    json!({
        "name": name,
        "description": "Integration test trip",
        "startDate": "2024-06-01T00:00:00Z",
        "endDate": "2024-06-10T00:00:00Z",
        "isPublic": public,
        "theme": "cultural",
        "budget": { "total": 2500.0, "currency": "EUR" }
    })
}

pub fn stop_body(city: &str, country: &str, arrival_day: u32, departure_day: u32) -> Value {
    json!({
        "city": city,
        "country": country,
        "arrivalDate": format!("2024-06-{:02}T12:00:00Z", arrival_day),
        "departureDate": format!("2024-06-{:02}T12:00:00Z", departure_day),
        "dailyBudget": 100.0
    })
}

pub fn activity_body(day: i64, start: &str, end: &str, cost: f64) -> Value {
    json!({
        "day": day,
        "name": "Guided tour",
        "category": "cultural",
        "startTime": start,
        "endTime": end,
        "cost": cost
    })
}

/// Sends a request and returns its status and JSON body. Errors raised by
/// middleware are rendered the way the server would render them.
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, bytes) = match app.call(req).await {
        Ok(resp) => {
            let status = resp.status();
            let bytes = body::to_bytes(resp.into_body()).await.ok().unwrap_or_default();
            (status, bytes)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let bytes = body::to_bytes(resp.into_body()).await.ok().unwrap_or_default();
            (status, bytes)
        }
    };
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
