use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::config::StorageBackend;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let storage = check_storage(&state).await;
    if storage.status != "ok" {
        health.status = "degraded".to_string();
    }
    health.services.insert("storage".to_string(), storage);

    HttpResponse::Ok().json(health)
}

async fn check_storage(state: &AppState) -> ServiceStatus {
    let backend = match state.config.storage {
        StorageBackend::Mongo => "MongoDB",
        StorageBackend::Memory => "in-memory store",
    };

    match state.store.ping().await {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!("Connected to {}", backend)),
        },
        Err(e) => {
            log::warn!("Storage health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to reach {}: {}", backend, e)),
            }
        }
    }
}
