use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use globetrotter_api::config::{AppConfig, StorageBackend};
use globetrotter_api::db::{memory::MemoryStore, mongo::MongoStore, TripStore, UserStore};
use globetrotter_api::routes;
use globetrotter_api::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let (trips, users): (Arc<dyn TripStore>, Arc<dyn UserStore>) = match config.storage {
        StorageBackend::Mongo => {
            let uri = config.mongodb_uri.as_deref().unwrap_or_default();
            let store = MongoStore::connect(uri, &config.database)
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            let store = Arc::new(store);
            (store.clone(), store)
        }
        StorageBackend::Memory => {
            log::warn!("Using the in-memory store, data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        }
    };

    let host = config.host.clone();
    let port = config.port;
    let state = web::Data::new(AppState::new(config, trips, users));

    log::info!("Starting HTTP server on {}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(routes::config)
    })
    .bind((host, port))?
    .run()
    .await
}
