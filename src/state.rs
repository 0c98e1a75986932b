use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{TripStore, UserStore};
use crate::services::{
    accounts::AccountService, analytics::AnalyticsService, search::SearchService,
    trips::TripService,
};

/// Shared application state handed to every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn TripStore>,
    pub trips: TripService,
    pub accounts: AccountService,
    pub search: SearchService,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn new(config: AppConfig, trips: Arc<dyn TripStore>, users: Arc<dyn UserStore>) -> Self {
        let access = config.analytics_access;
        Self {
            accounts: AccountService::new(
                users.clone(),
                &config.jwt_secret,
                config.jwt_ttl_hours,
                config.bcrypt_cost,
            ),
            trips: TripService::new(trips.clone(), users.clone(), access),
            search: SearchService::new(trips.clone(), users.clone()),
            analytics: AnalyticsService::new(trips.clone(), users, access),
            store: trips,
            config: Arc::new(config),
        }
    }
}
