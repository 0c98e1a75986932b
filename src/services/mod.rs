pub mod accounts;
pub mod analytics;
pub mod budget;
pub mod itinerary;
pub mod permission;
pub mod search;
pub mod trips;
