//! `SmartTravel` - trip planning between British Columbia cities
//!
//! Combines a city directory, current weather at both ends, a driving route
//! and a simple advisory, and keeps a history of every planned trip.

pub mod advice;
pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod logging;
pub mod models;
pub mod pages;
pub mod planner;
pub mod routing;
pub mod store;
pub mod templates;
pub mod weather;
pub mod web;

pub use advice::{Advice, travel_advice};
pub use config::SmartTravelConfig;
pub use error::{Outcome, SmartTravelError};
pub use geo::CityDirectory;
pub use models::{City, Route, RouteStep, RouteSummary, TravelQuery, WeatherReport};
pub use planner::{TravelPlan, TravelPlanner};
pub use routing::RouteClient;
pub use store::QueryStore;
pub use weather::WeatherClient;
pub use web::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SmartTravelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
