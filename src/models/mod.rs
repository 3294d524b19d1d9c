//! Data models for the SmartTravel application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Cities of the configured region and their coordinates
//! - Weather: Current weather report for a city
//! - Route: Driving route, its steps and the persisted summary
//! - Query: Stored travel query records

pub mod location;
pub mod query;
pub mod route;
pub mod weather;

// Re-export all public types for convenient access
pub use location::City;
pub use query::TravelQuery;
pub use route::{Route, RouteStep, RouteSummary};
pub use weather::WeatherReport;

/// Round to a fixed number of decimals, half away from zero
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let multiplier = 10_f64.powi(decimals);
    (value * multiplier).round() / multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(2.0833, 1), 2.1);
        assert_eq!(round_to(0.456, 2), 0.46);
        assert_eq!(round_to(-0.04, 1), -0.0);
    }
}
