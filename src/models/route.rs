//! Driving route model and the reduced summary that gets persisted

use serde::{Deserialize, Serialize};

use super::round_to;

/// One instruction of a driving route
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RouteStep {
    pub instruction: String,
    /// Step length in kilometers, two decimals
    pub distance_km: f64,
}

/// Full in-memory driving route between two cities
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Route {
    /// Total distance in kilometers, one decimal
    pub distance_km: f64,
    /// Total duration in minutes, one decimal
    pub duration_min: f64,
    pub steps: Vec<RouteStep>,
}

impl Route {
    /// Fallback used whenever a route cannot be computed
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            distance_km: 0.0,
            duration_min: 0.0,
            steps: Vec::new(),
        }
    }

    /// Build a route from raw API units (meters and seconds)
    #[must_use]
    pub fn from_raw(distance_m: f64, duration_s: f64, steps: Vec<RouteStep>) -> Self {
        Self {
            distance_km: meters_to_km(distance_m),
            duration_min: seconds_to_minutes(duration_s),
            steps,
        }
    }

    #[must_use]
    pub fn summary(&self) -> RouteSummary {
        RouteSummary::from(self)
    }
}

impl RouteStep {
    #[must_use]
    pub fn from_raw(instruction: impl Into<String>, distance_m: f64) -> Self {
        Self {
            instruction: instruction.into(),
            distance_km: round_to(distance_m / 1000.0, 2),
        }
    }
}

/// Meters to kilometers, one decimal
#[must_use]
pub fn meters_to_km(meters: f64) -> f64 {
    round_to(meters / 1000.0, 1)
}

/// Seconds to minutes, one decimal
#[must_use]
pub fn seconds_to_minutes(seconds: f64) -> f64 {
    round_to(seconds / 60.0, 1)
}

/// Reduced-fidelity route record stored with each travel query.
/// Never carries the per-step instructions.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RouteSummary {
    pub distance: f64,
    pub duration: f64,
    pub steps_count: usize,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        Self {
            distance: route.distance_km,
            duration: route.duration_min,
            steps_count: route.steps.len(),
        }
    }
}

impl RouteSummary {
    /// Serialize to the JSON text blob kept in the store
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(12345.0, 12.3)]
    #[case(100000.0, 100.0)]
    #[case(0.0, 0.0)]
    #[case(1960.0, 2.0)]
    fn test_meters_to_km(#[case] meters: f64, #[case] km: f64) {
        assert_eq!(meters_to_km(meters), km);
    }

    #[rstest]
    #[case(125.0, 2.1)]
    #[case(5400.0, 90.0)]
    #[case(30.0, 0.5)]
    fn test_seconds_to_minutes(#[case] seconds: f64, #[case] minutes: f64) {
        assert_eq!(seconds_to_minutes(seconds), minutes);
    }

    #[test]
    fn test_step_distance_uses_two_decimals() {
        let step = RouteStep::from_raw("Turn left onto Main Street", 1234.0);
        assert_eq!(step.distance_km, 1.23);
    }

    #[test]
    fn test_summary_drops_steps() {
        let route = Route::from_raw(
            100_000.0,
            5400.0,
            vec![
                RouteStep::from_raw("Head north", 500.0),
                RouteStep::from_raw("Take the ferry", 90_000.0),
                RouteStep::from_raw("Arrive", 9_500.0),
            ],
        );

        let json = route.summary().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(object["distance"], 100.0);
        assert_eq!(object["duration"], 90.0);
        assert_eq!(object["steps_count"], 3);
        assert!(!json.contains("Head north"));
    }

    #[test]
    fn test_zeroed_summary() {
        let summary = Route::zeroed().summary();
        assert_eq!(
            summary,
            RouteSummary {
                distance: 0.0,
                duration: 0.0,
                steps_count: 0
            }
        );
    }
}
