//! Stored travel query record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RouteSummary;

/// One submitted travel query as kept in the store
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TravelQuery {
    pub id: String,
    pub start_city: String,
    pub end_city: String,
    /// Creation time, assigned by the store
    pub timestamp: DateTime<Utc>,
    /// JSON-encoded [`RouteSummary`]
    pub route_summary: String,
}

impl TravelQuery {
    /// Decode the stored summary, if it is still readable
    #[must_use]
    pub fn summary(&self) -> Option<RouteSummary> {
        RouteSummary::from_json(&self.route_summary).ok()
    }
}

impl std::fmt::Display for TravelQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "From {} to {} at {}",
            self.start_city, self.end_city, self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_and_summary() {
        let query = TravelQuery {
            id: "q1".into(),
            start_city: "Vancouver".into(),
            end_city: "Kelowna".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            route_summary: r#"{"distance":389.2,"duration":240.5,"steps_count":17}"#.into(),
        };

        assert_eq!(
            query.to_string(),
            "From Vancouver to Kelowna at 2024-05-01 12:00:00 UTC"
        );
        assert_eq!(query.summary().unwrap().steps_count, 17);
    }

    #[test]
    fn test_unreadable_summary() {
        let query = TravelQuery {
            id: "q2".into(),
            start_city: "A".into(),
            end_city: "B".into(),
            timestamp: Utc::now(),
            route_summary: "not json".into(),
        };
        assert!(query.summary().is_none());
    }
}
