//! City model for the configured region

use serde::{Deserialize, Serialize};

/// A city of the configured region with its coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    /// City name as returned by the geo API
    #[serde(default)]
    pub name: String,
    /// Latitude in decimal degrees
    #[serde(default)]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(default)]
    pub longitude: f64,
}

impl City {
    /// Create a new city
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Case-insensitive exact name comparison
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_matches_ignores_case() {
        let city = City::new("Vancouver", 49.2827, -123.1207);
        assert!(city.matches("vancouver"));
        assert!(city.matches("VANCOUVER"));
        assert!(!city.matches("North Vancouver"));
        assert!(!city.matches("Vancouv"));
    }

    #[test]
    fn test_missing_fields_default() {
        let city: City = serde_json::from_str(r#"{"name": "Kelowna"}"#).unwrap();
        assert_eq!(city, City::new("Kelowna", 0.0, 0.0));
    }
}
