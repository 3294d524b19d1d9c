//! Weather report model and display methods

use serde::{Deserialize, Serialize};

use super::round_to;

/// Current weather for one city, as shown on the results page
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReport {
    /// Temperature in Celsius, one decimal. `None` when the lookup degraded.
    pub temperature: Option<f64>,
    /// Free-text description of weather conditions
    pub description: String,
}

impl WeatherReport {
    /// Build a report from a raw Kelvin reading
    #[must_use]
    pub fn from_kelvin(kelvin: f64, description: impl Into<String>) -> Self {
        Self {
            temperature: Some(Self::kelvin_to_celsius(kelvin)),
            description: description.into(),
        }
    }

    /// Fallback with empty temperature and description
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            temperature: None,
            description: String::new(),
        }
    }

    /// Convert temperature from Kelvin to Celsius, rounded to one decimal
    #[must_use]
    pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
        round_to(kelvin - 273.15, 1)
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        self.temperature
            .map(|t| format!("{t:.1}°C"))
            .unwrap_or_default()
    }
}
