//! Configuration management for the `SmartTravel` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings. The loaded value
//! is passed into each lookup component when it is constructed.

use crate::SmartTravelError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that points to an alternative config file
pub const CONFIG_PATH_VAR: &str = "SMARTTRAVEL_CONFIG";

const WEATHER_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";
const ROUTING_KEY_VAR: &str = "OPENROUTESERVICE_API_KEY";

/// Root configuration structure for the `SmartTravel` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmartTravelConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// City directory (GeoDB) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    #[serde(default = "default_geo_base_url")]
    pub base_url: String,
    /// ISO country code of the region
    #[serde(default = "default_country")]
    pub country: String,
    /// Region (province) code
    #[serde(default = "default_region")]
    pub region: String,
    /// Maximum number of cities fetched
    #[serde(default = "default_city_limit")]
    pub limit: u32,
    /// Request timeout in seconds
    #[serde(default = "default_geo_timeout")]
    pub timeout_seconds: u32,
}

/// Weather API (OpenWeatherMap) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Missing keys are allowed; lookups then degrade at request time
    pub api_key: Option<String>,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Routing API (OpenRouteService) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,
    /// Directions profile, e.g. `driving-car`
    #[serde(default = "default_routing_profile")]
    pub profile: String,
    /// Request timeout in seconds
    #[serde(default = "default_routing_timeout")]
    pub timeout_seconds: u32,
}

/// Query store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that holds the databases
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_geo_base_url() -> String {
    "http://geodb-free-service.wirefreethought.com".to_string()
}

fn default_country() -> String {
    "CA".to_string()
}

fn default_region() -> String {
    "BC".to_string()
}

fn default_city_limit() -> u32 {
    10
}

fn default_geo_timeout() -> u32 {
    10
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_routing_base_url() -> String {
    "https://api.openrouteservice.org".to_string()
}

fn default_routing_profile() -> String {
    "driving-car".to_string()
}

fn default_routing_timeout() -> u32 {
    15
}

fn default_storage_path() -> String {
    "data".to_string()
}

fn default_database() -> String {
    "smart_travel_db".to_string()
}

fn default_collection() -> String {
    "travel_queries".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            base_url: default_geo_base_url(),
            country: default_country(),
            region: default_region(),
            limit: default_city_limit(),
            timeout_seconds: default_geo_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_routing_base_url(),
            profile: default_routing_profile(),
            timeout_seconds: default_routing_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl StorageConfig {
    /// Directory of the fixed database inside the storage path
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.path).join(&self.database)
    }
}

impl SmartTravelConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides with SMARTTRAVEL_ prefix, e.g. SMARTTRAVEL_SERVER__PORT
        builder = builder.add_source(
            Environment::with_prefix("SMARTTRAVEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SmartTravelConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_keys(
            std::env::var(WEATHER_KEY_VAR).ok(),
            std::env::var(ROUTING_KEY_VAR).ok(),
        );
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Fill API keys from the plain provider variables when not set otherwise
    pub fn apply_env_keys(&mut self, weather_key: Option<String>, routing_key: Option<String>) {
        if self.weather.api_key.is_none() {
            self.weather.api_key = weather_key.filter(|k| !k.is_empty());
        }
        if self.routing.api_key.is_none() {
            self.routing.api_key = routing_key.filter(|k| !k.is_empty());
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geo.base_url.is_empty() {
            self.geo.base_url = default_geo_base_url();
        }
        if self.geo.limit == 0 {
            self.geo.limit = default_city_limit();
        }
        if self.geo.timeout_seconds == 0 {
            self.geo.timeout_seconds = default_geo_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.routing.base_url.is_empty() {
            self.routing.base_url = default_routing_base_url();
        }
        if self.routing.profile.is_empty() {
            self.routing.profile = default_routing_profile();
        }
        if self.routing.timeout_seconds == 0 {
            self.routing.timeout_seconds = default_routing_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Keys are optional, but a configured key must not be blank
    pub fn validate_api_keys(&self) -> Result<()> {
        if self.weather.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(SmartTravelError::config(
                "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
            )
            .into());
        }

        if self.routing.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(SmartTravelError::config(
                "Routing API key cannot be empty if provided. Either remove it or provide a valid key.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let timeouts = [
            ("Geo", self.geo.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
            ("Routing", self.routing.timeout_seconds),
        ];
        for (name, seconds) in timeouts {
            if !(1..=120).contains(&seconds) {
                return Err(SmartTravelError::config(format!(
                    "{name} API timeout must be between 1 and 120 seconds"
                ))
                .into());
            }
        }

        if !(1..=100).contains(&self.geo.limit) {
            return Err(SmartTravelError::config("City limit must be between 1 and 100").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SmartTravelError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SmartTravelError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Geo", &self.geo.base_url),
            ("Weather", &self.weather.base_url),
            ("Routing", &self.routing.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SmartTravelError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.storage.database.is_empty() || self.storage.collection.is_empty() {
            return Err(
                SmartTravelError::config("Storage database and collection must be named").into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SmartTravelConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.geo.country, "CA");
        assert_eq!(config.geo.region, "BC");
        assert_eq!(config.geo.limit, 10);
        assert_eq!(config.geo.timeout_seconds, 10);
        assert_eq!(config.routing.profile, "driving-car");
        assert_eq!(config.storage.database, "smart_travel_db");
        assert_eq!(config.storage.collection, "travel_queries");
        assert!(config.weather.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_keys_fill_missing_only() {
        let mut config = SmartTravelConfig::default();
        config.routing.api_key = Some("from_file".to_string());

        config.apply_env_keys(Some("weather_env".into()), Some("routing_env".into()));

        assert_eq!(config.weather.api_key.as_deref(), Some("weather_env"));
        assert_eq!(config.routing.api_key.as_deref(), Some("from_file"));
    }

    #[test]
    fn test_empty_env_key_is_ignored() {
        let mut config = SmartTravelConfig::default();
        config.apply_env_keys(Some(String::new()), None);
        assert!(config.weather.api_key.is_none());
    }

    #[test]
    fn test_config_validation_blank_api_key() {
        let mut config = SmartTravelConfig::default();
        config.routing.api_key = Some("   ".to_string());
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Routing API key cannot be empty")
        );
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = SmartTravelConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = SmartTravelConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Weather API timeout must be between")
        );
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = SmartTravelConfig::default();
        config.geo.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_restores_zeroes() {
        let mut config = SmartTravelConfig::default();
        config.geo.limit = 0;
        config.routing.profile = String::new();
        config.apply_defaults();
        assert_eq!(config.geo.limit, 10);
        assert_eq!(config.routing.profile, "driving-car");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[geo]\nlimit = 5\n\n[weather]\napi_key = \"file_weather_key\"\n"
        )
        .unwrap();

        let config = SmartTravelConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.geo.limit, 5);
        assert_eq!(config.geo.region, "BC");
        assert_eq!(config.weather.api_key.as_deref(), Some("file_weather_key"));
    }

    #[test]
    fn test_database_path() {
        let storage = StorageConfig {
            path: "/tmp/smarttravel".to_string(),
            ..StorageConfig::default()
        };
        assert_eq!(
            storage.database_path(),
            PathBuf::from("/tmp/smarttravel/smart_travel_db")
        );
    }
}
