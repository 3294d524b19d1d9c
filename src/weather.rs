//! Weather API client for OpenWeatherMap
//!
//! Looks up current conditions by city name. Any failure degrades to an empty
//! report so the results page can still render.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::config::WeatherConfig;
use crate::geo::USER_AGENT;
use crate::models::WeatherReport;
use crate::{Outcome, SmartTravelError};

/// Current-weather client
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    config: WeatherConfig,
}

/// OpenWeatherMap current weather response, reduced to what we read
mod openweathermap {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: MainData,
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        /// Kelvin
        pub temp: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to create weather HTTP client")?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Current weather for a city name
    #[instrument(skip(self))]
    pub async fn current(&self, city: &str) -> Outcome<WeatherReport> {
        let start_time = Instant::now();

        match self.current_call(city).await {
            Ok(report) => {
                info!(
                    "Weather for '{}': {} in {:.3}s",
                    city,
                    report.description,
                    start_time.elapsed().as_secs_f64()
                );
                Outcome::Success(report)
            }
            Err(e) => {
                warn!("Weather lookup for '{}' failed: {}", city, e);
                Outcome::degraded(WeatherReport::unavailable(), e)
            }
        }
    }

    async fn current_call(&self, city: &str) -> std::result::Result<WeatherReport, SmartTravelError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| SmartTravelError::config("Weather API key is not configured"))?;

        let url = format!(
            "{}/data/2.5/weather",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(url)
            .query(&[("q", city), ("appid", api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_default();
            return Err(match status.as_u16() {
                401 => SmartTravelError::config(format!("Weather API rejected the key: {detail}")),
                404 => SmartTravelError::not_found(format!("No weather for city: {city}")),
                _ => SmartTravelError::transport(format!(
                    "Weather API returned status {status}: {detail}"
                )),
            });
        }

        let text = response.text().await?;
        parse_current(&text)
    }
}

/// Extract temperature and description from a current-weather body
pub fn parse_current(body: &str) -> std::result::Result<WeatherReport, SmartTravelError> {
    let parsed: openweathermap::CurrentResponse = serde_json::from_str(body)
        .map_err(|e| SmartTravelError::malformed(format!("Weather response: {e}")))?;

    let condition = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| SmartTravelError::malformed("Weather response has no conditions"))?;

    Ok(WeatherReport::from_kelvin(
        parsed.main.temp,
        condition.description,
    ))
}
