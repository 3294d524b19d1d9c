//! City lookup against the GeoDB Cities API
//!
//! Fetches the cities of one fixed region and resolves names to coordinates.
//! The list is fetched fresh on every call; at ten cities a linear scan is enough.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, header::ACCEPT};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::GeoConfig;
use crate::models::City;
use crate::{Outcome, SmartTravelError};

pub const USER_AGENT: &str = "Smart-Travel-Planner/1.0";

/// Client for the region's city list
#[derive(Debug, Clone)]
pub struct CityDirectory {
    client: Client,
    config: GeoConfig,
}

#[derive(Debug, Deserialize)]
struct CitiesResponse {
    #[serde(default)]
    data: Vec<City>,
}

impl CityDirectory {
    pub fn new(config: &GeoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to create geo HTTP client")?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn cities_url(&self) -> String {
        format!(
            "{}/v1/geo/countries/{}/regions/{}/cities",
            self.config.base_url.trim_end_matches('/'),
            self.config.country,
            self.config.region
        )
    }

    /// All cities of the region. Degrades to an empty list.
    #[instrument(skip(self), fields(region = %self.config.region))]
    pub async fn fetch_cities(&self) -> Outcome<Vec<City>> {
        let start_time = Instant::now();

        match self.fetch_cities_call().await {
            Ok(cities) => {
                info!(
                    "Fetched {} cities in {:.3}s",
                    cities.len(),
                    start_time.elapsed().as_secs_f64()
                );
                Outcome::Success(cities)
            }
            Err(e) => {
                warn!("City lookup failed: {}", e);
                Outcome::degraded(Vec::new(), e)
            }
        }
    }

    async fn fetch_cities_call(&self) -> std::result::Result<Vec<City>, SmartTravelError> {
        let response = self
            .client
            .get(self.cities_url())
            .query(&[("limit", self.config.limit)])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SmartTravelError::transport(format!(
                "Geo API returned status {status}"
            )));
        }

        let body: CitiesResponse = response.json().await?;
        Ok(body.data)
    }

    /// Coordinates `(latitude, longitude)` of a city; `None` when it is not in the list.
    pub async fn coordinates(&self, name: &str) -> Outcome<Option<(f64, f64)>> {
        self.fetch_cities().await.map(|cities| {
            let found = find_city(&cities, name).map(|c| (c.latitude, c.longitude));
            if found.is_none() {
                debug!("City '{}' not found among {} cities", name, cities.len());
            }
            found
        })
    }
}

/// Case-insensitive exact match by name
#[must_use]
pub fn find_city<'a>(cities: &'a [City], name: &str) -> Option<&'a City> {
    cities.iter().find(|city| city.matches(name))
}
