//! One trip plan per form submission
//!
//! Weather at both ends, the route, the advice and the persisted summary,
//! in that order. Degraded steps are collected as warnings instead of failing
//! the whole plan.

use chrono::{DateTime, FixedOffset};
use tracing::{info, instrument, warn};

use crate::SmartTravelError;
use crate::advice::{Advice, travel_advice};
use crate::geo::CityDirectory;
use crate::models::{City, Route, WeatherReport};
use crate::routing::RouteClient;
use crate::store::QueryStore;
use crate::weather::WeatherClient;

/// Everything the results page shows for one submission
#[derive(Debug, Clone)]
pub struct TravelPlan {
    pub start_city: String,
    pub end_city: String,
    pub weather_start: WeatherReport,
    pub weather_end: WeatherReport,
    pub route: Route,
    pub advice: Advice,
    /// User-facing notes for every step that fell back to placeholder data
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TravelPlanner {
    cities: CityDirectory,
    weather: WeatherClient,
    routes: RouteClient,
    store: QueryStore,
}

impl TravelPlanner {
    pub fn new(
        cities: CityDirectory,
        weather: WeatherClient,
        routes: RouteClient,
        store: QueryStore,
    ) -> Self {
        Self {
            cities,
            weather,
            routes,
            store,
        }
    }

    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    /// Cities for the selector; degraded to an empty list with a warning
    pub async fn cities(&self) -> (Vec<City>, Option<String>) {
        let (cities, cause) = self.cities.fetch_cities().await.into_parts();
        (cities, cause.map(|c| c.user_message()))
    }

    #[instrument(skip(self, now))]
    pub async fn plan(&self, start: &str, end: &str, now: DateTime<FixedOffset>) -> TravelPlan {
        let mut warnings = Vec::new();
        let mut note = |label: &str, cause: Option<SmartTravelError>| {
            if let Some(cause) = cause {
                warnings.push(format!("{label}: {}", cause.user_message()));
            }
        };

        let (weather_start, cause) = self.weather.current(start).await.into_parts();
        note(&format!("Weather for {start}"), cause);

        let (weather_end, cause) = self.weather.current(end).await.into_parts();
        note(&format!("Weather for {end}"), cause);

        let (route, cause) = self.routes.route(start, end).await.into_parts();
        note("Route", cause);

        let advice = travel_advice(&weather_start.description, &weather_end.description, now);

        let summary = match route.summary().to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize route summary: {}", e);
                String::from("{}")
            }
        };

        let (saved_id, cause) = self.store.save(start, end, &summary).await.into_parts();
        note("History", cause);

        info!(
            saved_id = saved_id.as_deref().unwrap_or("-"),
            "Planned {} -> {}: {:?} with {} warnings",
            start,
            end,
            advice,
            warnings.len()
        );

        TravelPlan {
            start_city: start.to_string(),
            end_city: end.to_string(),
            weather_start,
            weather_end,
            route,
            advice,
            warnings,
        }
    }
}
