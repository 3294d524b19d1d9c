use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::RoutingConfig;
use crate::geo::{CityDirectory, USER_AGENT};
use crate::models::{Route, RouteStep};
use crate::{Outcome, SmartTravelError};

/// Driving directions between two cities of the region (OpenRouteService)
#[derive(Debug, Clone)]
pub struct RouteClient {
    client: Client,
    config: RoutingConfig,
    cities: CityDirectory,
}

impl RouteClient {
    pub fn new(config: &RoutingConfig, cities: CityDirectory) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to create routing HTTP client")?;

        Ok(Self {
            client,
            config: config.clone(),
            cities,
        })
    }

    #[instrument(skip(self))]
    pub async fn route(&self, start: &str, end: &str) -> Outcome<Route> {
        let start_time = Instant::now();

        match self.route_call(start, end).await {
            Ok(route) => {
                info!(
                    "Route {} -> {}: {} km, {} min, {} steps in {:.3}s",
                    start,
                    end,
                    route.distance_km,
                    route.duration_min,
                    route.steps.len(),
                    start_time.elapsed().as_secs_f64()
                );
                Outcome::Success(route)
            }
            Err(e) => {
                warn!("Route lookup {} -> {} failed: {}", start, end, e);
                Outcome::degraded(Route::zeroed(), e)
            }
        }
    }

    async fn resolve(&self, name: &str) -> std::result::Result<[f64; 2], SmartTravelError> {
        // Each endpoint refetches the city list
        let (found, cause) = self.cities.coordinates(name).await.into_parts();
        if let Some(cause) = cause {
            return Err(cause);
        }
        found
            .map(|(lat, lon)| [lon, lat])
            .ok_or_else(|| SmartTravelError::not_found(format!("City not found: {name}")))
    }

    async fn route_call(&self, start: &str, end: &str) -> std::result::Result<Route, SmartTravelError> {
        let from = self.resolve(start).await?;
        let to = self.resolve(end).await?;

        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| SmartTravelError::config("Routing API key is not configured"))?;

        let url = format!(
            "{}/v2/directions/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        );
        debug!("Calling the routing API for {:?} -> {:?}", from, to);

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, api_key)
            .header(ACCEPT, "application/json")
            .json(&DirectionsRequest {
                coordinates: [from, to],
            })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(SmartTravelError::transport(format!(
                "Routing API returned status {status}: {text}"
            )));
        }

        parse_directions(&text)
    }
}

/// Turn a directions response body into a [`Route`]
pub fn parse_directions(body: &str) -> std::result::Result<Route, SmartTravelError> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| SmartTravelError::malformed(format!("Routing response: {e}")))?;

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| SmartTravelError::malformed("No routes in response"))?;

    let segment = route
        .segments
        .into_iter()
        .next()
        .ok_or_else(|| SmartTravelError::malformed("No segments in route"))?;

    let steps = segment
        .steps
        .into_iter()
        .map(|step| RouteStep::from_raw(step.instruction, step.distance))
        .collect();

    Ok(Route::from_raw(segment.distance, segment.duration, steps))
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    /// `[longitude, latitude]` pairs
    coordinates: [[f64; 2]; 2],
}

#[derive(Debug, Deserialize)]
struct StepResponse {
    #[serde(default)]
    instruction: String,
    #[serde(default)]
    distance: f64,
}

#[derive(Debug, Deserialize)]
struct SegmentResponse {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    steps: Vec<StepResponse>,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    segments: Vec<SegmentResponse>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    routes: Vec<RouteResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directions() {
        let body = r#"{
            "routes": [{
                "summary": {"distance": 12345.0, "duration": 125.0},
                "segments": [{
                    "distance": 12345.0,
                    "duration": 125.0,
                    "steps": [
                        {"distance": 1234.0, "duration": 20.0, "instruction": "Head north"},
                        {"distance": 11111.0, "duration": 105.0, "instruction": "Arrive"}
                    ]
                }]
            }]
        }"#;

        let route = parse_directions(body).unwrap();
        assert_eq!(route.distance_km, 12.3);
        assert_eq!(route.duration_min, 2.1);
        assert_eq!(
            route.steps,
            vec![
                RouteStep {
                    instruction: "Head north".into(),
                    distance_km: 1.23
                },
                RouteStep {
                    instruction: "Arrive".into(),
                    distance_km: 11.11
                },
            ]
        );
    }

    #[test]
    fn test_parse_directions_defaults_missing_fields() {
        let route = parse_directions(r#"{"routes": [{"segments": [{"steps": [{}]}]}]}"#).unwrap();
        assert_eq!(route.distance_km, 0.0);
        assert_eq!(route.duration_min, 0.0);
        assert_eq!(route.steps, vec![RouteStep::from_raw("", 0.0)]);
    }

    #[test]
    fn test_parse_directions_without_routes() {
        let err = parse_directions(r#"{"error": {"code": 2010, "message": "no route"}}"#)
            .unwrap_err();
        assert!(matches!(err, SmartTravelError::MalformedResponse { .. }));

        assert!(parse_directions(r#"{"routes": []}"#).is_err());
        assert!(parse_directions(r#"{"routes": [{"segments": []}]}"#).is_err());
    }

    #[test]
    fn test_request_body_is_lon_lat() {
        let body = serde_json::to_value(DirectionsRequest {
            coordinates: [[-123.1207, 49.2827], [-123.3656, 48.4284]],
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"coordinates": [[-123.1207, 49.2827], [-123.3656, 48.4284]]})
        );
    }
}
