use anyhow::{Context, Result};
use axum::{Router, routing::get};
use chrono::{DateTime, FixedOffset};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::advice::pacific_now;
use crate::config::SmartTravelConfig;
use crate::geo::CityDirectory;
use crate::planner::TravelPlanner;
use crate::routing::RouteClient;
use crate::store::QueryStore;
use crate::templates::PageRenderer;
use crate::weather::WeatherClient;
use crate::{api, pages};

/// Source of "now" for the advice rule
pub type Clock = fn() -> DateTime<FixedOffset>;

const MAX_BODY_BYTES: usize = 16 * 1024;

/// Shared, immutable request state
#[derive(Debug, Clone)]
pub struct AppState {
    pub planner: TravelPlanner,
    pub renderer: PageRenderer,
    pub clock: Clock,
}

impl AppState {
    /// Build every component from configuration
    pub fn from_config(config: &SmartTravelConfig) -> Result<Self> {
        let cities = CityDirectory::new(&config.geo)?;
        let weather = WeatherClient::new(&config.weather)?;
        let routes = RouteClient::new(&config.routing, cities.clone())?;
        let store = QueryStore::open(&config.storage)?;
        let renderer = PageRenderer::new().context("Failed to compile page templates")?;

        Ok(Self {
            planner: TravelPlanner::new(cities, weather, routes, store),
            renderer,
            clock: pacific_now,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::show_form).post(pages::submit_form))
        .route("/history", get(pages::history))
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api::router())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: &SmartTravelConfig, state: AppState) -> Result<()> {
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
