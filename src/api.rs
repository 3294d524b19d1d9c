use axum::{Router, extract::State, http::StatusCode, response::Json, routing::get};
use serde::Serialize;

use crate::models::{City, RouteSummary, TravelQuery};
use crate::web::AppState;

#[derive(Serialize)]
pub struct ApiQuery {
    pub id: String,
    pub start_city: String,
    pub end_city: String,
    pub timestamp: String,
    pub route_summary: Option<RouteSummary>,
}

impl From<TravelQuery> for ApiQuery {
    fn from(query: TravelQuery) -> Self {
        Self {
            route_summary: query.summary(),
            timestamp: query.timestamp.to_rfc3339(),
            id: query.id,
            start_city: query.start_city,
            end_city: query.end_city,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cities", get(get_cities))
        .route("/history", get(get_history))
}

// Unlike the pages, the JSON endpoints surface degraded lookups as errors
async fn get_cities(State(state): State<AppState>) -> Result<Json<Vec<City>>, StatusCode> {
    let (cities, cause) = state.planner.cities().await;
    if cause.is_some() {
        return Err(StatusCode::BAD_GATEWAY);
    }
    Ok(Json(cities))
}

async fn get_history(State(state): State<AppState>) -> Result<Json<Vec<ApiQuery>>, StatusCode> {
    let (queries, cause) = state.planner.store().list_all().await.into_parts();
    if cause.is_some() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(queries.into_iter().map(ApiQuery::from).collect()))
}
