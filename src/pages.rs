//! HTML pages: the trip form with its results, and the query history

use std::collections::BTreeMap;

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::models::{City, Route, TravelQuery, WeatherReport};
use crate::planner::TravelPlan;
use crate::templates::{HISTORY, INDEX};
use crate::web::AppState;

const MAX_CITY_LENGTH: usize = 100;

/// Submitted trip form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelForm {
    #[serde(default)]
    pub start_city: String,
    #[serde(default)]
    pub end_city: String,
}

pub type FormErrors = BTreeMap<&'static str, String>;

impl TravelForm {
    /// Trimmed `(start, end)` or per-field error messages
    pub fn validate(&self) -> Result<(String, String), FormErrors> {
        let mut errors = FormErrors::new();
        let start = check_city(&mut errors, "start_city", &self.start_city);
        let end = check_city(&mut errors, "end_city", &self.end_city);

        if errors.is_empty() {
            Ok((start, end))
        } else {
            Err(errors)
        }
    }
}

fn check_city(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, "This field is required.".to_string());
    } else if value.chars().count() > MAX_CITY_LENGTH {
        errors.insert(
            field,
            format!("Ensure this value has at most {MAX_CITY_LENGTH} characters."),
        );
    }
    value.to_string()
}

#[derive(Debug, Serialize)]
struct WeatherView {
    temperature: String,
    description: String,
}

impl From<&WeatherReport> for WeatherView {
    fn from(report: &WeatherReport) -> Self {
        Self {
            temperature: report.format_temperature(),
            description: report.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct StepView {
    instruction: String,
    distance: String,
}

#[derive(Debug, Serialize)]
struct RouteView {
    distance: String,
    duration: String,
    steps: Vec<StepView>,
}

impl From<&Route> for RouteView {
    fn from(route: &Route) -> Self {
        Self {
            distance: format!("{:.1}", route.distance_km),
            duration: format!("{:.1}", route.duration_min),
            steps: route
                .steps
                .iter()
                .map(|step| StepView {
                    instruction: step.instruction.clone(),
                    distance: format!("{:.2}", step.distance_km),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PlanView {
    start_city: String,
    end_city: String,
    advice: &'static str,
    weather_start: WeatherView,
    weather_end: WeatherView,
    route: RouteView,
    warnings: Vec<String>,
}

impl From<&TravelPlan> for PlanView {
    fn from(plan: &TravelPlan) -> Self {
        Self {
            start_city: plan.start_city.clone(),
            end_city: plan.end_city.clone(),
            advice: plan.advice.message(),
            weather_start: WeatherView::from(&plan.weather_start),
            weather_end: WeatherView::from(&plan.weather_end),
            route: RouteView::from(&plan.route),
            warnings: plan.warnings.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct IndexPage {
    cities: Vec<City>,
    form: TravelForm,
    errors: FormErrors,
    plan: Option<PlanView>,
    notice: Option<String>,
}

#[derive(Debug, Serialize)]
struct HistoryRow {
    timestamp: String,
    start_city: String,
    end_city: String,
    distance: String,
    duration: String,
    steps_count: String,
}

impl From<&TravelQuery> for HistoryRow {
    fn from(query: &TravelQuery) -> Self {
        let summary = query.summary();
        Self {
            timestamp: query.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
            start_city: query.start_city.clone(),
            end_city: query.end_city.clone(),
            distance: summary
                .as_ref()
                .map_or_else(|| "-".to_string(), |s| format!("{:.1} km", s.distance)),
            duration: summary
                .as_ref()
                .map_or_else(|| "-".to_string(), |s| format!("{:.1} min", s.duration)),
            steps_count: summary
                .as_ref()
                .map_or_else(|| "-".to_string(), |s| s.steps_count.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct HistoryPage {
    queries: Vec<HistoryRow>,
    notice: Option<String>,
}

fn render_page<T: Serialize>(
    state: &AppState,
    template: &str,
    status: StatusCode,
    page: &T,
) -> Response {
    match state.renderer.render(template, page) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("Failed to render {}: {}", template, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.user_message()).into_response()
        }
    }
}

/// Empty form
pub async fn show_form(State(state): State<AppState>) -> Response {
    let (cities, notice) = state.planner.cities().await;
    let page = IndexPage {
        cities,
        form: TravelForm::default(),
        errors: FormErrors::new(),
        plan: None,
        notice,
    };
    render_page(&state, INDEX, StatusCode::OK, &page)
}

/// Validate, plan, persist and show the results
pub async fn submit_form(State(state): State<AppState>, Form(form): Form<TravelForm>) -> Response {
    let (status, plan, errors) = match form.validate() {
        Ok((start, end)) => {
            let now = (state.clock)();
            let plan = state.planner.plan(&start, &end, now).await;
            (StatusCode::OK, Some(PlanView::from(&plan)), FormErrors::new())
        }
        Err(errors) => (StatusCode::UNPROCESSABLE_ENTITY, None, errors),
    };

    let (cities, notice) = state.planner.cities().await;
    let page = IndexPage {
        cities,
        form,
        errors,
        plan,
        notice,
    };
    render_page(&state, INDEX, status, &page)
}

/// Past queries, newest first
pub async fn history(State(state): State<AppState>) -> Response {
    let (queries, cause) = state.planner.store().list_all().await.into_parts();
    let page = HistoryPage {
        queries: queries.iter().map(HistoryRow::from).collect(),
        notice: cause.map(|c| c.user_message()),
    };
    render_page(&state, HISTORY, StatusCode::OK, &page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(start: &str, end: &str) -> TravelForm {
        TravelForm {
            start_city: start.to_string(),
            end_city: end.to_string(),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let (start, end) = form("  Vancouver ", "Victoria").validate().unwrap();
        assert_eq!(start, "Vancouver");
        assert_eq!(end, "Victoria");
    }

    #[test]
    fn test_required_fields() {
        let errors = form("", "   ").validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors["start_city"].contains("required"));
        assert!(errors["end_city"].contains("required"));
    }

    #[test]
    fn test_too_long_city() {
        let long = "x".repeat(101);
        let errors = form("Vancouver", &long).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors["end_city"].contains("at most 100"));

        assert!(form("Vancouver", &"x".repeat(100)).validate().is_ok());
    }

    #[test]
    fn test_route_view_formats_units() {
        let route = Route::from_raw(100_000.0, 5400.0, Vec::new());
        let view = RouteView::from(&route);
        assert_eq!(view.distance, "100.0");
        assert_eq!(view.duration, "90.0");
    }

    #[test]
    fn test_history_row_without_summary() {
        let query = TravelQuery {
            id: "1".into(),
            start_city: "Kamloops".into(),
            end_city: "Prince George".into(),
            timestamp: chrono::Utc::now(),
            route_summary: "???".into(),
        };
        let row = HistoryRow::from(&query);
        assert_eq!(row.distance, "-");
        assert_eq!(row.steps_count, "-");
    }
}
