/// HTTP request handlers
use crate::domain::{FlightRequest, FlightSunReport, Health};
use crate::errors::ApiError;
use crate::services::{AirportService, FlightService};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub flight_service: Arc<FlightService>,
    pub airport_service: Arc<AirportService>,
    pub search_limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

/// Airport autocomplete
pub async fn search_airports(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Value> {
    let q = params.q.unwrap_or_default();
    let limit = params.limit.unwrap_or(state.search_limit);
    debug!("Airport search for '{}' (limit {})", q, limit);

    let results = state.airport_service.search(&q, limit);
    Json(serde_json::json!({ "results": results }))
}

/// Resolve both airports and compute the seat recommendation
pub async fn recommend_seat(
    State(state): State<AppState>,
    Json(request): Json<FlightRequest>,
) -> Result<Json<FlightSunReport>, ApiError> {
    let (departure, arrival, datetime) = match (
        non_blank(request.departure),
        non_blank(request.arrival),
        non_blank(request.datetime),
    ) {
        (Some(d), Some(a), Some(t)) => (d, a, t),
        _ => {
            return Err(ApiError::InvalidInput(
                "departure, arrival and datetime are required".to_string(),
            ))
        }
    };

    let dep_coords = state.airport_service.resolve(&departure)?;
    let arr_coords = state.airport_service.resolve(&arrival)?;
    let report = state
        .flight_service
        .report(dep_coords, arr_coords, &datetime)?;
    Ok(Json(report))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
