/// Application routes configuration
use crate::handlers::{health, recommend_seat, search_airports, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Seat recommendation
        .route("/api/flight", post(recommend_seat))
        // Airport autocomplete
        .route("/api/flight/search", get(search_airports))
        // Health check
        .route("/api/flight/health", get(health))
        .with_state(state)
}
