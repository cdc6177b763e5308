//! Route definitions for the FarmGuard API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/soil", soil_routes())
        .nest("/fertilizer", fertilizer_routes())
        .nest("/reference", reference_routes())
}

/// Soil analysis routes
fn soil_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(handlers::analyze_soil))
        .route("/quick-test", post(handlers::quick_soil_test))
        .route("/fertilizer-prices", get(handlers::get_fertilizer_prices))
        .route("/crop-requirements/:crop", get(handlers::get_crop_requirements))
        .route("/ph-category", get(handlers::get_ph_category))
}

/// Fertilizer calculator routes
fn fertilizer_routes() -> Router<AppState> {
    Router::new()
        .route("/requirements", post(handlers::calculate_requirements))
        .route("/recommendations", post(handlers::recommend_fertilizers))
        .route("/schedule", post(handlers::create_schedule))
        .route("/cost-benefit", post(handlers::calculate_cost_benefit))
        .route("/plan", post(handlers::create_plan))
}

/// Reference-table administration routes
fn reference_routes() -> Router<AppState> {
    Router::new().route("/reload", post(handlers::reload_reference))
}
