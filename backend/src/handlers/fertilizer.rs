//! HTTP handlers for fertilizer calculator endpoints

use axum::{extract::State, Json};
use shared::{ApplicationScheduleEntry, CostBenefitResult, NutrientDeficit};

use crate::error::AppResult;
use crate::services::fertilizer::{
    CostBenefitRequest, FertilizerPlan, FertilizerService, PlanRequest, RecommendationsRequest,
    RecommendationsResponse, RequirementsRequest, ScheduleRequest,
};
use crate::AppState;

/// Calculate nutrient requirements
pub async fn calculate_requirements(
    State(state): State<AppState>,
    Json(input): Json<RequirementsRequest>,
) -> AppResult<Json<NutrientDeficit>> {
    let service = FertilizerService::new(state.reference.current().await);
    let deficit = service.requirements(input)?;
    Ok(Json(deficit))
}

/// Recommend fertilizer products for a deficit
pub async fn recommend_fertilizers(
    State(state): State<AppState>,
    Json(input): Json<RecommendationsRequest>,
) -> AppResult<Json<RecommendationsResponse>> {
    let service = FertilizerService::new(state.reference.current().await);
    let response = service.recommendations(input)?;
    Ok(Json(response))
}

/// Build an application schedule
pub async fn create_schedule(
    State(state): State<AppState>,
    Json(input): Json<ScheduleRequest>,
) -> AppResult<Json<Vec<ApplicationScheduleEntry>>> {
    let service = FertilizerService::new(state.reference.current().await);
    let schedule = service.schedule(input)?;
    Ok(Json(schedule))
}

/// Estimate cost and benefit of a program
pub async fn calculate_cost_benefit(
    State(state): State<AppState>,
    Json(input): Json<CostBenefitRequest>,
) -> AppResult<Json<CostBenefitResult>> {
    let service = FertilizerService::new(state.reference.current().await);
    let result = service.cost_benefit(input)?;
    Ok(Json(result))
}

/// Complete fertilizer plan
pub async fn create_plan(
    State(state): State<AppState>,
    Json(input): Json<PlanRequest>,
) -> AppResult<Json<FertilizerPlan>> {
    let service = FertilizerService::new(state.reference.current().await);
    let plan = service.plan(input)?;
    Ok(Json(plan))
}
