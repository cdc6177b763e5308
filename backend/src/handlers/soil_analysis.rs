//! HTTP handlers for soil analysis endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::soil_analysis::{
    CropRequirements, FertilizerPrices, PhCategoryInfo, SoilAnalysisRequest, SoilAnalysisResponse,
    SoilAnalysisService,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct QuickTestParams {
    pub ph: f64,
    #[serde(default = "default_crop")]
    pub crop: String,
}

fn default_crop() -> String {
    "rice".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PhParams {
    pub ph: f64,
}

/// Analyze a soil test for a target crop
pub async fn analyze_soil(
    State(state): State<AppState>,
    Json(input): Json<SoilAnalysisRequest>,
) -> AppResult<Json<SoilAnalysisResponse>> {
    let service = SoilAnalysisService::new(state.reference.current().await);
    let response = service.analyze(input)?;
    Ok(Json(response))
}

/// Quick soil test from a pH reading
pub async fn quick_soil_test(
    State(state): State<AppState>,
    Query(params): Query<QuickTestParams>,
) -> AppResult<Json<SoilAnalysisResponse>> {
    let service = SoilAnalysisService::new(state.reference.current().await);
    let response = service.quick_test(params.ph, &params.crop)?;
    Ok(Json(response))
}

/// Current fertilizer prices
pub async fn get_fertilizer_prices(State(state): State<AppState>) -> Json<FertilizerPrices> {
    let service = SoilAnalysisService::new(state.reference.current().await);
    Json(service.fertilizer_prices())
}

/// Soil and nutrient requirements for a crop
pub async fn get_crop_requirements(
    State(state): State<AppState>,
    Path(crop): Path<String>,
) -> AppResult<Json<CropRequirements>> {
    let service = SoilAnalysisService::new(state.reference.current().await);
    let requirements = service.crop_requirements(&crop)?;
    Ok(Json(requirements))
}

/// pH band for a reading
pub async fn get_ph_category(
    State(state): State<AppState>,
    Query(params): Query<PhParams>,
) -> AppResult<Json<PhCategoryInfo>> {
    let service = SoilAnalysisService::new(state.reference.current().await);
    let info = service.ph_category(params.ph)?;
    Ok(Json(info))
}
