//! WebAssembly module for the FarmGuard platform
//!
//! Provides offline, client-side computation for:
//! - pH classification and soil health scoring
//! - Nutrient deficit calculation
//! - Fertilizer recommendation and application scheduling
//!
//! Structured values cross the boundary as JSON strings. Every call runs
//! against the built-in reference tables.

use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

fn reference() -> &'static shared::ReferenceData {
    static TABLES: OnceLock<shared::ReferenceData> = OnceLock::new();
    TABLES.get_or_init(shared::ReferenceData::builtin)
}

fn parse<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Classify a pH reading into its named band ("unknown" outside 3.0-11.0)
#[wasm_bindgen]
pub fn categorize_soil_ph(ph: f64) -> String {
    shared::categorize_ph(reference(), ph).to_string()
}

/// Score a soil test (JSON `SoilTestResult`) for a crop
#[wasm_bindgen]
pub fn analyze_soil(soil_json: &str, crop: &str) -> Result<String, JsValue> {
    analyze(soil_json, crop).map_err(js_error)
}

/// Nutrient deficit in kg/ha for a crop, optionally scaled to a target yield
/// and adjusted for a region
#[wasm_bindgen]
pub fn calculate_deficit(
    crop: &str,
    soil_json: &str,
    target_yield: Option<f64>,
    region: Option<String>,
) -> Result<String, JsValue> {
    deficit(crop, soil_json, target_yield, region.as_deref()).map_err(js_error)
}

/// Product recommendations for a JSON `NutrientDeficit`
#[wasm_bindgen]
pub fn recommend(deficit_json: &str, budget: Option<f64>, organic_only: bool) -> Result<String, JsValue> {
    recommendations(deficit_json, budget, organic_only).map_err(js_error)
}

/// Dated application schedule for a JSON list of recommendations.
///
/// `planting_date` is `YYYY-MM-DD`; when omitted the browser's current date
/// is used.
#[wasm_bindgen]
pub fn build_schedule(
    crop: &str,
    recommendations_json: &str,
    planting_date: Option<String>,
) -> Result<String, JsValue> {
    let planting = match planting_date {
        Some(date) => parse_date(&date).map_err(js_error)?,
        None => today().ok_or_else(|| js_error("Could not read the current date".to_string()))?,
    };
    schedule(crop, recommendations_json, planting).map_err(js_error)
}

fn analyze(soil_json: &str, crop: &str) -> Result<String, String> {
    let soil: SoilTestResult = parse("soil", soil_json)?;
    let result = shared::score_soil_health(reference(), &soil, crop).map_err(|e| e.to_string())?;
    to_json(&result)
}

fn deficit(crop: &str, soil_json: &str, target_yield: Option<f64>, region: Option<&str>) -> Result<String, String> {
    let soil: SoilTestResult = parse("soil", soil_json)?;
    let deficit = shared::calculate_nutrient_deficit(reference(), crop, &soil, target_yield, region)
        .map_err(|e| e.to_string())?;
    to_json(&deficit)
}

fn recommendations(deficit_json: &str, budget: Option<f64>, organic_only: bool) -> Result<String, String> {
    let deficit: NutrientDeficit = parse("deficit", deficit_json)?;
    let program =
        shared::recommend_fertilizers(reference(), &deficit, budget, organic_only).map_err(|e| e.to_string())?;
    to_json(&program)
}

fn schedule(crop: &str, recommendations_json: &str, planting: NaiveDate) -> Result<String, String> {
    let program: Vec<FertilizerRecommendation> = parse("recommendations", recommendations_json)?;
    let entries =
        shared::build_application_schedule(reference(), crop, &program, planting).map_err(|e| e.to_string())?;
    to_json(&entries)
}

fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| format!("Invalid planting date '{}': {}", date, e))
}

fn today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}
