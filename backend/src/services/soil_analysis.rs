//! Soil analysis service
//!
//! Wraps the soil health scorer with farm-level costing, the budget filter and
//! the yield and environmental outlook.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::{
    assess_environmental_impact, categorize_ph, expected_yield_improvement, fit_needs_to_budget, round_to,
    score_soil_health, validate_budget, validate_farm_size, CropProfile, EnvironmentalImpact, PhCategory,
    ReferenceData, SoilAnalysisResult, SoilTestResult,
};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Soil analysis service over one reference-table snapshot
#[derive(Clone)]
pub struct SoilAnalysisService {
    reference: Arc<ReferenceData>,
}

/// Input for a full soil analysis
#[derive(Debug, Deserialize, Validate)]
pub struct SoilAnalysisRequest {
    pub soil_data: SoilTestResult,
    #[validate(length(min = 1, max = 64))]
    pub target_crop: String,
    /// Hectares
    pub farm_size: f64,
    /// INR for the whole farm
    pub budget: Option<f64>,
    #[serde(default = "default_season")]
    #[validate(length(max = 32))]
    pub season: Option<String>,
}

fn default_season() -> Option<String> {
    Some("current".to_string())
}

/// Soil analysis with farm-level costing
#[derive(Debug, Serialize)]
pub struct SoilAnalysisResponse {
    pub analysis: SoilAnalysisResult,
    /// INR for the whole farm, after any budget filter
    pub total_cost: f64,
    /// Percent
    pub expected_yield_improvement: f64,
    pub environmental_impact: EnvironmentalImpact,
    pub season: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FertilizerPrices {
    pub prices: BTreeMap<String, f64>,
    pub currency: String,
    pub unit: String,
    pub reference_version: String,
}

#[derive(Debug, Serialize)]
pub struct CropRequirements {
    pub crop: String,
    pub requirements: CropProfile,
    pub optimal_conditions: String,
}

#[derive(Debug, Serialize)]
pub struct PhCategoryInfo {
    pub ph: f64,
    pub category: PhCategory,
    pub typical_crops: Vec<String>,
    pub issues: Vec<String>,
}

impl SoilAnalysisService {
    /// Create a new SoilAnalysisService instance
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }

    /// Analyze a soil test for a target crop
    pub fn analyze(&self, request: SoilAnalysisRequest) -> AppResult<SoilAnalysisResponse> {
        request.validate()?;
        validate_farm_size(request.farm_size)?;
        validate_budget(request.budget)?;

        let mut analysis = score_soil_health(&self.reference, &request.soil_data, &request.target_crop)?;

        let mut total_cost =
            analysis.fertilizer_needs.iter().map(|n| n.cost_per_hectare).sum::<f64>() * request.farm_size;

        if let Some(budget) = request.budget.filter(|b| total_cost > *b) {
            let needed = analysis.fertilizer_needs.len();
            let (admitted, admitted_cost) =
                fit_needs_to_budget(&analysis.fertilizer_needs, request.farm_size, budget);

            if admitted.len() < needed {
                tracing::warn!(
                    crop = %request.target_crop,
                    budget,
                    admitted = admitted.len(),
                    needed,
                    "Fertilizer needs exceed budget"
                );
                analysis.warnings.push(format!(
                    "Budget constraint: Only {} of {} fertilizer recommendations fit within budget",
                    admitted.len(),
                    needed
                ));
            }
            analysis.fertilizer_needs = admitted;
            total_cost = admitted_cost;
        }

        let expected_yield_improvement =
            expected_yield_improvement(analysis.health_score, analysis.fertilizer_needs.len());
        let environmental_impact = assess_environmental_impact(&analysis, request.soil_data.organic_matter);

        tracing::info!(
            crop = %request.target_crop,
            ph = request.soil_data.ph,
            health_score = analysis.health_score,
            status = %analysis.fertility_status,
            needs = analysis.fertilizer_needs.len(),
            "Soil analysis complete"
        );

        Ok(SoilAnalysisResponse {
            analysis,
            total_cost: round_to(total_cost, 2),
            expected_yield_improvement,
            environmental_impact,
            season: request.season,
        })
    }

    /// Analyze a representative one-hectare sample synthesized from pH alone
    pub fn quick_test(&self, ph: f64, crop: &str) -> AppResult<SoilAnalysisResponse> {
        let soil_data = SoilTestResult::representative_for_ph(ph);
        tracing::debug!(ph, crop, "Running quick soil test");

        self.analyze(SoilAnalysisRequest {
            soil_data,
            target_crop: crop.to_string(),
            farm_size: 1.0,
            budget: None,
            season: default_season(),
        })
    }

    /// Current catalog prices
    pub fn fertilizer_prices(&self) -> FertilizerPrices {
        FertilizerPrices {
            prices: self.reference.prices(),
            currency: "INR".to_string(),
            unit: "per kg".to_string(),
            reference_version: self.reference.version.clone(),
        }
    }

    /// pH window and nutrient targets for one crop
    pub fn crop_requirements(&self, crop: &str) -> AppResult<CropRequirements> {
        let profile = self.reference.crop(crop)?;
        Ok(CropRequirements {
            crop: profile.id.clone(),
            optimal_conditions: format!(
                "pH {}, NPK {}-{}-{}",
                profile.ph_range, profile.nitrogen, profile.phosphorus, profile.potassium
            ),
            requirements: profile.clone(),
        })
    }

    /// Named pH band for a reading
    pub fn ph_category(&self, ph: f64) -> AppResult<PhCategoryInfo> {
        if !ph.is_finite() {
            return Err(AppError::Validation {
                field: "ph".to_string(),
                message: "pH must be a number".to_string(),
            });
        }
        let category = categorize_ph(&self.reference, ph);
        let band = self.reference.ph_bands.iter().find(|b| b.category == category);

        Ok(PhCategoryInfo {
            ph,
            category,
            typical_crops: band.map(|b| b.typical_crops.clone()).unwrap_or_default(),
            issues: band.map(|b| b.issues.clone()).unwrap_or_default(),
        })
    }
}
