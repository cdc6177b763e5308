//! Fertilizer calculator service
//!
//! Nutrient deficit, product selection, application schedule and
//! cost-benefit, plus a `plan` that chains all four.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{
    build_application_schedule, calculate_nutrient_deficit, estimate_cost_benefit, recommend_fertilizers,
    round_to, total_cost, ApplicationScheduleEntry, CostBenefitResult, FertilizerRecommendation, NutrientDeficit,
    ReferenceData, SoilTestResult,
};
use validator::Validate;

use crate::error::AppResult;

/// Fertilizer calculator over one reference-table snapshot
#[derive(Clone)]
pub struct FertilizerService {
    reference: Arc<ReferenceData>,
}

/// Input for a nutrient deficit calculation
#[derive(Debug, Deserialize, Validate)]
pub struct RequirementsRequest {
    #[validate(length(min = 1, max = 64))]
    pub crop: String,
    pub soil_data: SoilTestResult,
    /// t/ha
    pub target_yield: Option<f64>,
    #[validate(length(max = 64))]
    pub region: Option<String>,
}

/// Input for product selection
#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub deficit: NutrientDeficit,
    /// INR per hectare
    pub budget: Option<f64>,
    #[serde(default)]
    pub organic_only: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<FertilizerRecommendation>,
    /// INR per hectare
    pub total_cost: f64,
}

/// Input for an application schedule
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleRequest {
    #[validate(length(min = 1, max = 64))]
    pub crop: String,
    pub recommendations: Vec<FertilizerRecommendation>,
    pub planting_date: NaiveDate,
}

/// Input for a cost-benefit estimate
#[derive(Debug, Deserialize, Validate)]
pub struct CostBenefitRequest {
    #[validate(length(min = 1, max = 64))]
    pub crop: String,
    pub recommendations: Vec<FertilizerRecommendation>,
    /// Hectares
    pub farm_size: f64,
    /// INR per tonne of produce
    pub price_per_unit: f64,
}

/// Input for a complete fertilizer plan
#[derive(Debug, Deserialize, Validate)]
pub struct PlanRequest {
    #[validate(length(min = 1, max = 64))]
    pub crop: String,
    pub soil_data: SoilTestResult,
    pub target_yield: Option<f64>,
    #[validate(length(max = 64))]
    pub region: Option<String>,
    pub budget: Option<f64>,
    #[serde(default)]
    pub organic_only: bool,
    pub planting_date: NaiveDate,
    /// Cost-benefit is included when both farm size and output price are given
    pub farm_size: Option<f64>,
    pub price_per_unit: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FertilizerPlan {
    pub crop: String,
    pub deficit: NutrientDeficit,
    pub recommendations: Vec<FertilizerRecommendation>,
    pub cost_per_hectare: f64,
    pub schedule: Vec<ApplicationScheduleEntry>,
    pub cost_benefit: Option<CostBenefitResult>,
}

impl FertilizerService {
    /// Create a new FertilizerService instance
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self { reference }
    }

    /// Calculate the N/P/K deficit for a crop and soil test
    pub fn requirements(&self, request: RequirementsRequest) -> AppResult<NutrientDeficit> {
        request.validate()?;
        let deficit = calculate_nutrient_deficit(
            &self.reference,
            &request.crop,
            &request.soil_data,
            request.target_yield,
            request.region.as_deref(),
        )?;

        tracing::debug!(
            crop = %request.crop,
            region = ?request.region,
            n = deficit.nitrogen,
            p = deficit.phosphorus,
            k = deficit.potassium,
            "Nutrient deficit calculated"
        );
        Ok(deficit)
    }

    /// Select products for a deficit
    pub fn recommendations(&self, request: RecommendationsRequest) -> AppResult<RecommendationsResponse> {
        let recommendations = self.select(&request.deficit, request.budget, request.organic_only)?;
        Ok(RecommendationsResponse {
            total_cost: round_to(total_cost(&recommendations), 2),
            recommendations,
        })
    }

    /// Dated application schedule for a program
    pub fn schedule(&self, request: ScheduleRequest) -> AppResult<Vec<ApplicationScheduleEntry>> {
        request.validate()?;
        let schedule = build_application_schedule(
            &self.reference,
            &request.crop,
            &request.recommendations,
            request.planting_date,
        )?;

        tracing::debug!(crop = %request.crop, entries = schedule.len(), "Application schedule built");
        Ok(schedule)
    }

    /// Whole-farm economics of a program
    pub fn cost_benefit(&self, request: CostBenefitRequest) -> AppResult<CostBenefitResult> {
        request.validate()?;
        let result = estimate_cost_benefit(
            &self.reference,
            &request.recommendations,
            &request.crop,
            request.farm_size,
            request.price_per_unit,
        )?;

        tracing::info!(
            crop = %request.crop,
            cost = result.total_fertilizer_cost,
            net_benefit = result.net_benefit,
            roi = result.return_on_investment,
            "Cost-benefit estimated"
        );
        Ok(result)
    }

    /// Deficit, products, schedule and optional cost-benefit in one pass
    pub fn plan(&self, request: PlanRequest) -> AppResult<FertilizerPlan> {
        request.validate()?;
        let deficit = calculate_nutrient_deficit(
            &self.reference,
            &request.crop,
            &request.soil_data,
            request.target_yield,
            request.region.as_deref(),
        )?;
        let recommendations = self.select(&deficit, request.budget, request.organic_only)?;
        let schedule =
            build_application_schedule(&self.reference, &request.crop, &recommendations, request.planting_date)?;

        let cost_benefit = match (request.farm_size, request.price_per_unit) {
            (Some(farm_size), Some(price)) => Some(estimate_cost_benefit(
                &self.reference,
                &recommendations,
                &request.crop,
                farm_size,
                price,
            )?),
            _ => None,
        };

        tracing::info!(
            crop = %request.crop,
            products = recommendations.len(),
            applications = schedule.len(),
            "Fertilizer plan built"
        );

        Ok(FertilizerPlan {
            crop: request.crop,
            deficit,
            cost_per_hectare: round_to(total_cost(&recommendations), 2),
            recommendations,
            schedule,
            cost_benefit,
        })
    }

    fn select(
        &self,
        deficit: &NutrientDeficit,
        budget: Option<f64>,
        organic_only: bool,
    ) -> AppResult<Vec<FertilizerRecommendation>> {
        let recommendations = recommend_fertilizers(&self.reference, deficit, budget, organic_only)?;
        tracing::debug!(
            organic_only,
            budget = ?budget,
            products = recommendations.len(),
            "Fertilizers selected"
        );
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn service() -> FertilizerService {
        FertilizerService::new(Arc::new(ReferenceData::builtin()))
    }

    fn planting() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn plan_request(farm_size: Option<f64>, price_per_unit: Option<f64>) -> PlanRequest {
        PlanRequest {
            crop: "rice".to_string(),
            soil_data: SoilTestResult::new(6.2, 80.0, 12.0, 120.0, 1.8),
            target_yield: None,
            region: Some("punjab".to_string()),
            budget: None,
            organic_only: false,
            planting_date: planting(),
            farm_size,
            price_per_unit,
        }
    }

    #[test]
    fn requirements_reports_deficit() {
        let deficit = service()
            .requirements(RequirementsRequest {
                crop: "rice".to_string(),
                soil_data: SoilTestResult::new(6.2, 400.0, 12.0, 120.0, 1.8),
                target_yield: None,
                region: None,
            })
            .unwrap();
        assert_eq!(deficit.nitrogen, 0.0);
        assert!(deficit.phosphorus > 0.0);
    }

    #[test]
    fn recommendations_total_matches_items() {
        let response = service()
            .recommendations(RecommendationsRequest {
                deficit: NutrientDeficit::new(60.0, 40.0, 30.0),
                budget: Some(500.0),
                organic_only: false,
            })
            .unwrap();
        assert!(response.total_cost <= 500.0);
        assert!(!response.recommendations.is_empty());
    }

    #[test]
    fn plan_chains_every_step() {
        let plan = service().plan(plan_request(Some(2.0), Some(22_000.0))).unwrap();

        assert!(!plan.recommendations.is_empty());
        assert!(!plan.schedule.is_empty());
        assert!(plan.schedule.windows(2).all(|w| w[0].days_after_planting <= w[1].days_after_planting));
        let economics = plan.cost_benefit.unwrap();
        assert!((economics.total_fertilizer_cost - plan.cost_per_hectare * 2.0).abs() < 0.05);
    }

    #[test]
    fn plan_skips_economics_without_price() {
        let plan = service().plan(plan_request(Some(2.0), None)).unwrap();
        assert!(plan.cost_benefit.is_none());
    }

    #[test]
    fn unknown_crop_in_schedule() {
        let err = service()
            .schedule(ScheduleRequest {
                crop: "teff".to_string(),
                recommendations: Vec::new(),
                planting_date: planting(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::UnknownCrop(_)));
    }

    #[test]
    fn cost_benefit_rejects_empty_crop_name() {
        let err = service()
            .cost_benefit(CostBenefitRequest {
                crop: String::new(),
                recommendations: Vec::new(),
                farm_size: 1.0,
                price_per_unit: 100.0,
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "crop"));
    }
}
