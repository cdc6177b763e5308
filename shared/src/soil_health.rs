//! Soil health scoring
//!
//! The composite score is out of 100: pH fit for the target crop (30),
//! N/P/K levels (50) and organic matter (20). The analysis also carries
//! narrative advice, a quick single-product estimate of fertilizer needs, the
//! crops whose pH window fits the soil and a staged improvement plan.

use serde::{Deserialize, Serialize};

use crate::classification::{categorize_nutrient, categorize_ph};
use crate::error::AgronomyResult;
use crate::models::{
    classify_fertility, CropProfile, FertilizerNeed, ImprovementPlan, PhRange, SoilAnalysisResult,
    SoilTestResult,
};
use crate::reference::{product_ids, ReferenceData};
use crate::types::{round_to, Nutrient, NutrientLevel};
use crate::validation::validate_soil_test;

pub const MAX_PH_SCORE: f64 = 30.0;
pub const MAX_NUTRIENT_SCORE: f64 = 50.0;

/// Points lost per pH unit outside the crop's optimal range
const PH_PENALTY_PER_UNIT: f64 = 10.0;

/// pH component, 0-30
pub fn ph_score(optimal: &PhRange, ph: f64) -> f64 {
    if optimal.contains(ph) {
        MAX_PH_SCORE
    } else {
        (MAX_PH_SCORE - optimal.distance(ph) * PH_PENALTY_PER_UNIT).max(0.0)
    }
}

/// Points for one nutrient level; balance beats excess
fn level_points(level: NutrientLevel) -> f64 {
    match level {
        NutrientLevel::Low => 10.0,
        NutrientLevel::Medium => 16.0,
        NutrientLevel::High => 15.0,
    }
}

/// Nutrient component, 0-50
pub fn nutrient_score(levels: &[NutrientLevel]) -> f64 {
    levels
        .iter()
        .map(|l| level_points(*l))
        .sum::<f64>()
        .min(MAX_NUTRIENT_SCORE)
}

/// Organic matter component, 0-20
pub fn organic_matter_score(organic_matter: f64) -> f64 {
    if organic_matter >= 3.0 {
        20.0
    } else if organic_matter >= 1.5 {
        15.0
    } else if organic_matter >= 0.5 {
        10.0
    } else {
        5.0
    }
}

/// Score soil health for a target crop
pub fn score_soil_health(
    reference: &ReferenceData,
    soil: &SoilTestResult,
    crop_id: &str,
) -> AgronomyResult<SoilAnalysisResult> {
    validate_soil_test(soil)?;
    let crop = reference.crop(crop_id)?;
    let optimal = crop.ph_range;

    let n_level = categorize_nutrient(reference, Nutrient::Nitrogen, soil.nitrogen);
    let p_level = categorize_nutrient(reference, Nutrient::Phosphorus, soil.phosphorus);
    let k_level = categorize_nutrient(reference, Nutrient::Potassium, soil.potassium);
    let levels = [n_level, p_level, k_level];

    let total = ph_score(&optimal, soil.ph)
        + nutrient_score(&levels)
        + organic_matter_score(soil.organic_matter);
    let total = total.clamp(0.0, 100.0);
    let health_score = round_to(total, 1);

    let mut recommendations = Vec::new();
    let mut warnings = Vec::new();

    if soil.ph < optimal.min {
        recommendations.push(format!(
            "Apply lime (2-3 tons/hectare) to increase soil pH from {} to optimal range {}",
            soil.ph, optimal
        ));
        if soil.ph < 5.0 {
            warnings.push("Very acidic soil may cause aluminum toxicity".to_string());
        }
    } else if soil.ph > optimal.max {
        recommendations.push(format!(
            "Apply gypsum or organic matter to reduce soil pH from {}",
            soil.ph
        ));
        if soil.ph > 8.5 {
            warnings.push("Alkaline soil may cause micronutrient deficiency".to_string());
        }
    }

    if soil.organic_matter < 1.0 {
        recommendations.push("Increase organic matter by adding 5-10 tons of compost per hectare".to_string());
        warnings.push("Low organic matter reduces soil fertility and water retention".to_string());
    }

    if n_level == NutrientLevel::Low {
        recommendations.push("Apply nitrogen fertilizer as recommended before planting".to_string());
    }
    if p_level == NutrientLevel::Low {
        recommendations.push("Apply phosphorus fertilizer to improve root development".to_string());
    }
    if k_level == NutrientLevel::Low {
        recommendations.push("Apply potassium fertilizer to improve plant disease resistance".to_string());
    }

    let suitable_crops = reference
        .crops
        .iter()
        .filter(|c| c.ph_range.contains(soil.ph))
        .map(CropProfile::display_name)
        .collect();

    let improvement_plan = build_improvement_plan(soil, &optimal, &levels);

    Ok(SoilAnalysisResult {
        health_score,
        fertility_status: classify_fertility(total),
        ph_category: categorize_ph(reference, soil.ph),
        recommendations,
        fertilizer_needs: quick_fertilizer_needs(reference, soil, crop)?,
        suitable_crops,
        warnings,
        improvement_plan,
    })
}

fn build_improvement_plan(soil: &SoilTestResult, optimal: &PhRange, levels: &[NutrientLevel]) -> ImprovementPlan {
    let mut plan = ImprovementPlan::default();

    if !optimal.contains(soil.ph) {
        plan.immediate.push("Adjust soil pH using lime or gypsum".to_string());
    }
    if levels.contains(&NutrientLevel::Low) {
        plan.immediate.push("Apply recommended fertilizers".to_string());
    }
    if soil.organic_matter < 2.0 {
        plan.short_term.push("Increase organic matter through composting".to_string());
        plan.long_term.push("Implement crop rotation with legumes".to_string());
    }
    plan.long_term.extend([
        "Monitor soil health annually".to_string(),
        "Practice sustainable farming methods".to_string(),
        "Consider precision agriculture techniques".to_string(),
    ]);

    plan
}

/// Single-product estimate per nutrient: the gap between the crop target and
/// the soil reading, sized as product weight. This is the quick path used by
/// soil analysis, not the full calculator.
pub fn quick_fertilizer_needs(
    reference: &ReferenceData,
    soil: &SoilTestResult,
    crop: &CropProfile,
) -> AgronomyResult<Vec<FertilizerNeed>> {
    let mut needs = Vec::new();

    let n_level = categorize_nutrient(reference, Nutrient::Nitrogen, soil.nitrogen);
    let n_need = (crop.nitrogen - soil.nitrogen).max(0.0);
    if n_need > 0.0 {
        let product_id = if n_level == NutrientLevel::Low {
            product_ids::UREA
        } else {
            product_ids::BALANCED_NPK
        };
        needs.push(need(
            reference,
            Nutrient::Nitrogen,
            n_level,
            n_need * 2.17,
            product_id,
            "Split application - 50% at planting, 25% at vegetative stage, 25% at flowering",
            "Pre-planting and top dressing",
        )?);
    }

    let p_level = categorize_nutrient(reference, Nutrient::Phosphorus, soil.phosphorus);
    let p_need = (crop.phosphorus - soil.phosphorus).max(0.0);
    if p_need > 0.0 {
        let product_id = if p_level == NutrientLevel::Low {
            product_ids::DAP
        } else {
            product_ids::SSP
        };
        needs.push(need(
            reference,
            Nutrient::Phosphorus,
            p_level,
            p_need * 2.18,
            product_id,
            "Basal application at planting",
            "At sowing/transplanting",
        )?);
    }

    let k_level = categorize_nutrient(reference, Nutrient::Potassium, soil.potassium);
    let k_need = (crop.potassium - soil.potassium).max(0.0);
    if k_need > 0.0 {
        let product_id = if k_level == NutrientLevel::Low {
            product_ids::MOP
        } else {
            product_ids::BALANCED_NPK
        };
        needs.push(need(
            reference,
            Nutrient::Potassium,
            k_level,
            k_need * 1.67,
            product_id,
            "Split application - 50% basal, 50% at flowering",
            "Basal and top dressing",
        )?);
    }

    Ok(needs)
}

fn need(
    reference: &ReferenceData,
    nutrient: Nutrient,
    current_level: NutrientLevel,
    amount: f64,
    product_id: &str,
    method: &str,
    timing: &str,
) -> AgronomyResult<FertilizerNeed> {
    let product = reference.fertilizer(product_id)?;
    Ok(FertilizerNeed {
        nutrient,
        current_level,
        recommended_amount: amount,
        fertilizer_id: product.id.clone(),
        fertilizer_type: product.name.clone(),
        application_method: method.to_string(),
        timing: timing.to_string(),
        cost_per_hectare: product.cost_of(amount),
    })
}

/// Keep quick-estimate needs in priority order (phosphorus, nitrogen,
/// potassium) while the whole-farm running cost stays within `budget`.
/// Returns the admitted needs and their whole-farm cost.
pub fn fit_needs_to_budget(
    needs: &[FertilizerNeed],
    farm_size: f64,
    budget: f64,
) -> (Vec<FertilizerNeed>, f64) {
    const PRIORITY: [Nutrient; 3] = [Nutrient::Phosphorus, Nutrient::Nitrogen, Nutrient::Potassium];

    let mut admitted = Vec::new();
    let mut running_cost = 0.0;
    for nutrient in PRIORITY {
        for need in needs.iter().filter(|n| n.nutrient == nutrient) {
            let cost = need.cost_per_hectare * farm_size;
            if running_cost + cost <= budget {
                admitted.push(need.clone());
                running_cost += cost;
            }
        }
    }
    (admitted, running_cost)
}

/// Expected yield gain in percent: up to 25 from closing the health gap plus
/// 5 per nutrient still needing fertilizer, capped at 40.
pub fn expected_yield_improvement(health_score: f64, remaining_needs: usize) -> f64 {
    let base = ((100.0 - health_score) * 0.5).min(25.0);
    let from_fertilizer = remaining_needs as f64 * 5.0;
    round_to((base + from_fertilizer).min(40.0), 1)
}

/// Qualitative environmental outlook of a soil
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentalImpact {
    pub water_retention: String,
    pub nutrient_runoff_risk: String,
    pub carbon_sequestration: String,
    pub biodiversity_impact: String,
}

pub fn assess_environmental_impact(analysis: &SoilAnalysisResult, organic_matter: f64) -> EnvironmentalImpact {
    let score = analysis.health_score;
    let label = |s: &str| s.to_string();

    EnvironmentalImpact {
        water_retention: if score > 60.0 { label("Improved") } else { label("Needs improvement") },
        nutrient_runoff_risk: if score > 70.0 {
            label("Low")
        } else if score > 50.0 {
            label("Medium")
        } else {
            label("High")
        },
        carbon_sequestration: if organic_matter > 2.0 { label("Good") } else { label("Poor") },
        biodiversity_impact: if analysis.warnings.is_empty() {
            label("Positive")
        } else {
            label("Neutral")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgronomyError;
    use crate::models::FertilityStatus;

    fn reference() -> ReferenceData {
        ReferenceData::builtin()
    }

    #[test]
    fn balanced_rice_soil_scores_excellent() {
        let soil = SoilTestResult::new(6.5, 150.0, 20.0, 160.0, 2.0);
        let analysis = score_soil_health(&reference(), &soil, "rice").unwrap();
        // 30 (pH) + 10 + 16 + 16 (N low, P/K medium) + 15 (OM)
        assert_eq!(analysis.health_score, 87.0);
        assert_eq!(analysis.fertility_status, FertilityStatus::Excellent);
        assert!(analysis.suitable_crops.contains(&"Rice".to_string()));
    }

    #[test]
    fn status_uses_unrounded_total() {
        // 29.951 (pH) + 30 (all low) + 20 (OM) = 79.951
        let soil = SoilTestResult::new(5.4951, 100.0, 10.0, 100.0, 3.0);
        let analysis = score_soil_health(&reference(), &soil, "rice").unwrap();
        assert_eq!(analysis.health_score, 80.0);
        assert_eq!(analysis.fertility_status, FertilityStatus::Good);
    }

    #[test]
    fn ph_penalty_is_ten_points_per_unit() {
        let range = PhRange::new(5.5, 7.0);
        assert_eq!(ph_score(&range, 6.0), 30.0);
        assert!((ph_score(&range, 4.0) - 15.0).abs() < 1e-9);
        assert_eq!(ph_score(&range, 3.0), 5.0);
        assert_eq!(ph_score(&PhRange::new(6.0, 7.5), 10.6), 0.0);
    }

    #[test]
    fn very_acidic_soil_warns_of_aluminum() {
        let soil = SoilTestResult::new(4.0, 150.0, 20.0, 160.0, 2.0);
        let analysis = score_soil_health(&reference(), &soil, "rice").unwrap();
        assert!(analysis.warnings.iter().any(|w| w.contains("aluminum toxicity")));
        assert!(analysis.recommendations.iter().any(|r| r.starts_with("Apply lime")));
        assert!(analysis
            .improvement_plan
            .immediate
            .contains(&"Adjust soil pH using lime or gypsum".to_string()));
    }

    #[test]
    fn alkaline_soil_recommends_gypsum() {
        let soil = SoilTestResult::new(9.0, 200.0, 20.0, 200.0, 2.0);
        let analysis = score_soil_health(&reference(), &soil, "wheat").unwrap();
        assert!(analysis.recommendations[0].starts_with("Apply gypsum"));
        assert!(analysis.warnings.iter().any(|w| w.contains("micronutrient")));
    }

    #[test]
    fn low_organic_matter_flags_compost() {
        let soil = SoilTestResult::new(6.5, 200.0, 20.0, 200.0, 0.4);
        let analysis = score_soil_health(&reference(), &soil, "maize").unwrap();
        assert!(analysis.recommendations.iter().any(|r| r.contains("compost")));
        assert_eq!(analysis.warnings.len(), 1);
        assert_eq!(organic_matter_score(0.4), 5.0);
        assert!(analysis
            .improvement_plan
            .long_term
            .contains(&"Implement crop rotation with legumes".to_string()));
    }

    #[test]
    fn nutrient_score_favors_medium_over_high() {
        let medium = nutrient_score(&[NutrientLevel::Medium; 3]);
        let high = nutrient_score(&[NutrientLevel::High; 3]);
        assert_eq!(medium, 48.0);
        assert_eq!(high, 45.0);
        assert!(medium > high);
    }

    #[test]
    fn unknown_crop_rejected() {
        let soil = SoilTestResult::new(6.5, 150.0, 20.0, 160.0, 2.0);
        assert_eq!(
            score_soil_health(&reference(), &soil, "barley"),
            Err(AgronomyError::UnknownCrop("barley".to_string()))
        );
    }

    #[test]
    fn invalid_soil_rejected_before_scoring() {
        let soil = SoilTestResult::new(12.0, 150.0, 20.0, 160.0, 2.0);
        assert!(matches!(
            score_soil_health(&reference(), &soil, "rice"),
            Err(AgronomyError::InvalidSoilInput { .. })
        ));
    }

    #[test]
    fn quick_needs_pick_products_by_level() {
        let data = reference();
        let soil = SoilTestResult::new(6.0, 80.0, 10.0, 100.0, 1.5);
        let wheat = data.crop("wheat").unwrap();
        let needs = quick_fertilizer_needs(&data, &soil, wheat).unwrap();

        // potassium target of 40 is already covered by the 100 kg/ha reading
        let ids: Vec<&str> = needs.iter().map(|n| n.fertilizer_id.as_str()).collect();
        assert_eq!(ids, vec!["urea", "dap"]);

        let urea = &needs[0];
        assert!((urea.recommended_amount - 40.0 * 2.17).abs() < 1e-9);
        assert!((urea.cost_per_hectare - 40.0 * 2.17 * 6.5).abs() < 1e-9);
        assert!(needs.iter().all(|n| n.cost_per_hectare > 0.0));
    }

    #[test]
    fn budget_fit_prefers_phosphorus() {
        let data = reference();
        let soil = SoilTestResult::new(5.8, 50.0, 8.0, 20.0, 1.2);
        let cotton = data.crop("cotton").unwrap();
        let needs = quick_fertilizer_needs(&data, &soil, cotton).unwrap();
        assert_eq!(needs.len(), 3);

        let phosphorus_cost = needs[1].cost_per_hectare;
        let (admitted, cost) = fit_needs_to_budget(&needs, 1.0, phosphorus_cost + 1.0);
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].nutrient, Nutrient::Phosphorus);
        assert!(cost <= phosphorus_cost + 1.0);
    }

    #[test]
    fn yield_improvement_is_capped() {
        assert_eq!(expected_yield_improvement(87.0, 0), 6.5);
        assert_eq!(expected_yield_improvement(20.0, 3), 40.0);
        assert_eq!(expected_yield_improvement(100.0, 1), 5.0);
    }

    #[test]
    fn environmental_impact_labels() {
        let soil = SoilTestResult::new(6.5, 150.0, 20.0, 160.0, 2.5);
        let analysis = score_soil_health(&reference(), &soil, "rice").unwrap();
        let impact = assess_environmental_impact(&analysis, soil.organic_matter);
        assert_eq!(impact.water_retention, "Improved");
        assert_eq!(impact.nutrient_runoff_risk, "Low");
        assert_eq!(impact.carbon_sequestration, "Good");
        assert_eq!(impact.biodiversity_impact, "Positive");
    }
}
