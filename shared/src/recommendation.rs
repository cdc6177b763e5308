//! Fertilizer product selection
//!
//! Turns an elemental N/P/K deficit into a list of catalog products with
//! amounts in kg/ha. Phosphorus and potassium are converted to the oxide basis
//! (P₂O₅, K₂O) before products are sized.

use std::cmp::Ordering;

use crate::error::AgronomyResult;
use crate::models::{FertilizerProduct, FertilizerRecommendation, NutrientDeficit};
use crate::reference::{product_ids, ReferenceData};
use crate::types::{K_TO_K2O, P_TO_P2O5};
use crate::validation::validate_budget;

/// Minimum organic baseline, kg/ha (5 t)
pub const COMPOST_BASELINE_KG: f64 = 5000.0;

/// Compost rate per kg of total oxide-basis need
pub const COMPOST_KG_PER_NUTRIENT_KG: f64 = 200.0;

/// Residual needs below this (kg/ha) are rounding noise, not a shortfall
const NEGLIGIBLE_KG: f64 = 1e-6;

/// kg of product needed to deliver `need` kg of a nutrient present at
/// `content_pct`. `None` when the product carries none of it.
fn amount_for(need: f64, content_pct: f64) -> Option<f64> {
    (content_pct > 0.0).then(|| need / (content_pct / 100.0))
}

/// Recommend fertilizer products for a nutrient deficit.
///
/// The mineral program sizes DAP to whichever of P₂O₅ or N it would satisfy
/// first, covers the remaining N with urea and K₂O with muriate of potash.
/// The organic program applies at least five tonnes of compost and tops up any
/// nitrogen gap with vermicompost.
///
/// With a budget, an over-budget program is re-ranked by P₂O₅, then N, then
/// K₂O supplied, and whole products are admitted while the running cost stays
/// within the budget. An all-zero deficit yields an empty program.
pub fn recommend_fertilizers(
    reference: &ReferenceData,
    deficit: &NutrientDeficit,
    budget: Option<f64>,
    organic_only: bool,
) -> AgronomyResult<Vec<FertilizerRecommendation>> {
    validate_budget(budget)?;
    let deficit = &NutrientDeficit::new(deficit.nitrogen, deficit.phosphorus, deficit.potassium);
    if deficit.is_zero() {
        return Ok(Vec::new());
    }

    let recommendations = if organic_only {
        organic_program(reference, deficit)?
    } else {
        mineral_program(reference, deficit)?
    };

    Ok(match budget {
        Some(limit) if total_cost(&recommendations) > limit => fit_to_budget(recommendations, limit),
        _ => recommendations,
    })
}

/// Summed per-hectare cost of a program
pub fn total_cost(recommendations: &[FertilizerRecommendation]) -> f64 {
    recommendations.iter().map(|r| r.cost).sum()
}

fn mineral_program(
    reference: &ReferenceData,
    deficit: &NutrientDeficit,
) -> AgronomyResult<Vec<FertilizerRecommendation>> {
    let mut n_needed = deficit.nitrogen;
    let p2o5_needed = deficit.phosphorus * P_TO_P2O5;
    let k2o_needed = deficit.potassium * K_TO_K2O;
    let mut program = Vec::new();

    if p2o5_needed > 0.0 {
        let dap = reference.fertilizer(product_ids::DAP)?;
        let by_phosphate = amount_for(p2o5_needed, dap.p2o5_content);
        let by_nitrogen = amount_for(n_needed, dap.n_content);
        let amount = match (by_phosphate, by_nitrogen) {
            (Some(p), Some(n)) => p.min(n),
            (Some(p), None) => p,
            _ => 0.0,
        };
        if amount > 0.0 {
            let rec = FertilizerRecommendation::from_product(dap, amount);
            n_needed -= rec.nutrients_supplied.n;
            program.push(rec);
        }
    }

    if n_needed > NEGLIGIBLE_KG {
        push_sized(&mut program, reference.fertilizer(product_ids::UREA)?, n_needed, |f| f.n_content);
    }
    if k2o_needed > 0.0 {
        push_sized(&mut program, reference.fertilizer(product_ids::MOP)?, k2o_needed, |f| f.k2o_content);
    }

    Ok(program)
}

fn organic_program(
    reference: &ReferenceData,
    deficit: &NutrientDeficit,
) -> AgronomyResult<Vec<FertilizerRecommendation>> {
    let n_needed = deficit.nitrogen;
    let oxide_total = n_needed + deficit.phosphorus * P_TO_P2O5 + deficit.potassium * K_TO_K2O;

    let compost = reference.fertilizer(product_ids::COMPOST)?;
    let compost_amount = COMPOST_BASELINE_KG.max(oxide_total * COMPOST_KG_PER_NUTRIENT_KG);
    let base = FertilizerRecommendation::from_product(compost, compost_amount);
    let remaining_n = (n_needed - base.nutrients_supplied.n).max(0.0);
    let mut program = vec![base];

    if remaining_n > NEGLIGIBLE_KG {
        let vermicompost = reference.fertilizer(product_ids::VERMICOMPOST)?;
        push_sized(&mut program, vermicompost, remaining_n, |f| f.n_content);
    }

    Ok(program)
}

fn push_sized(
    program: &mut Vec<FertilizerRecommendation>,
    product: &FertilizerProduct,
    need: f64,
    content: impl Fn(&FertilizerProduct) -> f64,
) {
    if let Some(amount) = amount_for(need, content(product)) {
        program.push(FertilizerRecommendation::from_product(product, amount));
    }
}

/// Priority order used when a program has to be cut: most P₂O₅ first, then N,
/// then K₂O.
fn by_nutrient_priority(a: &FertilizerRecommendation, b: &FertilizerRecommendation) -> Ordering {
    let (a, b) = (&a.nutrients_supplied, &b.nutrients_supplied);
    b.p2o5
        .total_cmp(&a.p2o5)
        .then_with(|| b.n.total_cmp(&a.n))
        .then_with(|| b.k2o.total_cmp(&a.k2o))
}

fn fit_to_budget(mut program: Vec<FertilizerRecommendation>, limit: f64) -> Vec<FertilizerRecommendation> {
    program.sort_by(by_nutrient_priority);

    let mut running = 0.0;
    program
        .into_iter()
        .filter(|rec| {
            if running + rec.cost <= limit {
                running += rec.cost;
                true
            } else {
                false
            }
        })
        .collect()
}
