//! Whole-farm cost-benefit estimate for a fertilizer program

use crate::error::AgronomyResult;
use crate::models::{CostBenefitResult, FertilizerRecommendation, PaybackPeriod};
use crate::recommendation::total_cost;
use crate::reference::ReferenceData;
use crate::types::round_to;
use crate::validation::{validate_farm_size, validate_non_negative};

/// Yield gain over the crop average assumed when the program is followed
pub const YIELD_UPLIFT: f64 = 0.25;

/// Estimate costs and returns of a per-hectare program over `farm_size_ha`.
///
/// `price_per_unit` is the expected farm-gate price per tonne of produce.
pub fn estimate_cost_benefit(
    reference: &ReferenceData,
    recommendations: &[FertilizerRecommendation],
    crop_id: &str,
    farm_size_ha: f64,
    price_per_unit: f64,
) -> AgronomyResult<CostBenefitResult> {
    validate_farm_size(farm_size_ha)?;
    validate_non_negative("price_per_unit", price_per_unit)?;
    let crop = reference.crop(crop_id)?;

    let total_fertilizer_cost = total_cost(recommendations) * farm_size_ha;
    let additional_yield = crop.average_yield * YIELD_UPLIFT * farm_size_ha;
    let additional_revenue = additional_yield * price_per_unit;
    let net_benefit = additional_revenue - total_fertilizer_cost;

    let return_on_investment = if total_fertilizer_cost > 0.0 {
        net_benefit / total_fertilizer_cost * 100.0
    } else {
        0.0
    };
    let payback_period = if net_benefit > 0.0 {
        PaybackPeriod::WithinCurrentSeason
    } else {
        PaybackPeriod::NotProfitable
    };
    let break_even_price = if additional_yield > 0.0 {
        total_fertilizer_cost / additional_yield
    } else {
        0.0
    };

    Ok(CostBenefitResult {
        total_fertilizer_cost: round_to(total_fertilizer_cost, 2),
        expected_additional_yield: round_to(additional_yield, 2),
        additional_revenue: round_to(additional_revenue, 2),
        net_benefit: round_to(net_benefit, 2),
        return_on_investment: round_to(return_on_investment, 1),
        payback_period,
        break_even_price: round_to(break_even_price, 2),
    })
}
