//! Cost-benefit models

use serde::{Deserialize, Serialize};

/// Qualitative payback label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaybackPeriod {
    #[serde(rename = "Within current season")]
    WithinCurrentSeason,
    #[serde(rename = "Not profitable")]
    NotProfitable,
}

impl std::fmt::Display for PaybackPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaybackPeriod::WithinCurrentSeason => write!(f, "Within current season"),
            PaybackPeriod::NotProfitable => write!(f, "Not profitable"),
        }
    }
}

/// Projected economics of a fertilizer program over a whole farm
///
/// Monetary values are rounded to 2 places, ROI to 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostBenefitResult {
    pub total_fertilizer_cost: f64,
    /// Tonnes over the whole farm
    pub expected_additional_yield: f64,
    pub additional_revenue: f64,
    pub net_benefit: f64,
    /// Percent
    pub return_on_investment: f64,
    pub payback_period: PaybackPeriod,
    /// Output price per tonne at which the program breaks even
    pub break_even_price: f64,
}
