//! Nutrient requirement (deficit) calculation
//!
//! Starting from the crop's N/P/K targets, the soil test credit is removed and
//! the result is scaled by a fixed sequence of factors: soil availability, pH,
//! organic matter (N only), yield target and region. The order is pinned so
//! results are reproducible to the last bit.

use crate::error::AgronomyResult;
use crate::models::{CropProfile, NutrientDeficit, SoilTestResult};
use crate::reference::ReferenceData;
use crate::validation::{validate_non_negative, validate_soil_test};

/// Share of the soil's available N the crop can actually use
pub const SOIL_N_EFFICIENCY: f64 = 0.6;

/// Target yields are never allowed to scale the deficit beyond this
pub const MAX_YIELD_FACTOR: f64 = 2.0;

/// Fraction of the phosphorus target still needed, by Olsen-P reading
pub fn phosphorus_need_fraction(available_p: f64) -> f64 {
    if available_p < 10.0 {
        1.0
    } else if available_p < 25.0 {
        0.7
    } else {
        0.3
    }
}

/// Fraction of the potassium target still needed, by exchangeable K
pub fn potassium_need_fraction(available_k: f64) -> f64 {
    if available_k < 110.0 {
        1.0
    } else if available_k < 280.0 {
        0.7
    } else {
        0.3
    }
}

/// Fertilizer-use efficiency factor for soil pH. Applies to all three
/// nutrients.
pub fn ph_adjustment_factor(ph: f64) -> f64 {
    if (6.0..=7.5).contains(&ph) {
        1.0
    } else if ph < 5.5 {
        0.7
    } else if ph > 8.0 {
        0.8
    } else {
        0.9
    }
}

/// Nitrogen factor for soil organic matter (%)
pub fn organic_matter_factor(organic_matter: f64) -> f64 {
    if organic_matter > 2.5 {
        0.8
    } else if organic_matter < 1.0 {
        1.2
    } else {
        1.0
    }
}

/// Yield-target multiplier relative to the crop's average yield, capped at 2x
pub fn yield_factor(crop: &CropProfile, target_yield: f64) -> f64 {
    (target_yield / crop.average_yield).min(MAX_YIELD_FACTOR)
}

/// Calculate the N/P/K fertilizer deficit for a crop, kg/ha.
///
/// Unknown regions are ignored (factor 1.0). Any supplied target yield
/// scales the deficit, so a zero target needs nothing.
pub fn calculate_nutrient_deficit(
    reference: &ReferenceData,
    crop_id: &str,
    soil: &SoilTestResult,
    target_yield: Option<f64>,
    region: Option<&str>,
) -> AgronomyResult<NutrientDeficit> {
    validate_soil_test(soil)?;
    let crop = reference.crop(crop_id)?;
    if let Some(target) = target_yield {
        validate_non_negative("target_yield", target)?;
    }

    let mut n = (crop.nitrogen - soil.nitrogen * SOIL_N_EFFICIENCY).max(0.0);
    let mut p = crop.phosphorus * phosphorus_need_fraction(soil.phosphorus);
    let mut k = crop.potassium * potassium_need_fraction(soil.potassium);

    let ph_factor = ph_adjustment_factor(soil.ph);
    n *= ph_factor;
    p *= ph_factor;
    k *= ph_factor;

    n *= organic_matter_factor(soil.organic_matter);

    if let Some(target) = target_yield {
        let factor = yield_factor(crop, target);
        n *= factor;
        p *= factor;
        k *= factor;
    }

    if let Some(factors) = region.and_then(|r| reference.region(r)) {
        n *= factors.mobile_nutrient_factor();
        p *= factors.soil_factor;
        k *= factors.mobile_nutrient_factor();
    }

    Ok(NutrientDeficit::new(n, p, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgronomyError;

    fn soil() -> SoilTestResult {
        SoilTestResult::new(6.2, 80.0, 12.0, 120.0, 1.8)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn baseline_rice_deficit() {
        let data = ReferenceData::builtin();
        let deficit = calculate_nutrient_deficit(&data, "rice", &soil(), None, None).unwrap();
        // N: 120 - 80*0.6 = 72; P medium (12) -> 60*0.7; K medium (120) -> 40*0.7
        assert!(close(deficit.nitrogen, 72.0));
        assert!(close(deficit.phosphorus, 42.0));
        assert!(close(deficit.potassium, 28.0));
    }

    #[test]
    fn nitrogen_surplus_gives_zero_not_credit() {
        let data = ReferenceData::builtin();
        let mut rich = soil();
        rich.nitrogen = 400.0;
        let deficit = calculate_nutrient_deficit(&data, "rice", &rich, None, None).unwrap();
        assert_eq!(deficit.nitrogen, 0.0);
        assert!(deficit.phosphorus > 0.0);
    }

    #[test]
    fn acidic_soil_and_low_organic_matter() {
        let data = ReferenceData::builtin();
        let s = SoilTestResult::new(5.0, 0.0, 5.0, 50.0, 0.5);
        let deficit = calculate_nutrient_deficit(&data, "maize", &s, None, None).unwrap();
        assert!(close(deficit.nitrogen, 120.0 * 0.7 * 1.2));
        assert!(close(deficit.phosphorus, 60.0 * 0.7));
        assert!(close(deficit.potassium, 50.0 * 0.7));
    }

    #[test]
    fn ph_factor_bands() {
        assert_eq!(ph_adjustment_factor(6.0), 1.0);
        assert_eq!(ph_adjustment_factor(7.5), 1.0);
        assert_eq!(ph_adjustment_factor(5.4), 0.7);
        assert_eq!(ph_adjustment_factor(5.7), 0.9);
        assert_eq!(ph_adjustment_factor(7.8), 0.9);
        assert_eq!(ph_adjustment_factor(8.2), 0.8);
    }

    #[test]
    fn yield_target_is_capped_at_double() {
        let data = ReferenceData::builtin();
        let base = calculate_nutrient_deficit(&data, "rice", &soil(), None, None).unwrap();
        let high = calculate_nutrient_deficit(&data, "rice", &soil(), Some(8.0), None).unwrap();
        let huge = calculate_nutrient_deficit(&data, "rice", &soil(), Some(50.0), None).unwrap();

        assert!(close(high.nitrogen, base.nitrogen * 2.0));
        assert_eq!(high, huge);
        assert!(high.phosphorus >= base.phosphorus);
    }

    #[test]
    fn zero_yield_target_needs_nothing() {
        let data = ReferenceData::builtin();
        let zero = calculate_nutrient_deficit(&data, "rice", &soil(), Some(0.0), None).unwrap();
        let small = calculate_nutrient_deficit(&data, "rice", &soil(), Some(0.1), None).unwrap();

        assert!(zero.is_zero());
        assert!(small.nitrogen >= zero.nitrogen);
        assert!(small.phosphorus >= zero.phosphorus);
        assert!(small.potassium >= zero.potassium);
    }

    #[test]
    fn negative_yield_target_rejected() {
        let data = ReferenceData::builtin();
        let err = calculate_nutrient_deficit(&data, "rice", &soil(), Some(-1.0), None).unwrap_err();
        assert!(matches!(err, AgronomyError::InvalidParameter { .. }));
    }

    #[test]
    fn region_scales_mobile_nutrients_by_rainfall() {
        let data = ReferenceData::builtin();
        let base = calculate_nutrient_deficit(&data, "wheat", &soil(), None, None).unwrap();
        let punjab = calculate_nutrient_deficit(&data, "wheat", &soil(), None, Some("Punjab")).unwrap();

        assert!(close(punjab.nitrogen, base.nitrogen * 1.1 * 1.1));
        assert!(close(punjab.phosphorus, base.phosphorus * 1.1));
        assert!(close(punjab.potassium, base.potassium * 1.1 * 1.1));
    }

    #[test]
    fn unknown_region_is_ignored() {
        let data = ReferenceData::builtin();
        let base = calculate_nutrient_deficit(&data, "wheat", &soil(), None, None).unwrap();
        let other = calculate_nutrient_deficit(&data, "wheat", &soil(), None, Some("Narnia")).unwrap();
        assert_eq!(base, other);
    }

    #[test]
    fn unknown_crop_fails() {
        let data = ReferenceData::builtin();
        assert_eq!(
            calculate_nutrient_deficit(&data, "teff", &soil(), None, None),
            Err(AgronomyError::UnknownCrop("teff".to_string()))
        );
    }
}
