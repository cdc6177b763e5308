//! Soil health scoring tests
//!
//! Tests for classification and scoring including:
//! - pH categories cover every valid reading
//! - Health score bounds
//! - Scoring scenarios for healthy and very acidic soils

use proptest::prelude::*;
use shared::{
    categorize_ph, ph_score, score_soil_health, FertilityStatus, PhCategory, PhRange, ReferenceData,
    SoilTestResult,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate pH readings inside the accepted 3.0-11.0 range
fn ph_strategy() -> impl Strategy<Value = f64> {
    3.0f64..=11.0
}

/// Generate valid soil tests
fn soil_strategy() -> impl Strategy<Value = SoilTestResult> {
    (ph_strategy(), 0.0f64..600.0, 0.0f64..80.0, 0.0f64..500.0, 0.0f64..=10.0)
        .prop_map(|(ph, n, p, k, om)| SoilTestResult::new(ph, n, p, k, om))
}

/// Generate ids of the built-in crops
fn crop_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("rice".to_string()),
        Just("wheat".to_string()),
        Just("maize".to_string()),
        Just("cotton".to_string()),
        Just("sugarcane".to_string()),
        Just("tomato".to_string()),
        Just("onion".to_string()),
        Just("potato".to_string()),
    ]
}

// ============================================================================
// Scenario Tests
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn healthy_rice_soil_scores_good_or_better() {
        let data = ReferenceData::builtin();
        let soil = SoilTestResult::new(6.5, 150.0, 20.0, 160.0, 2.0);
        let result = score_soil_health(&data, &soil, "rice").unwrap();

        assert!(result.health_score >= 65.0 && result.health_score <= 100.0);
        assert!(matches!(
            result.fertility_status,
            FertilityStatus::Good | FertilityStatus::Excellent
        ));
        assert!(result.suitable_crops.contains(&"Rice".to_string()));
    }

    #[test]
    fn very_acidic_soil_loses_half_the_ph_points() {
        let data = ReferenceData::builtin();
        let optimal = PhRange::new(5.5, 7.0);
        // distance 1.5 -> 30 - 15
        assert_eq!(ph_score(&optimal, 4.0), 15.0);

        let soil = SoilTestResult::new(4.0, 150.0, 20.0, 160.0, 2.0);
        let result = score_soil_health(&data, &soil, "rice").unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w == "Very acidic soil may cause aluminum toxicity"));
        assert_eq!(result.ph_category, PhCategory::VeryAcidic);
    }

    #[test]
    fn alkaline_soil_warns_about_micronutrients() {
        let data = ReferenceData::builtin();
        let soil = SoilTestResult::new(9.0, 150.0, 20.0, 160.0, 2.0);
        let result = score_soil_health(&data, &soil, "wheat").unwrap();

        assert!(result.warnings.iter().any(|w| w.contains("micronutrient")));
        assert!(result.recommendations.iter().any(|r| r.contains("gypsum")));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every valid pH reading falls into exactly the band that contains it
        #[test]
        fn prop_ph_category_contains_reading(ph in ph_strategy()) {
            let data = ReferenceData::builtin();
            let category = categorize_ph(&data, ph);
            prop_assert_ne!(category, PhCategory::Unknown);

            let band = data.ph_bands.iter().find(|b| b.category == category).unwrap();
            prop_assert!(band.min <= ph && ph <= band.max);
        }

        /// Health scores stay within 0-100 for any valid soil and crop
        #[test]
        fn prop_health_score_bounded(soil in soil_strategy(), crop in crop_strategy()) {
            let data = ReferenceData::builtin();
            let result = score_soil_health(&data, &soil, &crop).unwrap();
            prop_assert!(result.health_score >= 0.0);
            prop_assert!(result.health_score <= 100.0);
        }

        /// Scoring carries no hidden state
        #[test]
        fn prop_scoring_is_idempotent(soil in soil_strategy(), crop in crop_strategy()) {
            let data = ReferenceData::builtin();
            let first = score_soil_health(&data, &soil, &crop).unwrap();
            let second = score_soil_health(&data, &soil, &crop).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
