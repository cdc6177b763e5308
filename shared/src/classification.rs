//! Map raw soil readings onto named categories

use crate::error::AgronomyResult;
use crate::reference::ReferenceData;
use crate::types::{Nutrient, NutrientLevel, PhCategory};

/// Categorize a soil pH value.
///
/// Bands are inclusive on both ends and scanned in table order, so a value on
/// a shared boundary (e.g. 5.5) belongs to the first band listing it
/// (`acidic`, not `slightly_acidic`). Values outside every band are
/// [`PhCategory::Unknown`].
pub fn categorize_ph(reference: &ReferenceData, ph: f64) -> PhCategory {
    reference
        .ph_bands
        .iter()
        .find(|band| band.min <= ph && ph <= band.max)
        .map(|band| band.category)
        .unwrap_or(PhCategory::Unknown)
}

/// Categorize a nutrient reading: at or below `low_max` is low, at or above
/// `high_min` is high, anything between is medium.
pub fn categorize_nutrient(reference: &ReferenceData, nutrient: Nutrient, value: f64) -> NutrientLevel {
    match reference.thresholds(nutrient) {
        Some(t) if value <= t.low_max => NutrientLevel::Low,
        Some(t) if value >= t.high_min => NutrientLevel::High,
        _ => NutrientLevel::Medium,
    }
}

/// Like [`categorize_nutrient`], for free-text nutrient names
pub fn categorize_nutrient_by_name(
    reference: &ReferenceData,
    nutrient_name: &str,
    value: f64,
) -> AgronomyResult<NutrientLevel> {
    let nutrient: Nutrient = nutrient_name.parse()?;
    Ok(categorize_nutrient(reference, nutrient, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgronomyError;

    #[test]
    fn ph_categories() {
        let data = ReferenceData::builtin();
        assert_eq!(categorize_ph(&data, 4.0), PhCategory::VeryAcidic);
        assert_eq!(categorize_ph(&data, 5.0), PhCategory::Acidic);
        assert_eq!(categorize_ph(&data, 6.0), PhCategory::SlightlyAcidic);
        assert_eq!(categorize_ph(&data, 7.0), PhCategory::Neutral);
        assert_eq!(categorize_ph(&data, 8.0), PhCategory::Alkaline);
        assert_eq!(categorize_ph(&data, 9.0), PhCategory::HighlyAlkaline);
    }

    #[test]
    fn shared_boundary_goes_to_first_band() {
        let data = ReferenceData::builtin();
        assert_eq!(categorize_ph(&data, 4.5), PhCategory::VeryAcidic);
        assert_eq!(categorize_ph(&data, 5.5), PhCategory::Acidic);
        assert_eq!(categorize_ph(&data, 7.5), PhCategory::Neutral);
        assert_eq!(categorize_ph(&data, 11.0), PhCategory::HighlyAlkaline);
    }

    #[test]
    fn ph_outside_table_is_unknown() {
        let data = ReferenceData::builtin();
        assert_eq!(categorize_ph(&data, 2.9), PhCategory::Unknown);
        assert_eq!(categorize_ph(&data, 11.5), PhCategory::Unknown);
        assert_eq!(categorize_ph(&data, f64::NAN), PhCategory::Unknown);
    }

    #[test]
    fn nutrient_levels() {
        let data = ReferenceData::builtin();
        assert_eq!(categorize_nutrient(&data, Nutrient::Nitrogen, 100.0), NutrientLevel::Low);
        assert_eq!(categorize_nutrient(&data, Nutrient::Nitrogen, 200.0), NutrientLevel::Medium);
        assert_eq!(categorize_nutrient(&data, Nutrient::Nitrogen, 350.0), NutrientLevel::High);
        assert_eq!(categorize_nutrient(&data, Nutrient::Phosphorus, 10.0), NutrientLevel::Low);
        assert_eq!(categorize_nutrient(&data, Nutrient::Phosphorus, 20.0), NutrientLevel::Medium);
        assert_eq!(categorize_nutrient(&data, Nutrient::Phosphorus, 35.0), NutrientLevel::High);
        assert_eq!(categorize_nutrient(&data, Nutrient::Potassium, 100.0), NutrientLevel::Low);
        assert_eq!(categorize_nutrient(&data, Nutrient::Potassium, 200.0), NutrientLevel::Medium);
        assert_eq!(categorize_nutrient(&data, Nutrient::Potassium, 300.0), NutrientLevel::High);
    }

    #[test]
    fn nutrient_thresholds_are_inclusive() {
        let data = ReferenceData::builtin();
        assert_eq!(categorize_nutrient(&data, Nutrient::Nitrogen, 150.0), NutrientLevel::Low);
        assert_eq!(categorize_nutrient(&data, Nutrient::Nitrogen, 300.0), NutrientLevel::High);
    }

    #[test]
    fn unknown_nutrient_name_is_an_error() {
        let data = ReferenceData::builtin();
        assert_eq!(
            categorize_nutrient_by_name(&data, "potassium", 300.0),
            Ok(NutrientLevel::High)
        );
        assert_eq!(
            categorize_nutrient_by_name(&data, "magnesium", 3.0),
            Err(AgronomyError::UnknownNutrient("magnesium".to_string()))
        );
    }
}
