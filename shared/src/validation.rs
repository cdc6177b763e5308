//! Input validation for the agronomy engine

use validator::Validate;

use crate::error::{AgronomyError, AgronomyResult};
use crate::models::SoilTestResult;

/// Field order used when reporting the first invalid soil reading
const SOIL_FIELDS: [&str; 7] = [
    "ph",
    "nitrogen",
    "phosphorus",
    "potassium",
    "organic_matter",
    "cation_exchange_capacity",
    "electrical_conductivity",
];

/// Validate a soil test before it is scored or used in a calculation
pub fn validate_soil_test(soil: &SoilTestResult) -> AgronomyResult<()> {
    let readings = [
        Some(soil.ph),
        Some(soil.nitrogen),
        Some(soil.phosphorus),
        Some(soil.potassium),
        Some(soil.organic_matter),
        soil.cation_exchange_capacity,
        soil.electrical_conductivity,
    ];
    for (field, value) in SOIL_FIELDS.iter().zip(readings) {
        if matches!(value, Some(v) if !v.is_finite()) {
            return Err(AgronomyError::soil_input(field, "must be a finite number"));
        }
    }

    if let Err(errors) = soil.validate() {
        let field_errors = errors.field_errors();
        let field = SOIL_FIELDS
            .iter()
            .find(|f| field_errors.contains_key(**f))
            .copied()
            .unwrap_or("soil_test");
        return Err(AgronomyError::soil_input(field, soil_range_message(field)));
    }

    Ok(())
}

fn soil_range_message(field: &str) -> &'static str {
    match field {
        "ph" => "pH must be between 3.0 and 11.0",
        "organic_matter" => "Organic matter must be between 0 and 10%",
        "nitrogen" | "phosphorus" | "potassium" => "Nutrient content cannot be negative",
        _ => "Value cannot be negative",
    }
}

/// Validate a farm area in hectares
pub fn validate_farm_size(hectares: f64) -> AgronomyResult<()> {
    if !hectares.is_finite() || hectares <= 0.0 {
        return Err(AgronomyError::parameter("farm_size", "Farm size must be a positive number of hectares"));
    }
    Ok(())
}

/// Validate an optional spending cap
pub fn validate_budget(budget: Option<f64>) -> AgronomyResult<()> {
    match budget {
        Some(b) if !b.is_finite() || b < 0.0 => {
            Err(AgronomyError::parameter("budget", "Budget must be a non-negative amount"))
        }
        _ => Ok(()),
    }
}

/// Validate a non-negative finite price or yield figure
pub fn validate_non_negative(field: &str, value: f64) -> AgronomyResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AgronomyError::parameter(field, "must be a non-negative number"));
    }
    Ok(())
}
