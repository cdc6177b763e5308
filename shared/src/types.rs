//! Common types used across the engine

use serde::{Deserialize, Serialize};

use crate::error::AgronomyError;

/// Elemental phosphorus to P₂O₅ conversion factor
pub const P_TO_P2O5: f64 = 2.29;

/// Elemental potassium to K₂O conversion factor
pub const K_TO_K2O: f64 = 1.20;

/// Primary macronutrients reported by a soil test
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    pub const ALL: [Nutrient; 3] = [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "nitrogen",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::Potassium => "potassium",
        }
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Nutrient::Nitrogen => write!(f, "Nitrogen"),
            Nutrient::Phosphorus => write!(f, "Phosphorus"),
            Nutrient::Potassium => write!(f, "Potassium"),
        }
    }
}

impl std::str::FromStr for Nutrient {
    type Err = AgronomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nitrogen" | "n" => Ok(Nutrient::Nitrogen),
            "phosphorus" | "p" => Ok(Nutrient::Phosphorus),
            "potassium" | "k" => Ok(Nutrient::Potassium),
            _ => Err(AgronomyError::UnknownNutrient(s.to_string())),
        }
    }
}

/// Soil nutrient level relative to the reference thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Low,
    Medium,
    High,
}

impl NutrientLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientLevel::Low => "low",
            NutrientLevel::Medium => "medium",
            NutrientLevel::High => "high",
        }
    }
}

impl std::fmt::Display for NutrientLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named soil pH band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhCategory {
    VeryAcidic,
    Acidic,
    SlightlyAcidic,
    Neutral,
    Alkaline,
    HighlyAlkaline,
    /// No band in the table contains the value
    Unknown,
}

impl PhCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhCategory::VeryAcidic => "very_acidic",
            PhCategory::Acidic => "acidic",
            PhCategory::SlightlyAcidic => "slightly_acidic",
            PhCategory::Neutral => "neutral",
            PhCategory::Alkaline => "alkaline",
            PhCategory::HighlyAlkaline => "highly_alkaline",
            PhCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PhCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to a fixed number of decimal places for reporting
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
