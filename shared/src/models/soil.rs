//! Soil test and soil analysis models

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::NutrientLevel;

/// Laboratory soil test result
///
/// Nutrient values are available amounts in kg/ha; organic matter is a
/// percentage by weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, PartialEq)]
pub struct SoilTestResult {
    #[validate(range(min = 3.0, max = 11.0))]
    pub ph: f64,
    #[validate(range(min = 0.0))]
    pub nitrogen: f64,
    #[validate(range(min = 0.0))]
    pub phosphorus: f64,
    #[validate(range(min = 0.0))]
    pub potassium: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub organic_matter: f64,
    /// cmol(+)/kg
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub cation_exchange_capacity: Option<f64>,
    /// dS/m
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub electrical_conductivity: Option<f64>,
}

impl SoilTestResult {
    /// Soil test with only the required fields set
    pub fn new(ph: f64, nitrogen: f64, phosphorus: f64, potassium: f64, organic_matter: f64) -> Self {
        Self {
            ph,
            nitrogen,
            phosphorus,
            potassium,
            organic_matter,
            cation_exchange_capacity: None,
            electrical_conductivity: None,
        }
    }

    /// Representative sample derived from pH alone, for demo and quick checks
    pub fn representative_for_ph(ph: f64) -> Self {
        if ph < 5.5 {
            Self::new(ph, 80.0, 12.0, 90.0, 1.2)
        } else if ph > 7.5 {
            Self::new(ph, 120.0, 25.0, 200.0, 2.1)
        } else {
            Self::new(ph, 150.0, 20.0, 160.0, 2.5)
        }
    }
}

/// Overall fertility label derived from the health score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FertilityStatus {
    /// 80-100 points
    Excellent,
    /// 65-79.9 points
    Good,
    /// 50-64.9 points
    Fair,
    /// 35-49.9 points
    Poor,
    /// Below 35 points
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

impl std::fmt::Display for FertilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FertilityStatus::Excellent => write!(f, "Excellent"),
            FertilityStatus::Good => write!(f, "Good"),
            FertilityStatus::Fair => write!(f, "Fair"),
            FertilityStatus::Poor => write!(f, "Poor"),
            FertilityStatus::VeryPoor => write!(f, "Very Poor"),
        }
    }
}

/// Classify fertility from a 0-100 health score
pub fn classify_fertility(score: f64) -> FertilityStatus {
    if score >= 80.0 {
        FertilityStatus::Excellent
    } else if score >= 65.0 {
        FertilityStatus::Good
    } else if score >= 50.0 {
        FertilityStatus::Fair
    } else if score >= 35.0 {
        FertilityStatus::Poor
    } else {
        FertilityStatus::VeryPoor
    }
}

/// Quick-estimate fertilizer need for one nutrient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerNeed {
    pub nutrient: crate::types::Nutrient,
    pub current_level: NutrientLevel,
    /// kg of product per hectare
    pub recommended_amount: f64,
    pub fertilizer_id: String,
    pub fertilizer_type: String,
    pub application_method: String,
    pub timing: String,
    pub cost_per_hectare: f64,
}

/// Staged soil improvement actions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImprovementPlan {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
}

/// Result of a soil health assessment for a target crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoilAnalysisResult {
    /// 0-100, one decimal place
    pub health_score: f64,
    pub fertility_status: FertilityStatus,
    pub ph_category: crate::types::PhCategory,
    pub recommendations: Vec<String>,
    pub fertilizer_needs: Vec<FertilizerNeed>,
    pub suitable_crops: Vec<String>,
    pub warnings: Vec<String>,
    pub improvement_plan: ImprovementPlan,
}
