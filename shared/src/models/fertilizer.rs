//! Fertilizer catalog, recommendation and application schedule models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nutrient role of a fertilizer product, fixed in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FertilizerKind {
    Nitrogenous,
    Phosphatic,
    Potassic,
    Organic,
}

impl FertilizerKind {
    /// Nutrient reported on schedule entries for this kind
    pub fn applied_nutrient(&self) -> AppliedNutrient {
        match self {
            FertilizerKind::Nitrogenous => AppliedNutrient::Nitrogen,
            FertilizerKind::Phosphatic => AppliedNutrient::Phosphorus,
            FertilizerKind::Potassic => AppliedNutrient::Potassium,
            FertilizerKind::Organic => AppliedNutrient::OrganicMatter,
        }
    }
}

/// Fertilizer catalog entry
///
/// Nutrient contents are percent by weight on the oxide basis (N, P₂O₅, K₂O).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerProduct {
    pub id: String,
    pub name: String,
    /// Grade tag, e.g. "18-46-0"
    pub grade: String,
    pub kind: FertilizerKind,
    pub n_content: f64,
    pub p2o5_content: f64,
    pub k2o_content: f64,
    /// INR per kg
    pub price_per_kg: f64,
    #[serde(default)]
    pub organic: bool,
    pub application_note: String,
}

impl FertilizerProduct {
    /// Nutrients delivered by `amount` kg of this product
    pub fn supplied_by(&self, amount: f64) -> NutrientsSupplied {
        NutrientsSupplied {
            n: amount * self.n_content / 100.0,
            p2o5: amount * self.p2o5_content / 100.0,
            k2o: amount * self.k2o_content / 100.0,
        }
    }

    pub fn cost_of(&self, amount: f64) -> f64 {
        amount * self.price_per_kg
    }
}

/// Nutrient deficit in kg/ha (elemental N, P, K), never negative
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "DeficitFields")]
pub struct NutrientDeficit {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

/// Wire form of a deficit; decoded values go through the zero floor
#[derive(Deserialize)]
struct DeficitFields {
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
}

impl From<DeficitFields> for NutrientDeficit {
    fn from(fields: DeficitFields) -> Self {
        Self::new(fields.nitrogen, fields.phosphorus, fields.potassium)
    }
}

impl NutrientDeficit {
    /// Deficit with every component floored at zero
    pub fn new(nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self {
            nitrogen: nitrogen.max(0.0),
            phosphorus: phosphorus.max(0.0),
            potassium: potassium.max(0.0),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.nitrogen <= 0.0 && self.phosphorus <= 0.0 && self.potassium <= 0.0
    }
}

/// Oxide-basis nutrients supplied by a recommendation, kg/ha
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NutrientsSupplied {
    pub n: f64,
    pub p2o5: f64,
    pub k2o: f64,
}

/// One product line of a fertilizer program
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerRecommendation {
    pub fertilizer_id: String,
    pub fertilizer: String,
    pub kind: FertilizerKind,
    pub amount_kg_per_ha: f64,
    /// INR per hectare
    pub cost: f64,
    pub nutrients_supplied: NutrientsSupplied,
    pub application_note: String,
}

impl FertilizerRecommendation {
    pub fn from_product(product: &FertilizerProduct, amount: f64) -> Self {
        Self {
            fertilizer_id: product.id.clone(),
            fertilizer: product.name.clone(),
            kind: product.kind,
            amount_kg_per_ha: amount,
            cost: product.cost_of(amount),
            nutrients_supplied: product.supplied_by(amount),
            application_note: product.application_note.clone(),
        }
    }
}

/// Field application method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationMethod {
    Broadcast,
    Band,
    Foliar,
    Drip,
    Split,
}

/// Nutrient delivered by a schedule entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppliedNutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
    #[serde(rename = "Organic Matter")]
    OrganicMatter,
}

impl std::fmt::Display for AppliedNutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppliedNutrient::Nitrogen => write!(f, "Nitrogen"),
            AppliedNutrient::Phosphorus => write!(f, "Phosphorus"),
            AppliedNutrient::Potassium => write!(f, "Potassium"),
            AppliedNutrient::OrganicMatter => write!(f, "Organic Matter"),
        }
    }
}

/// One dated application in a fertilizer schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplicationScheduleEntry {
    pub stage: String,
    /// Negative for pre-planting applications
    pub days_after_planting: i64,
    pub application_date: NaiveDate,
    pub nutrient: AppliedNutrient,
    /// kg of product per hectare
    pub amount: f64,
    pub fertilizer: String,
    pub kind: FertilizerKind,
    pub method: ApplicationMethod,
    pub weather_conditions: Vec<String>,
}
