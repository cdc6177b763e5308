//! Versioned agronomic reference tables
//!
//! pH bands, nutrient thresholds, crop profiles, the fertilizer catalog and
//! regional factors. Tables are plain serde data so a deployment can replace
//! the built-in set with an edited TOML file; [`ReferenceData::validate`] must
//! pass before a table set is handed to the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AgronomyError, AgronomyResult};
use crate::models::{
    CropProfile, FertilizerKind, FertilizerProduct, GrowthStage, PhRange, RegionalFactor,
};
use crate::types::{Nutrient, PhCategory, K_TO_K2O, P_TO_P2O5};

/// Catalog ids the calculator sizes products from
pub mod product_ids {
    pub const UREA: &str = "urea";
    pub const DAP: &str = "dap";
    pub const SSP: &str = "ssp";
    pub const MOP: &str = "mop";
    pub const BALANCED_NPK: &str = "npk_10_26_26";
    pub const COMPOST: &str = "compost";
    pub const VERMICOMPOST: &str = "vermicompost";

    pub const REQUIRED: [&str; 7] = [UREA, DAP, SSP, MOP, BALANCED_NPK, COMPOST, VERMICOMPOST];
}

/// Inclusive pH band; table order decides ties on shared boundaries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhBand {
    pub category: PhCategory,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub typical_crops: Vec<String>,
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Indicative products and symptoms for one nutrient level
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LevelGuidance {
    #[serde(default)]
    pub fertilizers: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// Level thresholds for one nutrient, kg/ha
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutrientThresholds {
    pub nutrient: Nutrient,
    /// Values at or below are low
    pub low_max: f64,
    /// Values at or above are high
    pub high_min: f64,
    #[serde(default)]
    pub low: LevelGuidance,
    #[serde(default)]
    pub medium: LevelGuidance,
    #[serde(default)]
    pub high: LevelGuidance,
}

/// Complete reference table set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceData {
    pub version: String,
    pub ph_bands: Vec<PhBand>,
    pub nutrient_thresholds: Vec<NutrientThresholds>,
    /// Table order is the order suitable crops are reported in
    pub crops: Vec<CropProfile>,
    pub fertilizers: Vec<FertilizerProduct>,
    pub regions: BTreeMap<String, RegionalFactor>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace([' ', '-'], "_")
}

impl ReferenceData {
    /// Look up a crop profile by id (case-insensitive)
    pub fn crop(&self, id: &str) -> AgronomyResult<&CropProfile> {
        let key = normalize_key(id);
        self.crops
            .iter()
            .find(|c| c.id == key)
            .ok_or_else(|| AgronomyError::UnknownCrop(id.to_string()))
    }

    /// Look up a catalog product by id
    pub fn fertilizer(&self, id: &str) -> AgronomyResult<&FertilizerProduct> {
        self.fertilizers
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| {
                AgronomyError::InvalidReferenceData(format!("fertilizer '{}' missing from catalog", id))
            })
    }

    /// Regional factors; unknown regions yield `None`
    pub fn region(&self, name: &str) -> Option<&RegionalFactor> {
        self.regions.get(&normalize_key(name))
    }

    pub fn thresholds(&self, nutrient: Nutrient) -> Option<&NutrientThresholds> {
        self.nutrient_thresholds.iter().find(|t| t.nutrient == nutrient)
    }

    /// Catalog prices keyed by product id, INR/kg
    pub fn prices(&self) -> BTreeMap<String, f64> {
        self.fertilizers
            .iter()
            .map(|f| (f.id.clone(), f.price_per_kg))
            .collect()
    }

    /// Check structural invariants of the table set
    pub fn validate(&self) -> AgronomyResult<()> {
        let invalid = |msg: String| Err(AgronomyError::InvalidReferenceData(msg));

        if self.ph_bands.is_empty() {
            return invalid("no pH bands defined".to_string());
        }
        for band in &self.ph_bands {
            if !band.min.is_finite() || !band.max.is_finite() || band.min > band.max {
                return invalid(format!("pH band {} needs finite bounds with min below max", band.category));
            }
        }
        for pair in self.ph_bands.windows(2) {
            if pair[1].min < pair[0].max {
                return invalid(format!(
                    "pH bands {} and {} overlap or are out of order",
                    pair[0].category, pair[1].category
                ));
            }
        }

        for nutrient in Nutrient::ALL {
            match self.thresholds(nutrient) {
                Some(t) if !non_negative(t.low_max) || !non_negative(t.high_min) => {
                    return invalid(format!("{} thresholds must be finite and non-negative", nutrient));
                }
                Some(t) if t.low_max > t.high_min => {
                    return invalid(format!("{} low threshold exceeds high threshold", nutrient));
                }
                Some(_) => {}
                None => return invalid(format!("no thresholds for {}", nutrient)),
            }
        }

        for crop in &self.crops {
            let range = crop.ph_range;
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return invalid(format!("crop {} has an invalid pH range", crop.id));
            }
            if !(crop.average_yield.is_finite() && crop.average_yield > 0.0) {
                return invalid(format!("crop {} needs a positive average yield", crop.id));
            }
            if ![crop.nitrogen, crop.phosphorus, crop.potassium, crop.yield_potential]
                .into_iter()
                .all(non_negative)
            {
                return invalid(format!("crop {} has a negative or non-finite target", crop.id));
            }
            if !crop.growth_stages.iter().all(|s| non_negative(s.fraction)) {
                return invalid(format!("crop {} has a negative or non-finite stage fraction", crop.id));
            }
            let total = crop.stage_fraction_total();
            if (total - 1.0).abs() > 0.01 {
                return invalid(format!(
                    "crop {} growth-stage fractions sum to {:.3}, expected 1.0",
                    crop.id, total
                ));
            }
        }

        for product in &self.fertilizers {
            let contents = [product.n_content, product.p2o5_content, product.k2o_content];
            if contents.iter().any(|c| !(0.0..=100.0).contains(c)) {
                return invalid(format!("fertilizer {} has a nutrient content outside 0-100%", product.id));
            }
            if !non_negative(product.price_per_kg) {
                return invalid(format!("fertilizer {} has a negative or non-finite price", product.id));
            }
        }
        for id in product_ids::REQUIRED {
            self.fertilizer(id)?;
        }

        for (name, factor) in &self.regions {
            if ![factor.rainfall, factor.temperature, factor.soil_factor].into_iter().all(non_negative) {
                return invalid(format!("region {} has a negative or non-finite factor", name));
            }
        }

        Ok(())
    }

    /// Built-in tables for Indian field crops
    pub fn builtin() -> Self {
        Self {
            version: "2025.09".to_string(),
            ph_bands: builtin_ph_bands(),
            nutrient_thresholds: builtin_thresholds(),
            crops: builtin_crops(),
            fertilizers: builtin_fertilizers(),
            regions: builtin_regions(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_ph_bands() -> Vec<PhBand> {
    let band = |category, min, max, crops: &[&str], issues: &[&str]| PhBand {
        category,
        min,
        max,
        typical_crops: strings(crops),
        issues: strings(issues),
    };
    vec![
        band(
            PhCategory::VeryAcidic,
            3.0,
            4.5,
            &["blueberry", "tea"],
            &["aluminum toxicity", "poor nutrient availability"],
        ),
        band(PhCategory::Acidic, 4.5, 5.5, &["potato", "rice"], &["low phosphorus availability"]),
        band(
            PhCategory::SlightlyAcidic,
            5.5,
            6.5,
            &["wheat", "maize", "soybean"],
            &["optimal for most crops"],
        ),
        band(PhCategory::Neutral, 6.5, 7.5, &["most vegetables", "cotton"], &["ideal conditions"]),
        band(PhCategory::Alkaline, 7.5, 8.5, &["sugarcane", "cabbage"], &["iron deficiency possible"]),
        band(PhCategory::HighlyAlkaline, 8.5, 11.0, &["barley"], &["micronutrient deficiency"]),
    ]
}

fn builtin_thresholds() -> Vec<NutrientThresholds> {
    let guidance = |fertilizers: &[&str], symptoms: &[&str]| LevelGuidance {
        fertilizers: strings(fertilizers),
        symptoms: strings(symptoms),
    };
    vec![
        NutrientThresholds {
            nutrient: Nutrient::Nitrogen,
            low_max: 150.0,
            high_min: 300.0,
            low: guidance(&["urea", "ammonium_sulphate"], &["yellowing leaves", "stunted growth"]),
            medium: guidance(&["npk_10_26_26"], &["normal growth"]),
            high: guidance(&["compost"], &["excessive vegetative growth"]),
        },
        NutrientThresholds {
            nutrient: Nutrient::Phosphorus,
            low_max: 15.0,
            high_min: 30.0,
            low: guidance(&["dap", "ssp"], &["purple leaves", "poor root development"]),
            medium: guidance(&["npk_10_26_26"], &["normal growth"]),
            high: guidance(&["compost"], &["good flowering and fruiting"]),
        },
        NutrientThresholds {
            nutrient: Nutrient::Potassium,
            low_max: 120.0,
            high_min: 280.0,
            low: guidance(&["mop", "potassium_sulphate"], &["leaf burn", "weak stems"]),
            medium: guidance(&["npk_10_26_26"], &["normal growth"]),
            high: guidance(&["compost"], &["good disease resistance"]),
        },
    ]
}

struct CropRow<'a> {
    id: &'a str,
    ph: (f64, f64),
    npk: (f64, f64, f64),
    average_yield: f64,
    yield_potential: f64,
    stages: &'a [(&'a str, f64)],
    critical: &'a [&'a str],
    timings: &'a [(&'a str, i64)],
}

impl CropRow<'_> {
    fn build(&self) -> CropProfile {
        CropProfile {
            id: self.id.to_string(),
            ph_range: PhRange::new(self.ph.0, self.ph.1),
            nitrogen: self.npk.0,
            phosphorus: self.npk.1,
            potassium: self.npk.2,
            average_yield: self.average_yield,
            yield_potential: self.yield_potential,
            growth_stages: self
                .stages
                .iter()
                .map(|(name, fraction)| GrowthStage::new(name, *fraction))
                .collect(),
            critical_periods: strings(self.critical),
            application_timings: Some(
                self.timings
                    .iter()
                    .map(|(stage, day)| (stage.to_string(), *day))
                    .collect(),
            ),
        }
    }
}

fn builtin_crops() -> Vec<CropProfile> {
    [
        CropRow {
            id: "rice",
            ph: (5.5, 7.0),
            npk: (120.0, 60.0, 40.0),
            average_yield: 3.5,
            yield_potential: 6.0,
            stages: &[("basal", 0.25), ("tillering", 0.50), ("panicle", 0.25), ("grain_filling", 0.0)],
            critical: &["tillering", "panicle_initiation"],
            timings: &[("basal", 0), ("tillering", 21), ("panicle", 45), ("reproductive", 45)],
        },
        CropRow {
            id: "wheat",
            ph: (6.0, 7.5),
            npk: (120.0, 60.0, 40.0),
            average_yield: 3.2,
            yield_potential: 4.5,
            stages: &[("basal", 0.33), ("crown_root", 0.33), ("jointing", 0.34)],
            critical: &["crown_root_stage", "jointing"],
            timings: &[("basal", 0), ("crown_root", 21), ("jointing", 45), ("reproductive", 45)],
        },
        CropRow {
            id: "maize",
            ph: (5.5, 7.0),
            npk: (120.0, 60.0, 50.0),
            average_yield: 5.5,
            yield_potential: 8.0,
            stages: &[("basal", 0.25), ("knee_high", 0.50), ("tasseling", 0.25)],
            critical: &["6_leaf_stage", "tasseling"],
            timings: &[("basal", 0), ("knee_high", 30), ("tasseling", 60), ("reproductive", 60)],
        },
        CropRow {
            id: "cotton",
            ph: (5.8, 8.0),
            npk: (160.0, 80.0, 80.0),
            average_yield: 1.8,
            yield_potential: 2.5,
            stages: &[("basal", 0.25), ("squaring", 0.50), ("flowering", 0.25)],
            critical: &["squaring", "peak_flowering"],
            timings: &[("basal", 0), ("squaring", 45), ("flowering", 75), ("reproductive", 75)],
        },
        CropRow {
            id: "sugarcane",
            ph: (6.0, 7.5),
            npk: (280.0, 90.0, 160.0),
            average_yield: 75.0,
            yield_potential: 80.0,
            stages: &[("planting", 0.25), ("tillering", 0.50), ("grand_growth", 0.25)],
            critical: &["tillering", "grand_growth_phase"],
            timings: &[("planting", 0), ("tillering", 60), ("grand_growth", 120), ("reproductive", 120)],
        },
        CropRow {
            id: "tomato",
            ph: (6.0, 7.0),
            npk: (150.0, 100.0, 150.0),
            average_yield: 25.0,
            yield_potential: 50.0,
            stages: &[("basal", 0.40), ("vegetative", 0.30), ("flowering", 0.30)],
            critical: &["flowering", "fruit_set"],
            timings: &[("basal", 0), ("vegetative", 30), ("flowering", 50), ("reproductive", 50)],
        },
        CropRow {
            id: "onion",
            ph: (6.0, 7.5),
            npk: (100.0, 50.0, 50.0),
            average_yield: 17.0,
            yield_potential: 25.0,
            stages: &[("basal", 0.50), ("bulb_initiation", 0.25), ("bulb_development", 0.25)],
            critical: &["bulb_initiation", "bulb_development"],
            timings: &[
                ("basal", 0),
                ("bulb_initiation", 30),
                ("bulb_development", 45),
                ("reproductive", 45),
            ],
        },
        CropRow {
            id: "potato",
            ph: (5.2, 6.4),
            npk: (180.0, 80.0, 220.0),
            average_yield: 22.0,
            yield_potential: 30.0,
            stages: &[("basal", 0.50), ("earthing_up", 0.50)],
            critical: &["stolon_formation", "tuber_bulking"],
            timings: &[("basal", 0), ("earthing_up", 30), ("reproductive", 45)],
        },
    ]
    .iter()
    .map(CropRow::build)
    .collect()
}

fn builtin_fertilizers() -> Vec<FertilizerProduct> {
    const BASAL: &str = "Basal application at planting";
    const SPLIT_N: &str =
        "Split application - 50% basal, 25% at vegetative stage, 25% at reproductive stage";
    const SPLIT_K: &str = "Split application - 50% basal, 50% at critical growth stage";

    let product = |id: &str,
                   name: &str,
                   grade: &str,
                   kind: FertilizerKind,
                   (n, p2o5, k2o): (f64, f64, f64),
                   price: f64,
                   note: &str| FertilizerProduct {
        id: id.to_string(),
        name: name.to_string(),
        grade: grade.to_string(),
        kind,
        n_content: n,
        p2o5_content: p2o5,
        k2o_content: k2o,
        price_per_kg: price,
        organic: kind == FertilizerKind::Organic,
        application_note: note.to_string(),
    };

    vec![
        product("urea", "Urea", "46-0-0", FertilizerKind::Nitrogenous, (46.0, 0.0, 0.0), 6.50, SPLIT_N),
        product("dap", "DAP", "18-46-0", FertilizerKind::Phosphatic, (18.0, 46.0, 0.0), 27.00, BASAL),
        product(
            "ssp",
            "Single Super Phosphate",
            "0-16-0",
            FertilizerKind::Phosphatic,
            (0.0, 16.0, 0.0),
            9.50,
            BASAL,
        ),
        product(
            "mop",
            "Muriate of Potash",
            "0-0-60",
            FertilizerKind::Potassic,
            (0.0, 0.0, 60.0),
            17.00,
            SPLIT_K,
        ),
        product(
            "npk_10_26_26",
            "NPK 10-26-26",
            "10-26-26",
            FertilizerKind::Phosphatic,
            (10.0, 26.0, 26.0),
            22.00,
            BASAL,
        ),
        product(
            "npk_12_32_16",
            "NPK 12-32-16",
            "12-32-16",
            FertilizerKind::Phosphatic,
            (12.0, 32.0, 16.0),
            24.00,
            BASAL,
        ),
        product(
            "npk_20_20_0_13",
            "NPK 20-20-0-13S",
            "20-20-0-13S",
            FertilizerKind::Nitrogenous,
            (20.0, 20.0, 0.0),
            26.00,
            SPLIT_N,
        ),
        product(
            "ammonium_sulphate",
            "Ammonium Sulphate",
            "20.6-0-0",
            FertilizerKind::Nitrogenous,
            (20.6, 0.0, 0.0),
            8.00,
            SPLIT_N,
        ),
        product(
            "potassium_sulphate",
            "Potassium Sulphate",
            "0-0-50",
            FertilizerKind::Potassic,
            (0.0, 0.0, 50.0),
            45.00,
            SPLIT_K,
        ),
        // Organic assays are elemental P and K, stored here on the oxide basis
        product(
            "compost",
            "Farm Compost",
            "0.5-0.3-0.5",
            FertilizerKind::Organic,
            (0.5, 0.3 * P_TO_P2O5, 0.5 * K_TO_K2O),
            5.00,
            "Apply and incorporate 2-3 weeks before planting",
        ),
        product(
            "vermicompost",
            "Vermicompost",
            "1.5-1.0-1.2",
            FertilizerKind::Organic,
            (1.5, 1.0 * P_TO_P2O5, 1.2 * K_TO_K2O),
            8.00,
            "Apply as top dressing during vegetative growth",
        ),
    ]
}

fn builtin_regions() -> BTreeMap<String, RegionalFactor> {
    [
        ("punjab", 1.1, 1.0, 1.1),
        ("haryana", 1.0, 1.1, 1.0),
        ("uttar_pradesh", 0.9, 1.0, 0.9),
        ("bihar", 0.8, 0.9, 0.8),
        ("west_bengal", 1.2, 0.9, 1.0),
        ("maharashtra", 0.7, 1.1, 0.9),
        ("karnataka", 0.8, 1.0, 1.0),
        ("tamil_nadu", 0.6, 1.1, 0.9),
        ("gujarat", 0.5, 1.2, 0.8),
        ("rajasthan", 0.3, 1.3, 0.7),
    ]
    .into_iter()
    .map(|(name, rainfall, temperature, soil)| {
        (name.to_string(), RegionalFactor::new(rainfall, temperature, soil))
    })
    .collect()
}
