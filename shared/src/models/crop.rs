//! Crop nutrient requirement profiles

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inclusive pH interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PhRange {
    pub min: f64,
    pub max: f64,
}

impl PhRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, ph: f64) -> bool {
        self.min <= ph && ph <= self.max
    }

    /// Distance in pH units to the nearest bound, zero inside the range
    pub fn distance(&self, ph: f64) -> f64 {
        if self.contains(ph) {
            0.0
        } else {
            (ph - self.min).abs().min((ph - self.max).abs())
        }
    }
}

impl std::fmt::Display for PhRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}-{:.1}", self.min, self.max)
    }
}

/// Share of the crop's nitrogen applied at one growth stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthStage {
    pub name: String,
    pub fraction: f64,
}

impl GrowthStage {
    pub fn new(name: &str, fraction: f64) -> Self {
        Self {
            name: name.to_string(),
            fraction,
        }
    }
}

/// Crop nutrient requirement profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropProfile {
    pub id: String,
    pub ph_range: PhRange,
    /// Target N, kg/ha
    pub nitrogen: f64,
    /// Target P, kg/ha
    pub phosphorus: f64,
    /// Target K, kg/ha
    pub potassium: f64,
    /// Typical farm yield, t/ha
    pub average_yield: f64,
    /// Attainable yield under good management, t/ha
    pub yield_potential: f64,
    /// Ordered stage distribution of the nitrogen dose; fractions sum to 1.0
    pub growth_stages: Vec<GrowthStage>,
    pub critical_periods: Vec<String>,
    /// Stage name to days after planting. Absent means the generic timings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_timings: Option<BTreeMap<String, i64>>,
}

/// Stage key used for the second potash split
pub const REPRODUCTIVE_STAGE: &str = "reproductive";

impl CropProfile {
    /// Display name, e.g. "Rice"
    pub fn display_name(&self) -> String {
        let mut chars = self.id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
            None => String::new(),
        }
    }

    /// Application timings with the generic `{basal: 0, reproductive: 60}` fallback
    pub fn timings(&self) -> BTreeMap<String, i64> {
        self.application_timings.clone().unwrap_or_else(|| {
            BTreeMap::from([("basal".to_string(), 0), (REPRODUCTIVE_STAGE.to_string(), 60)])
        })
    }

    /// Days after planting for a stage; unlisted stages fall on planting day
    pub fn day_offset(&self, stage: &str) -> i64 {
        match &self.application_timings {
            Some(timings) => timings.get(stage).copied().unwrap_or(0),
            None => match stage {
                REPRODUCTIVE_STAGE => 60,
                _ => 0,
            },
        }
    }

    /// Day offset of the reproductive stage, falling back to 60
    pub fn reproductive_day(&self) -> i64 {
        self.application_timings
            .as_ref()
            .and_then(|t| t.get(REPRODUCTIVE_STAGE).copied())
            .unwrap_or(60)
    }

    pub fn stage_fraction_total(&self) -> f64 {
        self.growth_stages.iter().map(|s| s.fraction).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(timings: Option<BTreeMap<String, i64>>) -> CropProfile {
        CropProfile {
            id: "finger_millet".to_string(),
            ph_range: PhRange::new(5.0, 7.0),
            nitrogen: 60.0,
            phosphorus: 30.0,
            potassium: 30.0,
            average_yield: 1.5,
            yield_potential: 3.0,
            growth_stages: vec![GrowthStage::new("basal", 0.5), GrowthStage::new("tillering", 0.5)],
            critical_periods: vec![],
            application_timings: timings,
        }
    }

    #[test]
    fn ph_distance_to_nearest_bound() {
        let range = PhRange::new(5.5, 7.0);
        assert_eq!(range.distance(6.0), 0.0);
        assert!((range.distance(4.0) - 1.5).abs() < 1e-9);
        assert!((range.distance(8.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_timings_use_generic_fallback() {
        let crop = profile(None);
        assert_eq!(crop.day_offset("basal"), 0);
        assert_eq!(crop.day_offset("tillering"), 0);
        assert_eq!(crop.reproductive_day(), 60);
        assert_eq!(crop.timings().len(), 2);
    }

    #[test]
    fn explicit_timings_take_precedence() {
        let crop = profile(Some(BTreeMap::from([
            ("basal".to_string(), 0),
            ("tillering".to_string(), 25),
        ])));
        assert_eq!(crop.day_offset("tillering"), 25);
        assert_eq!(crop.reproductive_day(), 60);
    }

    #[test]
    fn display_name_capitalizes() {
        assert_eq!(profile(None).display_name(), "Finger millet");
    }
}
