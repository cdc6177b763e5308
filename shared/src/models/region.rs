//! Regional climate and soil adjustment factors

use serde::{Deserialize, Serialize};

/// Dimensionless multipliers centred near 1.0
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RegionalFactor {
    pub rainfall: f64,
    pub temperature: f64,
    pub soil_factor: f64,
}

impl RegionalFactor {
    pub fn new(rainfall: f64, temperature: f64, soil_factor: f64) -> Self {
        Self {
            rainfall,
            temperature,
            soil_factor,
        }
    }

    /// Multiplier for the mobile nutrients (N and K)
    pub fn mobile_nutrient_factor(&self) -> f64 {
        self.rainfall * self.soil_factor
    }
}
