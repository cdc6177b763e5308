//! Shared agronomy engine for the FarmGuard platform
//!
//! Soil health scoring, fertilizer nutrient-deficit calculation, product
//! recommendation, application scheduling and cost-benefit estimation. Every
//! operation here is a pure function of its inputs and a [`ReferenceData`]
//! table set, so the backend and the WASM module can call it concurrently
//! without coordination.

pub mod classification;
pub mod cost_benefit;
pub mod error;
pub mod models;
pub mod nutrients;
pub mod recommendation;
pub mod reference;
pub mod schedule;
pub mod soil_health;
pub mod types;
pub mod validation;

pub use classification::*;
pub use cost_benefit::*;
pub use error::*;
pub use models::*;
pub use nutrients::*;
pub use recommendation::*;
pub use reference::*;
pub use schedule::*;
pub use soil_health::*;
pub use types::*;
pub use validation::*;
