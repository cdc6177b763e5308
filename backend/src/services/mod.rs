//! Business logic services for the FarmGuard server

pub mod fertilizer;
pub mod soil_analysis;

pub use fertilizer::FertilizerService;
pub use soil_analysis::SoilAnalysisService;
