//! HTTP handlers for the FarmGuard API

pub mod fertilizer;
pub mod health;
pub mod reference;
pub mod soil_analysis;

pub use fertilizer::*;
pub use health::*;
pub use reference::*;
pub use soil_analysis::*;
