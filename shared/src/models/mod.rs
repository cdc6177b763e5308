//! Domain models for the FarmGuard agronomy engine

mod crop;
mod economics;
mod fertilizer;
mod region;
mod soil;

pub use crop::*;
pub use economics::*;
pub use fertilizer::*;
pub use region::*;
pub use soil::*;
