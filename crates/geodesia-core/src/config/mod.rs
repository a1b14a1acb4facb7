//! Configuration utilities for the geometry library.

pub mod tolerances;

// Re-export key items
pub use tolerances::{Tolerances, TolerancesBuilder};
