//! Numerical utilities: closeness predicates and Taylor expansions.

pub mod stability;
pub mod taylor;

// Re-export numerical utilities
pub use stability::*;
pub use taylor::*;
