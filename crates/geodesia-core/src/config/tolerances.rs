//! Numerical tolerances shared by the hypersphere maps and the linear-algebra
//! backend.
//!
//! The defaults reproduce the hand-tuned constants of the algorithms: the
//! `isclose` predicate that selects Taylor branches, the membership tolerance
//! of the hypersphere and the thresholds of the symmetric shortcuts. Changing
//! them changes which branch a sample takes, so most callers should keep the
//! defaults.

use crate::types::Scalar;

/// Tolerances and iteration limits used across the library.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances<T> {
    /// Tolerance on `|<p, p> - 1|` for hypersphere membership.
    pub belongs: T,
    /// Relative tolerance of `isclose`.
    pub isclose_rtol: T,
    /// Absolute tolerance of `isclose`.
    pub isclose_atol: T,
    /// Elementwise tolerance for symmetry checks.
    pub symmetry: T,
    /// Smallest eigenvalue accepted by the symmetric Sylvester shortcut.
    pub sylvester_eigen_floor: T,
    /// `‖A - I‖₁` below which the matrix logarithm stops taking square roots.
    pub log_sqrt_threshold: T,
    /// Maximum iterations of the Denman–Beavers square-root iteration.
    pub max_sqrt_iterations: usize,
    /// Maximum number of successive square roots taken by the logarithm.
    pub max_log_square_roots: usize,
    /// Batch length from which matrix batches are processed in parallel.
    pub parallel_batch_threshold: usize,
}

impl<T: Scalar> Default for Tolerances<T> {
    fn default() -> Self {
        Self {
            belongs: T::BELONGS_TOLERANCE,
            isclose_rtol: T::ISCLOSE_RTOL,
            isclose_atol: T::ISCLOSE_ATOL,
            symmetry: T::SYMMETRY_TOLERANCE,
            sylvester_eigen_floor: -T::SYMMETRY_TOLERANCE,
            log_sqrt_threshold: <T as Scalar>::from_f64(0.25),
            max_sqrt_iterations: 100,
            max_log_square_roots: 64,
            parallel_batch_threshold: 16,
        }
    }
}

impl<T: Scalar> Tolerances<T> {
    /// Start a builder from the default tolerances.
    pub fn builder() -> TolerancesBuilder<T> {
        TolerancesBuilder::new()
    }
}

/// Builder for a custom [`Tolerances`] configuration.
#[derive(Debug, Clone)]
pub struct TolerancesBuilder<T> {
    config: Tolerances<T>,
}

impl<T: Scalar> TolerancesBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: Tolerances::default(),
        }
    }

    /// Set the hypersphere membership tolerance.
    pub fn belongs(mut self, tolerance: T) -> Self {
        self.config.belongs = tolerance;
        self
    }

    /// Set the relative and absolute tolerances of `isclose`.
    pub fn isclose(mut self, rtol: T, atol: T) -> Self {
        self.config.isclose_rtol = rtol;
        self.config.isclose_atol = atol;
        self
    }

    /// Set the symmetry tolerance.
    pub fn symmetry(mut self, tolerance: T) -> Self {
        self.config.symmetry = tolerance;
        self
    }

    /// Set the eigenvalue floor of the symmetric Sylvester shortcut.
    pub fn sylvester_eigen_floor(mut self, floor: T) -> Self {
        self.config.sylvester_eigen_floor = floor;
        self
    }

    /// Set the stopping threshold of the logarithm's square-root phase.
    pub fn log_sqrt_threshold(mut self, threshold: T) -> Self {
        self.config.log_sqrt_threshold = threshold;
        self
    }

    /// Set the iteration cap of the square-root iteration.
    pub fn max_sqrt_iterations(mut self, iterations: usize) -> Self {
        self.config.max_sqrt_iterations = iterations;
        self
    }

    /// Set the maximum number of square roots taken by the logarithm.
    pub fn max_log_square_roots(mut self, roots: usize) -> Self {
        self.config.max_log_square_roots = roots;
        self
    }

    /// Set the batch length from which batches run in parallel.
    pub fn parallel_batch_threshold(mut self, threshold: usize) -> Self {
        self.config.parallel_batch_threshold = threshold;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Tolerances<T> {
        self.config
    }
}

impl<T: Scalar> Default for TolerancesBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerances() {
        let tol = Tolerances::<f64>::default();
        assert_eq!(tol.belongs, 1e-6);
        assert_eq!(tol.isclose_rtol, 1e-5);
        assert_eq!(tol.isclose_atol, 1e-8);
        assert_eq!(tol.symmetry, 1e-12);
        assert_eq!(tol.sylvester_eigen_floor, -1e-12);
        assert_eq!(tol.log_sqrt_threshold, 0.25);
    }

    #[test]
    fn test_tolerances_builder() {
        let tol = Tolerances::<f64>::builder()
            .belongs(1e-3)
            .isclose(1e-4, 1e-9)
            .max_sqrt_iterations(20)
            .parallel_batch_threshold(4)
            .build();

        assert_eq!(tol.belongs, 1e-3);
        assert_eq!(tol.isclose_rtol, 1e-4);
        assert_eq!(tol.isclose_atol, 1e-9);
        assert_eq!(tol.max_sqrt_iterations, 20);
        assert_eq!(tol.parallel_batch_threshold, 4);
        assert_eq!(tol.symmetry, 1e-12);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_tolerances_serde_roundtrip() {
        let tol = Tolerances::<f64>::builder().belongs(1e-4).build();
        let json = serde_json::to_string(&tol).unwrap();
        let back: Tolerances<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(tol, back);
    }
}
