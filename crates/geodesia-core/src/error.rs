//! Error types for hypersphere and linear-algebra operations.
//!
//! Every fallible operation of the library returns [`ManifoldError`]. Failures
//! are reported fast and never carry a partial result.

use thiserror::Error;

/// Errors that can occur during manifold and matrix operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifoldError {
    /// Dimension mismatch between inputs.
    ///
    /// Raised when the trailing dimension of a point, a tangent vector or a
    /// matrix does not match what the operation expects, or when two batches
    /// cannot be broadcast together.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A documented precondition of the operation does not hold.
    ///
    /// Examples: regularizing a point that is not on the hypersphere, or
    /// transporting along batches of different lengths.
    #[error("Precondition violated: {reason}")]
    PreconditionViolated {
        /// Description of the violated precondition
        reason: String,
    },

    /// A matrix factorization or linear solve failed.
    #[error("Decomposition failed: {reason}")]
    DecompositionFailed {
        /// Description of the failure
        reason: String,
    },

    /// The operation is not available for this dimension or coordinate system.
    #[error("Not supported: {feature}")]
    NotSupported {
        /// Name of the unsupported feature
        feature: String,
    },

    /// Numerical breakdown, such as an iteration that did not converge.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl ManifoldError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a PreconditionViolated error with a custom reason.
    pub fn precondition<S: Into<String>>(reason: S) -> Self {
        Self::PreconditionViolated {
            reason: reason.into(),
        }
    }

    /// Create a DecompositionFailed error with a custom reason.
    pub fn decomposition_failed<S: Into<String>>(reason: S) -> Self {
        Self::DecompositionFailed {
            reason: reason.into(),
        }
    }

    /// Create a NotSupported error for a specific feature.
    pub fn not_supported<S: Into<String>>(feature: S) -> Self {
        Self::NotSupported {
            feature: feature.into(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce ManifoldError.
pub type Result<T> = std::result::Result<T, ManifoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ManifoldError::precondition("point is not on the hypersphere");
        assert!(matches!(err, ManifoldError::PreconditionViolated { .. }));
        assert_eq!(
            err.to_string(),
            "Precondition violated: point is not on the hypersphere"
        );

        let err = ManifoldError::dimension_mismatch(4, 3);
        assert!(matches!(err, ManifoldError::DimensionMismatch { .. }));
        assert_eq!(err.to_string(), "Dimension mismatch: expected 4, got 3");
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            ManifoldError::dimension_mismatch("square matrix", "2x3"),
            ManifoldError::precondition("batch lengths differ"),
            ManifoldError::decomposition_failed("singular matrix"),
            ManifoldError::not_supported("christoffel symbols in dimension 3"),
            ManifoldError::numerical_error("square-root iteration did not converge"),
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            ManifoldError::not_supported("x"),
            ManifoldError::NotSupported {
                feature: "x".to_string()
            }
        );
        assert_ne!(
            ManifoldError::not_supported("x"),
            ManifoldError::precondition("x")
        );
    }
}
