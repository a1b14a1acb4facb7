//! Numerical stability utilities.
//!
//! Closeness predicates and guards shared by the hypersphere maps and the
//! matrix functions. `isclose` follows the asymmetric definition
//! `|a - b| <= atol + rtol * |b|`; the branch selection of the exponential
//! and logarithmic maps depends on it exactly.

use crate::types::{DMatrix, Scalar};
use nalgebra::{Dim, Matrix, RawStorage};
use num_traits::Float;

/// `|a - b| <= atol + rtol * |b|`.
pub fn isclose<T: Scalar>(a: T, b: T, rtol: T, atol: T) -> bool {
    Float::abs(a - b) <= atol + rtol * Float::abs(b)
}

/// [`isclose`] with the default tolerances of the scalar type.
pub fn isclose_default<T: Scalar>(a: T, b: T) -> bool {
    isclose(a, b, T::ISCLOSE_RTOL, T::ISCLOSE_ATOL)
}

/// True when every pair of entries is [`isclose`].
pub fn all_close<T, R, C, S1, S2>(
    a: &Matrix<T, R, C, S1>,
    b: &Matrix<T, R, C, S2>,
    rtol: T,
    atol: T,
) -> bool
where
    T: Scalar,
    R: Dim,
    C: Dim,
    S1: RawStorage<T, R, C>,
    S2: RawStorage<T, R, C>,
{
    a.shape() == b.shape()
        && a.iter()
            .zip(b.iter())
            .all(|(&x, &y)| isclose(x, y, rtol, atol))
}

/// Clamps `x` into `[lo, hi]`.
pub fn clip<T: Scalar>(x: T, lo: T, hi: T) -> T {
    Float::max(Float::min(x, hi), lo)
}

/// Induced 1-norm (maximum absolute column sum).
pub fn one_norm<T: Scalar>(matrix: &DMatrix<T>) -> T {
    matrix
        .column_iter()
        .map(|col| col.iter().fold(T::zero(), |acc, &x| acc + Float::abs(x)))
        .fold(T::zero(), Float::max)
}

/// Largest absolute entrywise difference between two matrices of equal shape.
pub fn max_abs_diff<T: Scalar>(a: &DMatrix<T>, b: &DMatrix<T>) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| Float::abs(x - y))
        .fold(T::zero(), Float::max)
}

/// Check if a matrix is finite (no NaN or Inf values)
pub fn is_finite_matrix<T: Scalar>(matrix: &DMatrix<T>) -> bool {
    matrix.iter().all(|&x| Float::is_finite(x))
}
