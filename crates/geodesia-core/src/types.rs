//! Scalar abstraction and nalgebra aliases.
//!
//! Every operation of the library is generic over [`Scalar`], implemented for
//! `f32` and `f64`. Each precision carries the default tolerances used to
//! select numerical branches.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Floating-point type usable by the geometry and linear-algebra code.
///
/// Combines nalgebra's `RealField` (decompositions, matrix functions) with
/// `num_traits::Float` (elementwise transcendentals). Both traits define
/// methods such as `sin` or `abs`, so call sites name the trait explicitly,
/// e.g. `Float::sin(x)`.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon.
    const EPSILON: Self;

    /// Tolerance on `|<p, p> - 1|` for hypersphere membership.
    const BELONGS_TOLERANCE: Self;

    /// Relative tolerance of the `isclose` predicate.
    const ISCLOSE_RTOL: Self;

    /// Absolute tolerance of the `isclose` predicate.
    const ISCLOSE_ATOL: Self;

    /// Elementwise tolerance for symmetry checks on matrices.
    const SYMMETRY_TOLERANCE: Self;

    /// Converts an `f64` constant.
    ///
    /// # Panics
    ///
    /// Panics if the value is not representable.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Converts a size or iteration count.
    ///
    /// # Panics
    ///
    /// Panics if the value is not representable.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const BELONGS_TOLERANCE: Self = 1e-6;
    const ISCLOSE_RTOL: Self = 1e-5;
    const ISCLOSE_ATOL: Self = 1e-8;
    const SYMMETRY_TOLERANCE: Self = 1e-6;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const BELONGS_TOLERANCE: Self = 1e-6;
    const ISCLOSE_RTOL: Self = 1e-5;
    const ISCLOSE_ATOL: Self = 1e-8;
    const SYMMETRY_TOLERANCE: Self = 1e-12;
}

/// Dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Dynamically-sized column vector.
pub type DVector<T> = OVector<T, Dyn>;
