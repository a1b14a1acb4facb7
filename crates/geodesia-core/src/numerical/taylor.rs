//! Taylor expansions used near the degenerate points of the hypersphere maps.
//!
//! Coefficient tables are indexed by power: entry `k` multiplies `x^k`. Only
//! even powers are non-zero. The tables and the number of terms evaluated are
//! tuned for stability and must not be changed.

use crate::types::Scalar;

/// Taylor coefficients of `cos(x)`.
pub const COS_TAYLOR_COEFFS: [f64; 10] = [
    1.0,
    0.0,
    -1.0 / 2.0,
    0.0,
    1.0 / 24.0,
    0.0,
    -1.0 / 720.0,
    0.0,
    1.0 / 40320.0,
    0.0,
];

/// Taylor coefficients of `sin(x) / x`.
pub const SINC_TAYLOR_COEFFS: [f64; 8] = [
    1.0,
    0.0,
    -1.0 / 6.0,
    0.0,
    1.0 / 120.0,
    0.0,
    -1.0 / 5040.0,
    0.0,
];

/// Taylor coefficients of `x / sin(x) - 1`.
pub const INV_SIN_TAYLOR_COEFFS: [f64; 8] = [
    0.0,
    1.0 / 6.0,
    0.0,
    7.0 / 360.0,
    0.0,
    31.0 / 15120.0,
    0.0,
    127.0 / 604_800.0,
];

/// Taylor coefficients of `x / tan(x) - 1`.
pub const INV_TAN_TAYLOR_COEFFS: [f64; 8] = [
    0.0,
    -1.0 / 3.0,
    0.0,
    -1.0 / 45.0,
    0.0,
    -2.0 / 945.0,
    0.0,
    -1.0 / 4725.0,
];

fn c<T: Scalar>(value: f64) -> T {
    <T as Scalar>::from_f64(value)
}

/// `cos(x) ≈ 1 - x²/2 + x⁴/24 - x⁶/720`.
pub fn taylor_cos<T: Scalar>(x: T) -> T {
    let x2 = x * x;
    c::<T>(COS_TAYLOR_COEFFS[0])
        + c::<T>(COS_TAYLOR_COEFFS[2]) * x2
        + c::<T>(COS_TAYLOR_COEFFS[4]) * x2 * x2
        + c::<T>(COS_TAYLOR_COEFFS[6]) * x2 * x2 * x2
}

/// `sin(x)/x ≈ 1 - x²/6 + x⁴/120 - x⁶/5040`.
pub fn taylor_sinc<T: Scalar>(x: T) -> T {
    let x2 = x * x;
    c::<T>(SINC_TAYLOR_COEFFS[0])
        + c::<T>(SINC_TAYLOR_COEFFS[2]) * x2
        + c::<T>(SINC_TAYLOR_COEFFS[4]) * x2 * x2
        + c::<T>(SINC_TAYLOR_COEFFS[6]) * x2 * x2 * x2
}

/// `x/sin(x) ≈ 1 + x²/6 + 7x⁴/360 + 31x⁶/15120 + 127x⁸/604800`.
pub fn taylor_inv_sinc<T: Scalar>(x: T) -> T {
    let x2 = x * x;
    T::one()
        + c::<T>(INV_SIN_TAYLOR_COEFFS[1]) * x2
        + c::<T>(INV_SIN_TAYLOR_COEFFS[3]) * x2 * x2
        + c::<T>(INV_SIN_TAYLOR_COEFFS[5]) * x2 * x2 * x2
        + c::<T>(INV_SIN_TAYLOR_COEFFS[7]) * x2 * x2 * x2 * x2
}

/// `x/tan(x) ≈ 1 - x²/3 - x⁴/45 - 2x⁶/945 - x⁸/4725`.
pub fn taylor_inv_tanc<T: Scalar>(x: T) -> T {
    let x2 = x * x;
    T::one()
        + c::<T>(INV_TAN_TAYLOR_COEFFS[1]) * x2
        + c::<T>(INV_TAN_TAYLOR_COEFFS[3]) * x2 * x2
        + c::<T>(INV_TAN_TAYLOR_COEFFS[5]) * x2 * x2 * x2
        + c::<T>(INV_TAN_TAYLOR_COEFFS[7]) * x2 * x2 * x2 * x2
}
