//! Per-matrix kernels of the dense backend.
//!
//! The general logarithm uses inverse scaling and squaring: repeated
//! Denman–Beavers square roots bring the matrix close to the identity, where
//! `log(I + X)` is evaluated by the partial-fraction form of its diagonal
//! Padé approximant (Gauss–Legendre quadrature of `∫₀¹ X (I + tX)⁻¹ dt`).
//! Only real arithmetic is used, so a matrix without a real principal
//! logarithm or square root (an eigenvalue on the closed negative real axis)
//! is reported as an error instead of producing a complex result.

use crate::{
    config::Tolerances,
    error::{ManifoldError, Result},
    numerical::{is_finite_matrix, one_norm},
    types::{DMatrix, DVector, Scalar},
};
use nalgebra::{Cholesky, Dyn, SymmetricEigen};
use num_traits::Float;

/// Gauss–Legendre nodes on `[-1, 1]` (8 points).
const GAUSS_LEGENDRE_NODES: [f64; 8] = [
    -0.960_289_856_497_536_3,
    -0.796_666_477_413_626_7,
    -0.525_532_409_916_329_0,
    -0.183_434_642_495_649_8,
    0.183_434_642_495_649_8,
    0.525_532_409_916_329_0,
    0.796_666_477_413_626_7,
    0.960_289_856_497_536_3,
];

/// Gauss–Legendre weights matching [`GAUSS_LEGENDRE_NODES`].
const GAUSS_LEGENDRE_WEIGHTS: [f64; 8] = [
    0.101_228_536_290_376_3,
    0.222_381_034_453_374_5,
    0.313_706_645_877_887_3,
    0.362_683_783_378_362_0,
    0.362_683_783_378_362_0,
    0.313_706_645_877_887_3,
    0.222_381_034_453_374_5,
    0.101_228_536_290_376_3,
];

/// True when `matrix` is square and `|a_ij - a_ji| < tolerance` everywhere.
pub fn is_symmetric_matrix<T: Scalar>(matrix: &DMatrix<T>, tolerance: T) -> bool {
    if !matrix.is_square() {
        return false;
    }
    let n = matrix.nrows();
    (0..n).all(|i| (i + 1..n).all(|j| Float::abs(matrix[(i, j)] - matrix[(j, i)]) < tolerance))
}

/// `V · diag(f(λ)) · Vᵗ`.
pub(crate) fn spectral_apply<T, F>(eigen: &SymmetricEigen<T, Dyn>, f: F) -> DMatrix<T>
where
    T: Scalar,
    F: Fn(T) -> T,
{
    let mapped: DVector<T> = eigen.eigenvalues.map(f);
    &eigen.eigenvectors * DMatrix::from_diagonal(&mapped) * eigen.eigenvectors.transpose()
}

/// Matrix exponential (Padé approximant with scaling and squaring).
pub(crate) fn expm<T: Scalar>(matrix: &DMatrix<T>) -> DMatrix<T> {
    matrix.exp()
}

fn invert<T: Scalar>(matrix: &DMatrix<T>) -> Result<DMatrix<T>> {
    matrix
        .clone()
        .try_inverse()
        .ok_or_else(|| ManifoldError::decomposition_failed("singular matrix in square-root iteration"))
}

/// Principal square root by the Denman–Beavers iteration.
pub(crate) fn denman_beavers<T: Scalar>(matrix: &DMatrix<T>, max_iterations: usize) -> Result<DMatrix<T>> {
    let n = matrix.nrows();
    let half = <T as Scalar>::from_f64(0.5);
    let tight = T::EPSILON * <T as Scalar>::from_usize(10 * n.max(1));
    let loose = Float::sqrt(T::EPSILON);

    let mut y = matrix.clone();
    let mut z = DMatrix::<T>::identity(n, n);
    let mut previous: T = Float::infinity();

    for _ in 0..max_iterations {
        let y_inv = invert(&y)?;
        let z_inv = invert(&z)?;
        let y_next = (&y + &z_inv) * half;
        let z_next = (&z + &y_inv) * half;

        let scale = one_norm(&y_next);
        let change = one_norm(&(&y_next - &y)) / if scale > T::zero() { scale } else { T::one() };
        y = y_next;
        z = z_next;

        if !Float::is_finite(change) {
            return Err(ManifoldError::numerical_error(
                "square-root iteration produced non-finite values",
            ));
        }
        // Stop at full precision, or once rounding keeps the update from shrinking.
        if change <= tight || (change <= loose && change >= previous) {
            return Ok(y);
        }
        previous = change;
    }

    Err(ManifoldError::numerical_error(format!(
        "square-root iteration did not converge in {max_iterations} iterations \
         (the matrix may have eigenvalues on the negative real axis)"
    )))
}

/// `log(I + X)` for `‖X‖₁ ≤ 0.25`.
fn pade_log1p<T: Scalar>(x: &DMatrix<T>) -> Result<DMatrix<T>> {
    let n = x.nrows();
    let identity = DMatrix::<T>::identity(n, n);
    let half = <T as Scalar>::from_f64(0.5);
    let mut acc = DMatrix::<T>::zeros(n, n);

    for (&node, &weight) in GAUSS_LEGENDRE_NODES.iter().zip(GAUSS_LEGENDRE_WEIGHTS.iter()) {
        let t = (T::one() + <T as Scalar>::from_f64(node)) * half;
        let w = <T as Scalar>::from_f64(weight) * half;
        let term = (&identity + x * t)
            .lu()
            .solve(x)
            .ok_or_else(|| ManifoldError::decomposition_failed("singular Padé denominator"))?;
        acc += term * w;
    }
    Ok(acc)
}

/// Principal logarithm of a general real matrix.
pub(crate) fn general_logm<T: Scalar>(matrix: &DMatrix<T>, tolerances: &Tolerances<T>) -> Result<DMatrix<T>> {
    let n = matrix.nrows();
    let identity = DMatrix::<T>::identity(n, n);

    let mut x = matrix.clone();
    let mut roots = 0usize;
    while one_norm(&(&x - &identity)) > tolerances.log_sqrt_threshold {
        if roots >= tolerances.max_log_square_roots {
            return Err(ManifoldError::numerical_error(format!(
                "matrix logarithm did not reach the identity after {roots} square roots"
            )));
        }
        x = denman_beavers(&x, tolerances.max_sqrt_iterations)?;
        roots += 1;
    }

    let two = <T as Scalar>::from_f64(2.0);
    let log = pade_log1p(&(&x - &identity))? * Float::powi(two, roots as i32);
    if !is_finite_matrix(&log) {
        return Err(ManifoldError::numerical_error(
            "matrix logarithm produced non-finite values",
        ));
    }
    Ok(log)
}

/// Principal square root; symmetric positive semi-definite input takes the
/// spectral path.
pub(crate) fn sqrtm<T: Scalar>(matrix: &DMatrix<T>, tolerances: &Tolerances<T>) -> Result<DMatrix<T>> {
    if is_symmetric_matrix(matrix, tolerances.symmetry) {
        let eigen = matrix.clone().symmetric_eigen();
        if eigen.eigenvalues.iter().all(|&l| l >= -tolerances.symmetry) {
            return Ok(spectral_apply(&eigen, |l| Float::sqrt(Float::max(l, T::zero()))));
        }
    }
    denman_beavers(matrix, tolerances.max_sqrt_iterations)
}

/// Solution of `A X + X A = Q` through the eigendecomposition of a symmetric
/// `A`, or `None` when the shortcut does not apply.
pub(crate) fn symmetric_sylvester<T: Scalar>(
    a: &DMatrix<T>,
    b: &DMatrix<T>,
    q: &DMatrix<T>,
    tolerances: &Tolerances<T>,
) -> Option<DMatrix<T>> {
    if a != b || !is_symmetric_matrix(a, tolerances.symmetry) {
        return None;
    }
    let eigen = a.clone().symmetric_eigen();
    let values = &eigen.eigenvalues;
    if values.iter().any(|&l| l < tolerances.sylvester_eigen_floor) {
        return None;
    }

    let v = &eigen.eigenvectors;
    let mut x_tilde = v.transpose() * q * v;
    let n = values.len();
    for j in 0..n {
        for i in 0..n {
            let denom = values[i] + values[j];
            if denom == T::zero() {
                return None;
            }
            x_tilde[(i, j)] /= denom;
        }
    }
    Some(v * x_tilde * v.transpose())
}

/// Solution of `A X + X B = Q` from the Kronecker form
/// `(I ⊗ A + Bᵗ ⊗ I) vec(X) = vec(Q)`.
pub(crate) fn general_sylvester<T: Scalar>(a: &DMatrix<T>, b: &DMatrix<T>, q: &DMatrix<T>) -> Result<DMatrix<T>> {
    let m = a.nrows();
    let n = b.nrows();
    let operator = DMatrix::<T>::identity(n, n).kronecker(a)
        + b.transpose().kronecker(&DMatrix::<T>::identity(m, m));
    let rhs = DVector::from_column_slice(q.as_slice());
    let solution = operator
        .lu()
        .solve(&rhs)
        .ok_or_else(|| ManifoldError::decomposition_failed("Sylvester operator is singular"))?;
    Ok(DMatrix::from_column_slice(m, n, solution.as_slice()))
}

/// Cholesky-based positive-definiteness test of a single matrix.
pub(crate) fn is_positive_definite_matrix<T: Scalar>(matrix: &DMatrix<T>) -> Result<bool> {
    if !matrix.is_square() {
        return Ok(false);
    }
    if !is_finite_matrix(matrix) {
        return Err(ManifoldError::decomposition_failed(
            "Cholesky factorization of a matrix with non-finite entries",
        ));
    }
    // A zero pivot is accepted by the factorization but is not positive definite.
    Ok(match Cholesky::new(matrix.clone()) {
        Some(chol) => chol
            .l_dirty()
            .diagonal()
            .iter()
            .all(|&d| d > T::zero() && Float::is_finite(d)),
        None => false,
    })
}
