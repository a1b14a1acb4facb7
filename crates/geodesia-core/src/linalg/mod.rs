//! Dense linear-algebra backend.
//!
//! Matrix functions over [`Stack`]s of square matrices: exponential,
//! logarithm, square root, Sylvester solve, positive-definiteness test and QR.
//! Every function preserves the `Single`/`Batch` variant of its input.
//!
//! The symmetric shortcuts (`logm` through `V · diag(log λ) · Vᵗ`,
//! `solve_sylvester` through a shared eigenbasis) agree with the general
//! algorithms within numerical tolerance wherever both apply.
//!
//! # Example
//!
//! ```
//! use geodesia_core::{batch::Stack, linalg};
//! use nalgebra::DMatrix;
//!
//! let a = DMatrix::from_row_slice(2, 2, &[2.0, 0.5, 0.5, 1.0]);
//! let log = linalg::logm(&Stack::Single(a.clone()))?;
//! let back = linalg::expm(&log)?;
//! assert!((back.into_single().unwrap() - a).norm() < 1e-10);
//! # Ok::<(), geodesia_core::ManifoldError>(())
//! ```

mod functions;

pub use functions::is_symmetric_matrix;

use crate::{
    batch::Stack,
    config::Tolerances,
    diagnostics::{default_sink, Diagnostic, DiagnosticKind, DiagnosticsSink},
    error::{ManifoldError, Result},
    types::{DMatrix, Scalar},
};
use std::sync::Arc;

/// Dense matrix-function backend configured with a set of tolerances.
#[derive(Debug, Clone)]
pub struct DenseBackend<T: Scalar> {
    tolerances: Tolerances<T>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl<T: Scalar> Default for DenseBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> DenseBackend<T> {
    /// Backend with the default tolerances, reporting to the default sink.
    pub fn new() -> Self {
        Self::with_tolerances(Tolerances::default())
    }

    /// Backend with custom tolerances.
    pub fn with_tolerances(tolerances: Tolerances<T>) -> Self {
        Self {
            tolerances,
            diagnostics: default_sink(),
        }
    }

    /// Replaces the diagnostics sink.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// The tolerances in use.
    pub fn tolerances(&self) -> &Tolerances<T> {
        &self.tolerances
    }

    fn report_fallback(&self, message: &str) {
        self.diagnostics
            .report(&Diagnostic::new(DiagnosticKind::FallbackBranch, message));
    }

    /// Matrix exponential of each matrix.
    pub fn expm(&self, matrices: &Stack<DMatrix<T>>) -> Result<Stack<DMatrix<T>>> {
        ensure_square(matrices)?;
        matrices.par_try_map(self.tolerances.parallel_batch_threshold, |m| {
            Ok(functions::expm(m))
        })
    }

    /// Principal matrix logarithm of each matrix.
    ///
    /// When every matrix of the stack is symmetric and every eigenvalue is
    /// positive, the spectral formula is used for the whole stack; otherwise
    /// the whole stack goes through the general algorithm.
    pub fn logm(&self, matrices: &Stack<DMatrix<T>>) -> Result<Stack<DMatrix<T>>> {
        ensure_square(matrices)?;
        if self.is_symmetric(matrices) {
            let eigens = matrices.map(|m| m.clone().symmetric_eigen());
            let all_positive = eigens
                .iter()
                .all(|e| e.eigenvalues.iter().all(|&l| l > T::zero()));
            if all_positive {
                return Ok(eigens.map(|e| functions::spectral_apply(e, <T as num_traits::Float>::ln)));
            }
        }

        self.report_fallback("logm: general principal-logarithm algorithm");
        let tolerances = &self.tolerances;
        matrices.par_try_map(tolerances.parallel_batch_threshold, |m| {
            functions::general_logm(m, tolerances)
        })
    }

    /// Principal matrix square root of each matrix.
    pub fn sqrtm(&self, matrices: &Stack<DMatrix<T>>) -> Result<Stack<DMatrix<T>>> {
        ensure_square(matrices)?;
        let tolerances = &self.tolerances;
        matrices.par_try_map(tolerances.parallel_batch_threshold, |m| {
            functions::sqrtm(m, tolerances)
        })
    }

    /// Solves `A X + X B = Q` for each triple.
    ///
    /// Stacks of length 1 broadcast against longer ones; the result is a
    /// `Batch` as soon as one input is.
    pub fn solve_sylvester(
        &self,
        a: &Stack<DMatrix<T>>,
        b: &Stack<DMatrix<T>>,
        q: &Stack<DMatrix<T>>,
    ) -> Result<Stack<DMatrix<T>>> {
        let n = crate::batch::broadcast_len(
            crate::batch::broadcast_len(a.len(), b.len())?,
            q.len(),
        )?;

        let mut solutions = Vec::with_capacity(n);
        for i in 0..n {
            let (ai, bi, qi) = (a.broadcast_get(i), b.broadcast_get(i), q.broadcast_get(i));
            check_sylvester_shapes(ai, bi, qi)?;
            let x = match functions::symmetric_sylvester(ai, bi, qi, &self.tolerances) {
                Some(x) => x,
                None => {
                    self.report_fallback("solve_sylvester: general Kronecker solver");
                    functions::general_sylvester(ai, bi, qi)?
                }
            };
            solutions.push(x);
        }

        let layout = [a, b, q].into_iter().find(|s| s.is_batch()).unwrap_or(a);
        layout.with_items(solutions)
    }

    /// Cholesky-based positive-definiteness test of each matrix.
    ///
    /// Non-square matrices are reported as `false`. A failure other than
    /// "not positive definite" is returned as
    /// [`ManifoldError::DecompositionFailed`].
    pub fn is_positive_definite(&self, matrices: &Stack<DMatrix<T>>) -> Result<Stack<bool>> {
        matrices.try_map(functions::is_positive_definite_matrix)
    }

    /// Reduced QR factorization `(Q, R)` of each matrix.
    pub fn qr(&self, matrices: &Stack<DMatrix<T>>) -> Stack<(DMatrix<T>, DMatrix<T>)> {
        matrices.map(|m| {
            let qr = m.clone().qr();
            (qr.q(), qr.r())
        })
    }

    /// True when every matrix of the stack is symmetric within the configured
    /// tolerance.
    pub fn is_symmetric(&self, matrices: &Stack<DMatrix<T>>) -> bool {
        matrices
            .iter()
            .all(|m| is_symmetric_matrix(m, self.tolerances.symmetry))
    }
}

fn ensure_square<T: Scalar>(matrices: &Stack<DMatrix<T>>) -> Result<()> {
    match matrices.iter().find(|m| !m.is_square() || m.is_empty()) {
        Some(m) => Err(ManifoldError::dimension_mismatch(
            "non-empty square matrix",
            format!("{}x{} matrix", m.nrows(), m.ncols()),
        )),
        None => Ok(()),
    }
}

fn check_sylvester_shapes<T: Scalar>(a: &DMatrix<T>, b: &DMatrix<T>, q: &DMatrix<T>) -> Result<()> {
    if !a.is_square() || !b.is_square() {
        return Err(ManifoldError::dimension_mismatch(
            "square A and B",
            format!(
                "A {}x{}, B {}x{}",
                a.nrows(),
                a.ncols(),
                b.nrows(),
                b.ncols()
            ),
        ));
    }
    if q.nrows() != a.nrows() || q.ncols() != b.nrows() {
        return Err(ManifoldError::dimension_mismatch(
            format!("Q of shape {}x{}", a.nrows(), b.nrows()),
            format!("{}x{}", q.nrows(), q.ncols()),
        ));
    }
    Ok(())
}

/// Matrix exponential with the default backend.
pub fn expm<T: Scalar>(matrices: &Stack<DMatrix<T>>) -> Result<Stack<DMatrix<T>>> {
    DenseBackend::new().expm(matrices)
}

/// Principal matrix logarithm with the default backend.
pub fn logm<T: Scalar>(matrices: &Stack<DMatrix<T>>) -> Result<Stack<DMatrix<T>>> {
    DenseBackend::new().logm(matrices)
}

/// Principal matrix square root with the default backend.
pub fn sqrtm<T: Scalar>(matrices: &Stack<DMatrix<T>>) -> Result<Stack<DMatrix<T>>> {
    DenseBackend::new().sqrtm(matrices)
}

/// Sylvester solve `A X + X B = Q` with the default backend.
pub fn solve_sylvester<T: Scalar>(
    a: &Stack<DMatrix<T>>,
    b: &Stack<DMatrix<T>>,
    q: &Stack<DMatrix<T>>,
) -> Result<Stack<DMatrix<T>>> {
    DenseBackend::new().solve_sylvester(a, b, q)
}

/// Positive-definiteness test with the default backend.
pub fn is_positive_definite<T: Scalar>(matrices: &Stack<DMatrix<T>>) -> Result<Stack<bool>> {
    DenseBackend::new().is_positive_definite(matrices)
}

/// Reduced QR factorization with the default backend.
pub fn qr<T: Scalar>(matrices: &Stack<DMatrix<T>>) -> Stack<(DMatrix<T>, DMatrix<T>)> {
    DenseBackend::new().qr(matrices)
}

/// General (non-spectral) branches, exposed to compare against the
/// symmetric shortcuts.
pub mod general {
    use super::functions;
    use crate::{
        config::Tolerances,
        error::Result,
        types::{DMatrix, Scalar},
    };

    /// Principal logarithm by inverse scaling and squaring.
    pub fn logm<T: Scalar>(matrix: &DMatrix<T>) -> Result<DMatrix<T>> {
        functions::general_logm(matrix, &Tolerances::default())
    }

    /// Sylvester solve through the Kronecker form.
    pub fn solve_sylvester<T: Scalar>(a: &DMatrix<T>, b: &DMatrix<T>, q: &DMatrix<T>) -> Result<DMatrix<T>> {
        functions::general_sylvester(a, b, q)
    }

    /// Principal square root by the Denman–Beavers iteration.
    pub fn sqrtm<T: Scalar>(matrix: &DMatrix<T>) -> Result<DMatrix<T>> {
        functions::denman_beavers(matrix, Tolerances::<T>::default().max_sqrt_iterations)
    }
}
