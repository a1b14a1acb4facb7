//! Riemannian metric of the hypersphere.
//!
//! Closed forms of the exponential and logarithmic maps, the geodesic
//! distance and the parallel transport along great circles, for batches of
//! extrinsic points.
//!
//! # Numerical branches
//!
//! The coefficients `cos θ`, `sin θ / θ`, `θ / sin θ` and `θ / tan θ` are
//! singular or ill-conditioned near θ = 0. Samples whose angle satisfies
//! `isclose(θ, 0)` use truncated Taylor series instead; every other sample
//! uses the exact trigonometric ratio. The selection is made per sample.

use crate::{
    euclidean::{EmbeddingMetric, EuclideanMetric},
    hypersphere::tangent_projection,
};
use geodesia_core::{
    batch::{broadcast_len, PointBatch},
    config::Tolerances,
    error::{ManifoldError, Result},
    numerical::{all_close, clip, isclose, taylor_cos, taylor_inv_sinc, taylor_inv_tanc, taylor_sinc},
    types::{DMatrix, DVector, Scalar},
};
use num_traits::Float;

/// Christoffel symbols at one point: `symbols[k][(i, j)]` is Γ^k_{ij}.
pub type ChristoffelSymbols<T> = Vec<DMatrix<T>>;

/// Coordinate system in which a point is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateSystem {
    /// Coordinates of the ambient space R^{d+1}
    Extrinsic,
    /// Last d ambient coordinates, the first one being implied
    Intrinsic,
    /// Angles (θ, φ) on the 2-sphere
    Spherical,
}

/// Metric of S^d induced by the Euclidean metric of R^{d+1}.
#[derive(Debug, Clone)]
pub struct HypersphereMetric<T: Scalar = f64> {
    dimension: usize,
    embedding_metric: EuclideanMetric,
    tolerances: Tolerances<T>,
}

impl<T: Scalar> HypersphereMetric<T> {
    /// Metric of the hypersphere S^dimension.
    ///
    /// # Errors
    /// Returns `PreconditionViolated` if `dimension` is 0.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(ManifoldError::precondition(
                "hypersphere dimension must be at least 1",
            ));
        }
        Ok(Self {
            dimension,
            embedding_metric: EuclideanMetric::new(dimension + 1),
            tolerances: Tolerances::default(),
        })
    }

    /// Replaces the tolerances used for branch selection.
    #[must_use]
    pub fn with_tolerances(mut self, tolerances: Tolerances<T>) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Intrinsic dimension d.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The ambient Euclidean metric.
    pub fn embedding_metric(&self) -> &EuclideanMetric {
        &self.embedding_metric
    }

    fn is_near_zero(&self, x: T) -> bool {
        isclose(x, T::zero(), self.tolerances.isclose_rtol, self.tolerances.isclose_atol)
    }

    /// Inner product of tangent vectors, that of the ambient space.
    pub fn inner_product(&self, a: &PointBatch<T>, b: &PointBatch<T>) -> Result<DVector<T>> {
        self.embedding_metric.inner_product(a, b)
    }

    /// Squared norm of tangent vectors.
    pub fn squared_norm(&self, vector: &PointBatch<T>) -> Result<DVector<T>> {
        self.embedding_metric.squared_norm(vector)
    }

    /// Norm of tangent vectors.
    pub fn norm(&self, vector: &PointBatch<T>) -> Result<DVector<T>> {
        self.embedding_metric.norm(vector)
    }

    /// Riemannian exponential of `tangent_vec` at `base_point`.
    ///
    /// The tangent vector is first projected on the tangent space at the base
    /// point. With θ the norm of the projection `v`, the result is
    /// `cos θ · p + (sin θ / θ) · v`.
    ///
    /// # Errors
    /// `DimensionMismatch` on a wrong sample dimension or on batch lengths
    /// that do not broadcast.
    pub fn exp(&self, tangent_vec: &PointBatch<T>, base_point: &PointBatch<T>) -> Result<PointBatch<T>> {
        let projected = tangent_projection(&self.embedding_metric, tangent_vec, base_point)?;
        let theta = self.embedding_metric.norm(&projected)?;
        let n = projected.len();

        let near_zero: Vec<bool> = theta.iter().map(|&t| self.is_near_zero(t)).collect();
        let taylor: Vec<(T, T)> = theta.iter().map(|&t| (taylor_cos(t), taylor_sinc(t))).collect();
        let exact: Vec<(T, T)> = theta
            .iter()
            .zip(&near_zero)
            .map(|(&t, &small)| {
                if small {
                    (T::one(), T::one())
                } else {
                    (Float::cos(t), Float::sin(t) / t)
                }
            })
            .collect();

        let mut result = PointBatch::zeros(self.embedding_metric.ambient_dimension(), n);
        for i in 0..n {
            let (coef_base, coef_tangent) = if near_zero[i] { taylor[i] } else { exact[i] };
            result.set_column(
                i,
                &(base_point.broadcast_column(i) * coef_base + projected.column(i) * coef_tangent),
            );
        }
        Ok(result)
    }

    /// Riemannian logarithm of `point` at `base_point`.
    ///
    /// With `θ = arccos(⟨x, p⟩ / (‖x‖ ‖p‖))`, the result is
    /// `(θ / sin θ) · x - (θ / tan θ) · p`. Samples whose point and base point
    /// are elementwise close map to the exact zero vector. Antipodal points
    /// have no unique logarithm and yield huge or non-finite coordinates.
    ///
    /// # Errors
    /// `DimensionMismatch` on a wrong sample dimension or on batch lengths
    /// that do not broadcast.
    pub fn log(&self, point: &PointBatch<T>, base_point: &PointBatch<T>) -> Result<PointBatch<T>> {
        let angle = self.angles(point, base_point)?;
        let n = angle.len();
        let (rtol, atol) = (self.tolerances.isclose_rtol, self.tolerances.isclose_atol);

        let mut result = PointBatch::zeros(self.embedding_metric.ambient_dimension(), n);
        for i in 0..n {
            let x = point.broadcast_column(i);
            let p = base_point.broadcast_column(i);
            if all_close(&x, &p, rtol, atol) {
                continue;
            }

            let theta = angle[i];
            let (coef_point, coef_base) = if self.is_near_zero(theta) {
                (taylor_inv_sinc(theta), taylor_inv_tanc(theta))
            } else {
                (theta / Float::sin(theta), theta / Float::tan(theta))
            };
            result.set_column(i, &(x * coef_point - p * coef_base));
        }
        Ok(result)
    }

    /// Geodesic distance `arccos(⟨a, b⟩ / (‖a‖ ‖b‖))`.
    pub fn distance(&self, point_a: &PointBatch<T>, point_b: &PointBatch<T>) -> Result<DVector<T>> {
        self.angles(point_a, point_b)
    }

    fn angles(&self, a: &PointBatch<T>, b: &PointBatch<T>) -> Result<DVector<T>> {
        let norm_a = self.embedding_metric.norm(a)?;
        let norm_b = self.embedding_metric.norm(b)?;
        let inner = self.embedding_metric.inner_product(a, b)?;
        let n = broadcast_len(a.len(), b.len())?;

        Ok(DVector::from_fn(n, |i, _| {
            let na = norm_a[if a.len() == 1 { 0 } else { i }];
            let nb = norm_b[if b.len() == 1 { 0 } else { i }];
            let cos_angle = clip(inner[i] / (na * nb), -T::one(), T::one());
            Float::acos(cos_angle)
        }))
    }

    /// Parallel transport of `tangent_vec_a` along the geodesic
    /// `t ↦ exp(t · tangent_vec_b, base_point)`, evaluated at t = 1.
    ///
    /// With θ = ‖b‖, n = b / θ and `a_n = ⟨a, n⟩`, the result is
    /// `-sin θ · a_n · p + cos θ · a_n · n + (a - a_n · n)`.
    ///
    /// # Errors
    /// - `PreconditionViolated` if the three batches differ in length or a
    ///   sample of `tangent_vec_b` is zero
    /// - `DimensionMismatch` on a wrong sample dimension
    pub fn parallel_transport(
        &self,
        tangent_vec_a: &PointBatch<T>,
        tangent_vec_b: &PointBatch<T>,
        base_point: &PointBatch<T>,
    ) -> Result<PointBatch<T>> {
        let dim = self.embedding_metric.ambient_dimension();
        tangent_vec_a.ensure_dim(dim)?;
        tangent_vec_b.ensure_dim(dim)?;
        base_point.ensure_dim(dim)?;

        let n = base_point.len();
        if tangent_vec_a.len() != n || tangent_vec_b.len() != n {
            return Err(ManifoldError::precondition(format!(
                "parallel transport needs batches of equal length, got {}, {} and {}",
                tangent_vec_a.len(),
                tangent_vec_b.len(),
                n
            )));
        }

        let theta = self.embedding_metric.norm(tangent_vec_b)?;
        let mut result = PointBatch::zeros(dim, n);
        for i in 0..n {
            let t = theta[i];
            if t == T::zero() {
                return Err(ManifoldError::precondition(format!(
                    "sample {i} of the transport direction is zero"
                )));
            }
            let direction = tangent_vec_b.column(i) / t;
            let a = tangent_vec_a.column(i);
            let pb = a.dot(&direction);
            let transported = base_point.column(i) * (-Float::sin(t) * pb)
                + &direction * (Float::cos(t) * pb)
                + (a - &direction * pb);
            result.set_column(i, &transported);
        }
        Ok(result)
    }

    /// Christoffel symbols at each point.
    ///
    /// Only the 2-sphere in spherical coordinates (θ, φ) is supported:
    /// `Γ⁰₁₁ = -sin θ cos θ` and `Γ¹₀₁ = Γ¹₁₀ = cos θ / sin θ`, every other
    /// symbol being zero.
    ///
    /// # Errors
    /// - `NotSupported` for any other dimension or coordinate system
    /// - `DimensionMismatch` if the samples are not pairs of angles
    pub fn christoffel_symbols(
        &self,
        point: &PointBatch<T>,
        coordinates: CoordinateSystem,
    ) -> Result<Vec<ChristoffelSymbols<T>>> {
        if self.dimension != 2 || coordinates != CoordinateSystem::Spherical {
            return Err(ManifoldError::not_supported(format!(
                "Christoffel symbols of S^{} in {coordinates:?} coordinates \
                 (only the 2-sphere in spherical coordinates is supported)",
                self.dimension
            )));
        }
        point.ensure_dim(2)?;

        Ok((0..point.len())
            .map(|s| {
                let theta = point.column(s)[0];
                let (sin, cos) = Float::sin_cos(theta);

                let mut gamma_0 = DMatrix::zeros(2, 2);
                gamma_0[(1, 1)] = -sin * cos;

                let mut gamma_1 = DMatrix::zeros(2, 2);
                gamma_1[(0, 1)] = cos / sin;
                gamma_1[(1, 0)] = cos / sin;

                vec![gamma_0, gamma_1]
            })
            .collect())
    }

    /// [`exp`](Self::exp) of a single tangent vector.
    pub fn exp_single(&self, tangent_vec: &DVector<T>, base_point: &DVector<T>) -> Result<DVector<T>> {
        Ok(self
            .exp(&PointBatch::single(tangent_vec.clone()), &PointBatch::single(base_point.clone()))?
            .to_vector(0))
    }

    /// [`log`](Self::log) of a single point.
    pub fn log_single(&self, point: &DVector<T>, base_point: &DVector<T>) -> Result<DVector<T>> {
        Ok(self
            .log(&PointBatch::single(point.clone()), &PointBatch::single(base_point.clone()))?
            .to_vector(0))
    }

    /// [`distance`](Self::distance) between two single points.
    pub fn distance_single(&self, point_a: &DVector<T>, point_b: &DVector<T>) -> Result<T> {
        Ok(self.distance(&PointBatch::single(point_a.clone()), &PointBatch::single(point_b.clone()))?[0])
    }

    /// [`parallel_transport`](Self::parallel_transport) of a single vector.
    pub fn parallel_transport_single(
        &self,
        tangent_vec_a: &DVector<T>,
        tangent_vec_b: &DVector<T>,
        base_point: &DVector<T>,
    ) -> Result<DVector<T>> {
        Ok(self
            .parallel_transport(
                &PointBatch::single(tangent_vec_a.clone()),
                &PointBatch::single(tangent_vec_b.clone()),
                &PointBatch::single(base_point.clone()),
            )?
            .to_vector(0))
    }
}
