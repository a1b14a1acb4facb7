//! Hypersphere S^d = {x in R^{d+1} : ||x|| = 1}
//!
//! Points are given in extrinsic coordinates, as vectors of the ambient space
//! R^{d+1}. Every operation works on batches of samples (one per column) and
//! broadcasts a batch of length 1 against longer batches.

use crate::{
    euclidean::{EmbeddingMetric, EuclideanMetric},
    hypersphere_metric::HypersphereMetric,
};
use geodesia_core::{
    batch::{broadcast_len, PointBatch},
    config::Tolerances,
    diagnostics::{default_sink, Diagnostic, DiagnosticKind, DiagnosticsSink},
    error::{ManifoldError, Result},
    types::Scalar,
};
use num_traits::Float;
use std::sync::Arc;

/// The unit hypersphere S^d embedded in R^{d+1}.
///
/// # Mathematical Properties
///
/// - **Dimension**: d (ambient dimension d + 1)
/// - **Tangent space**: T_p S^d = {v in R^{d+1} : ⟨v, p⟩ = 0}
/// - **Riemannian metric**: induced by the Euclidean metric of R^{d+1}
/// - **Geodesics**: great circles
///
/// # Example
///
/// ```
/// use geodesia_manifolds::Hypersphere;
/// use geodesia_core::PointBatch;
///
/// let sphere = Hypersphere::<f64>::new(2)?;
/// let points = PointBatch::from_rows(3, &[&[0.0, 0.0, 1.0], &[0.0, 0.0, 2.0]])?;
/// assert_eq!(sphere.belongs(&points), vec![true, false]);
/// # Ok::<(), geodesia_core::ManifoldError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Hypersphere<T: Scalar = f64> {
    dimension: usize,
    embedding_metric: EuclideanMetric,
    metric: HypersphereMetric<T>,
    tolerances: Tolerances<T>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl<T: Scalar> Hypersphere<T> {
    /// Creates the hypersphere S^dimension.
    ///
    /// # Errors
    /// Returns `PreconditionViolated` if `dimension` is 0.
    pub fn new(dimension: usize) -> Result<Self> {
        let metric = HypersphereMetric::new(dimension)?;
        Ok(Self {
            dimension,
            embedding_metric: EuclideanMetric::new(dimension + 1),
            metric,
            tolerances: Tolerances::default(),
            diagnostics: default_sink(),
        })
    }

    /// Replaces the tolerances, for the sphere and its metric.
    #[must_use]
    pub fn with_tolerances(mut self, tolerances: Tolerances<T>) -> Self {
        self.metric = self.metric.with_tolerances(tolerances);
        self.tolerances = tolerances;
        self
    }

    /// Replaces the sink receiving advisory diagnostics.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Intrinsic dimension d.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Dimension of the embedding space, d + 1.
    pub fn ambient_dimension(&self) -> usize {
        self.dimension + 1
    }

    /// The Riemannian metric of the sphere.
    pub fn metric(&self) -> &HypersphereMetric<T> {
        &self.metric
    }

    /// The tolerances in use.
    pub fn tolerances(&self) -> &Tolerances<T> {
        &self.tolerances
    }

    /// Membership test with the configured tolerance.
    pub fn belongs(&self, point: &PointBatch<T>) -> Vec<bool> {
        self.belongs_with_tolerance(point, self.tolerances.belongs)
    }

    /// Tests `|⟨p, p⟩ - 1| <= tolerance` for each sample.
    ///
    /// Samples of the wrong dimension do not belong. When they have the
    /// intrinsic dimension d, a diagnostic reminds the caller to use
    /// extrinsic coordinates.
    pub fn belongs_with_tolerance(&self, point: &PointBatch<T>, tolerance: T) -> Vec<bool> {
        if point.dim() != self.ambient_dimension() {
            if point.dim() == self.dimension {
                self.diagnostics.report(&Diagnostic::new(
                    DiagnosticKind::IntrinsicCoordinates,
                    "use the extrinsic coordinates to represent points on the hypersphere",
                ));
            }
            return vec![false; point.len()];
        }

        (0..point.len())
            .map(|i| Float::abs(point.column(i).norm_squared() - T::one()) <= tolerance)
            .collect()
    }

    /// Projects each sample onto the sphere by dividing by its norm.
    ///
    /// A zero sample has no projection; its image is not finite.
    pub fn projection(&self, point: &PointBatch<T>) -> Result<PointBatch<T>> {
        let norms = self.embedding_metric.norm(point)?;
        let mut projected = point.clone();
        for i in 0..point.len() {
            projected.set_column(i, &(point.column(i) / norms[i]));
        }
        Ok(projected)
    }

    /// Projects ambient vectors onto the tangent space at `base_point`:
    /// `v - (⟨v, p⟩ / ⟨p, p⟩) p`.
    pub fn projection_to_tangent_space(
        &self,
        vector: &PointBatch<T>,
        base_point: &PointBatch<T>,
    ) -> Result<PointBatch<T>> {
        tangent_projection(&self.embedding_metric, vector, base_point)
    }

    /// Canonical representative of points already on the sphere.
    ///
    /// # Errors
    /// Returns `PreconditionViolated` if a sample does not belong to the
    /// sphere.
    pub fn regularize(&self, point: &PointBatch<T>) -> Result<PointBatch<T>> {
        if let Some(i) = self.belongs(point).iter().position(|&b| !b) {
            return Err(ManifoldError::precondition(format!(
                "sample {i} does not belong to the hypersphere S^{}",
                self.dimension
            )));
        }
        self.projection(point)
    }
}

/// `v - (⟨p, v⟩ / ⟨p, p⟩) p`, with `⟨p, p⟩` recomputed rather than assumed 1.
pub(crate) fn tangent_projection<T: Scalar>(
    embedding_metric: &EuclideanMetric,
    vector: &PointBatch<T>,
    base_point: &PointBatch<T>,
) -> Result<PointBatch<T>> {
    let sq_norm = embedding_metric.squared_norm(base_point)?;
    let inner = embedding_metric.inner_product(base_point, vector)?;
    let n = broadcast_len(vector.len(), base_point.len())?;

    let mut tangent = PointBatch::zeros(embedding_metric.ambient_dimension(), n);
    for i in 0..n {
        let p = base_point.broadcast_column(i);
        let coef = inner[i] / sq_norm[if sq_norm.len() == 1 { 0 } else { i }];
        tangent.set_column(i, &(vector.broadcast_column(i) - p * coef));
    }
    Ok(tangent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geodesia_core::diagnostics::CollectingSink;

    #[test]
    fn test_new_rejects_zero_dimension() {
        assert!(matches!(
            Hypersphere::<f64>::new(0),
            Err(ManifoldError::PreconditionViolated { .. })
        ));
        let sphere = Hypersphere::<f64>::new(3).unwrap();
        assert_eq!(sphere.dimension(), 3);
        assert_eq!(sphere.ambient_dimension(), 4);
    }

    #[test]
    fn test_belongs() {
        let sphere = Hypersphere::<f64>::new(2).unwrap();
        let points = PointBatch::from_rows(
            3,
            &[&[1.0, 0.0, 0.0], &[0.6, 0.8, 0.0], &[1.0, 1.0, 0.0], &[0.0, 0.0, 1.0 + 1e-7]],
        )
        .unwrap();
        assert_eq!(sphere.belongs(&points), vec![true, true, false, true]);
        assert_eq!(
            sphere.belongs_with_tolerance(&points, 1e-9),
            vec![true, true, false, false]
        );
    }

    #[test]
    fn test_belongs_warns_on_intrinsic_coordinates() {
        let sink = Arc::new(CollectingSink::new());
        let sphere = Hypersphere::<f64>::new(2).unwrap().with_diagnostics(sink.clone());

        let intrinsic = PointBatch::from_rows(2, &[&[0.3, 1.2], &[1.0, 0.0]]).unwrap();
        assert_eq!(sphere.belongs(&intrinsic), vec![false, false]);
        assert_eq!(sink.count(DiagnosticKind::IntrinsicCoordinates), 1);

        let wrong = PointBatch::from_rows(5, &[&[1.0, 0.0, 0.0, 0.0, 0.0]]).unwrap();
        assert_eq!(sphere.belongs(&wrong), vec![false]);
        assert_eq!(sink.count(DiagnosticKind::IntrinsicCoordinates), 1);
    }

    #[test]
    fn test_projection() {
        let sphere = Hypersphere::<f64>::new(2).unwrap();
        let points = PointBatch::from_rows(3, &[&[3.0, 0.0, 4.0], &[0.0, -2.0, 0.0]]).unwrap();
        let projected = sphere.projection(&points).unwrap();
        assert_relative_eq!(projected.column(0)[0], 0.6);
        assert_relative_eq!(projected.column(0)[2], 0.8);
        assert_relative_eq!(projected.column(1)[1], -1.0);
        assert!(sphere.belongs(&projected).iter().all(|&b| b));
    }

    #[test]
    fn test_projection_to_tangent_space_is_orthogonal() {
        let sphere = Hypersphere::<f64>::new(2).unwrap();
        let base = PointBatch::from_rows(3, &[&[0.0, 0.6, 0.8]]).unwrap();
        let vectors = PointBatch::from_rows(3, &[&[1.0, 2.0, 3.0], &[-1.0, 0.5, 0.0]]).unwrap();

        let tangent = sphere.projection_to_tangent_space(&vectors, &base).unwrap();
        assert_eq!(tangent.len(), 2);
        for i in 0..2 {
            assert_relative_eq!(tangent.column(i).dot(&base.column(0)), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_projection_to_tangent_space_uses_actual_norm() {
        let sphere = Hypersphere::<f64>::new(1).unwrap();
        let base = PointBatch::from_rows(2, &[&[2.0, 0.0]]).unwrap();
        let vector = PointBatch::from_rows(2, &[&[1.0, 1.0]]).unwrap();
        let tangent = sphere.projection_to_tangent_space(&vector, &base).unwrap();
        assert_relative_eq!(tangent.column(0)[0], 0.0, epsilon = 1e-15);
        assert_relative_eq!(tangent.column(0)[1], 1.0);
    }

    #[test]
    fn test_regularize() {
        let sphere = Hypersphere::<f64>::new(2).unwrap();
        let on = PointBatch::from_rows(3, &[&[0.0, 1.0, 0.0]]).unwrap();
        assert_eq!(sphere.regularize(&on).unwrap(), on);

        let off = PointBatch::from_rows(3, &[&[0.0, 1.0, 0.0], &[0.0, 2.0, 0.0]]).unwrap();
        assert!(matches!(
            sphere.regularize(&off),
            Err(ManifoldError::PreconditionViolated { .. })
        ));
    }
}
