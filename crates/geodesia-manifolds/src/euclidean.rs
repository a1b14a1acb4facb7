//! Euclidean ambient metric.
//!
//! The hypersphere inherits its metric from the embedding space R^{d+1}: the
//! inner product of two tangent vectors is their plain dot product.

use geodesia_core::{
    batch::{broadcast_len, PointBatch},
    error::Result,
    types::{DVector, Scalar},
};
use num_traits::Float;

/// Inner-product structure of an ambient space, evaluated sample by sample.
///
/// Inputs are batches of column vectors; a batch of length 1 broadcasts
/// against the other operand.
pub trait EmbeddingMetric<T: Scalar> {
    /// Dimension of the ambient space.
    fn ambient_dimension(&self) -> usize;

    /// Inner product `⟨a_i, b_i⟩` of each pair of samples.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if a sample does not have the ambient dimension or
    /// the batch lengths do not broadcast.
    fn inner_product(&self, a: &PointBatch<T>, b: &PointBatch<T>) -> Result<DVector<T>>;

    /// Squared norm of each sample.
    fn squared_norm(&self, vector: &PointBatch<T>) -> Result<DVector<T>> {
        self.inner_product(vector, vector)
    }

    /// Norm of each sample.
    fn norm(&self, vector: &PointBatch<T>) -> Result<DVector<T>> {
        Ok(self.squared_norm(vector)?.map(Float::sqrt))
    }
}

/// The dot product of R^n.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EuclideanMetric {
    dim: usize,
}

impl EuclideanMetric {
    /// Metric of R^dim.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Dimension n of R^n.
    pub fn ambient_dimension(&self) -> usize {
        self.dim
    }
}

impl<T: Scalar> EmbeddingMetric<T> for EuclideanMetric {
    fn ambient_dimension(&self) -> usize {
        self.dim
    }

    fn inner_product(&self, a: &PointBatch<T>, b: &PointBatch<T>) -> Result<DVector<T>> {
        a.ensure_dim(self.dim)?;
        b.ensure_dim(self.dim)?;
        let n = broadcast_len(a.len(), b.len())?;
        Ok(DVector::from_fn(n, |i, _| {
            a.broadcast_column(i).dot(&b.broadcast_column(i))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geodesia_core::ManifoldError;

    #[test]
    fn test_inner_product_broadcasts_single_sample() {
        let metric = EuclideanMetric::new(3);
        let a = PointBatch::from_rows(3, &[&[1.0, 2.0, 3.0]]).unwrap();
        let b = PointBatch::from_rows(3, &[&[1.0, 0.0, 0.0], &[0.0, 1.0, 1.0]]).unwrap();

        let ip = metric.inner_product(&a, &b).unwrap();
        assert_eq!(ip.len(), 2);
        assert_relative_eq!(ip[0], 1.0);
        assert_relative_eq!(ip[1], 5.0);
    }

    #[test]
    fn test_norms() {
        let metric = EuclideanMetric::new(2);
        let v = PointBatch::from_rows(2, &[&[3.0, 4.0], &[0.0, 0.0]]).unwrap();
        let sq = EmbeddingMetric::<f64>::squared_norm(&metric, &v).unwrap();
        let norm = EmbeddingMetric::<f64>::norm(&metric, &v).unwrap();
        assert_relative_eq!(sq[0], 25.0);
        assert_relative_eq!(norm[0], 5.0);
        assert_eq!(norm[1], 0.0);
    }

    #[test]
    fn test_dimension_and_length_mismatch() {
        let metric = EuclideanMetric::new(3);
        let a = PointBatch::from_rows(2, &[&[1.0, 0.0]]).unwrap();
        let b = PointBatch::from_rows(3, &[&[1.0, 0.0, 0.0]]).unwrap();
        assert!(matches!(
            metric.inner_product(&a, &b),
            Err(ManifoldError::DimensionMismatch { .. })
        ));

        let c = PointBatch::<f64>::zeros(3, 2);
        let d = PointBatch::<f64>::zeros(3, 3);
        assert!(metric.inner_product(&c, &d).is_err());
    }
}
