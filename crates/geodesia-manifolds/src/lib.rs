//! Geodesia Manifolds - the hypersphere and its Riemannian metric.
//!
//! This crate provides the hypersphere S^d embedded in R^{d+1}: membership,
//! projections, and the closed-form exponential and logarithmic maps,
//! geodesic distance, parallel transport and Christoffel symbols of its
//! metric. All operations work on batches of samples stored one per column.

pub mod euclidean;
pub mod hypersphere;
pub mod hypersphere_metric;

// Re-export main types for convenience
pub use euclidean::{EmbeddingMetric, EuclideanMetric};
pub use hypersphere::Hypersphere;
pub use hypersphere_metric::{ChristoffelSymbols, CoordinateSystem, HypersphereMetric};
