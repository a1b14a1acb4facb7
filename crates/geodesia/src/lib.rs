//! # Geodesia
//!
//! Batched geometry of the hypersphere S^d and the dense matrix functions it
//! builds on.
//!
//! - [`geodesia_core`]: scalar types, point batches, tolerances, diagnostics and the
//!   dense linear-algebra backend (`expm`, `logm`, `sqrtm`, Sylvester solve,
//!   positive-definiteness test)
//! - [`geodesia_manifolds`]: the hypersphere and its Riemannian metric
//!
//! ## Quick start
//!
//! ```
//! use geodesia::prelude::*;
//!
//! let sphere = Hypersphere::<f64>::new(2)?;
//! let base = PointBatch::from_rows(3, &[&[0.0, 0.0, 1.0]])?;
//! let v = PointBatch::from_rows(3, &[&[0.5, 0.0, 0.0], &[0.0, 0.25, 0.0]])?;
//!
//! let end = sphere.metric().exp(&v, &base)?;
//! let dist = sphere.metric().distance(&end, &base)?;
//! assert!((dist[0] - 0.5).abs() < 1e-12);
//! # Ok::<(), ManifoldError>(())
//! ```

pub use geodesia_core;
pub use geodesia_manifolds;

pub use nalgebra;

/// Prelude module for convenient imports
pub mod prelude {
    pub use geodesia_core::prelude::*;
    pub use geodesia_manifolds::{
        ChristoffelSymbols, CoordinateSystem, EmbeddingMetric, EuclideanMetric, Hypersphere,
        HypersphereMetric,
    };
}
