//! Core types, batching and dense linear algebra for hypersphere geometry.
//!
//! This crate provides the foundations shared by the manifold crates: the
//! scalar abstraction, batched vectors and matrix stacks with broadcasting,
//! the numerical guards that select Taylor branches near singular points, and
//! a dense backend for matrix functions.
//!
//! # Key Concepts
//!
//! - **Point batches**: `dim × n` matrices whose columns are samples; a batch
//!   of length 1 broadcasts against any other length
//! - **Stacks**: a single matrix or a batch of matrices; matrix functions keep
//!   the variant of their input
//! - **Tolerances**: the thresholds that decide branch selection, configurable
//!   through a builder
//! - **Diagnostics**: advisory reports routed through an injectable sink
//!
//! # Modules
//!
//! - [`batch`]: Point batches, matrix stacks and broadcasting
//! - [`config`]: Tolerances and iteration limits
//! - [`diagnostics`]: Advisory diagnostics and their sinks
//! - [`error`]: Error types for manifold and matrix operations
//! - [`linalg`]: Dense matrix functions (`expm`, `logm`, `sqrtm`, Sylvester, ...)
//! - [`numerical`]: Closeness predicates and Taylor expansions
//! - [`types`]: Scalar trait, type aliases and numerical constants

pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod linalg;
pub mod numerical;
pub mod types;

pub use batch::{PointBatch, Stack};
pub use config::Tolerances;
pub use error::{ManifoldError, Result};
pub use linalg::DenseBackend;
pub use types::Scalar;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::batch::{broadcast_len, PointBatch, Stack};
    pub use crate::config::{Tolerances, TolerancesBuilder};
    pub use crate::diagnostics::{
        CollectingSink, Diagnostic, DiagnosticKind, DiagnosticsSink, TracingSink,
    };
    pub use crate::error::{ManifoldError, Result};
    pub use crate::linalg::{
        expm, is_positive_definite, logm, qr, solve_sylvester, sqrtm, DenseBackend,
    };
    pub use crate::types::{DMatrix, DVector, Scalar};
}
