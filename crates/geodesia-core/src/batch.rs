//! Batched representations.
//!
//! Two shapes of batch are used throughout the library:
//!
//! - [`PointBatch`]: a uniform batch of vectors stored as a `dim × n` matrix
//!   (each column is a sample). A batch of length 1 stands for a single
//!   vector and broadcasts against batches of any length.
//! - [`Stack`]: matrices given either as a single matrix or as a batch. The
//!   variant of the input is preserved by every matrix function.

use crate::{
    error::{ManifoldError, Result},
    types::{DMatrix, DVector, Scalar},
};
use nalgebra::DVectorView;

/// Batch of vectors, one per column.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBatch<T: Scalar> {
    data: DMatrix<T>,
}

impl<T: Scalar> PointBatch<T> {
    /// Wraps a `dim × n` matrix whose columns are the samples.
    pub fn from_matrix(data: DMatrix<T>) -> Self {
        Self { data }
    }

    /// Builds a batch from a list of samples of equal dimension.
    pub fn from_columns(columns: &[DVector<T>]) -> Result<Self> {
        let first = columns
            .first()
            .ok_or_else(|| ManifoldError::precondition("a batch needs at least one sample"))?;
        let dim = first.len();
        if let Some(bad) = columns.iter().find(|c| c.len() != dim) {
            return Err(ManifoldError::dimension_mismatch(dim, bad.len()));
        }
        Ok(Self {
            data: DMatrix::from_columns(columns),
        })
    }

    /// Builds a batch from row-major samples: `rows[i]` is sample `i`.
    pub fn from_rows(dim: usize, rows: &[&[T]]) -> Result<Self> {
        if rows.is_empty() {
            return Err(ManifoldError::precondition(
                "a batch needs at least one sample",
            ));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != dim) {
            return Err(ManifoldError::dimension_mismatch(dim, bad.len()));
        }
        Ok(Self {
            data: DMatrix::from_fn(dim, rows.len(), |i, j| rows[j][i]),
        })
    }

    /// Batch of length 1.
    pub fn single(vector: DVector<T>) -> Self {
        let dim = vector.len();
        Self {
            data: DMatrix::from_column_slice(dim, 1, vector.as_slice()),
        }
    }

    /// Batch of `n` zero vectors of dimension `dim`.
    pub fn zeros(dim: usize, n: usize) -> Self {
        Self {
            data: DMatrix::zeros(dim, n),
        }
    }

    /// Dimension of each sample.
    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.data.ncols()
    }

    /// True when the batch holds no sample.
    pub fn is_empty(&self) -> bool {
        self.data.ncols() == 0
    }

    /// View of sample `i`.
    pub fn column(&self, i: usize) -> DVectorView<'_, T> {
        self.data.column(i)
    }

    /// View of sample `i` under broadcasting: a batch of length 1 serves
    /// every index.
    pub fn broadcast_column(&self, i: usize) -> DVectorView<'_, T> {
        if self.len() == 1 {
            self.data.column(0)
        } else {
            self.data.column(i)
        }
    }

    /// Overwrites sample `i`.
    pub fn set_column(&mut self, i: usize, value: &DVector<T>) {
        self.data.set_column(i, value);
    }

    /// Owned copy of sample `i`.
    pub fn to_vector(&self, i: usize) -> DVector<T> {
        self.data.column(i).into_owned()
    }

    /// Underlying `dim × n` matrix.
    pub fn as_matrix(&self) -> &DMatrix<T> {
        &self.data
    }

    /// Consumes the batch into its `dim × n` matrix.
    pub fn into_matrix(self) -> DMatrix<T> {
        self.data
    }

    /// Fails unless every sample has dimension `dim`.
    pub fn ensure_dim(&self, dim: usize) -> Result<()> {
        if self.dim() == dim {
            Ok(())
        } else {
            Err(ManifoldError::dimension_mismatch(dim, self.dim()))
        }
    }
}

impl<T: Scalar> std::ops::Neg for &PointBatch<T> {
    type Output = PointBatch<T>;

    fn neg(self) -> PointBatch<T> {
        PointBatch {
            data: -&self.data,
        }
    }
}

impl<T: Scalar> From<DVector<T>> for PointBatch<T> {
    fn from(vector: DVector<T>) -> Self {
        Self::single(vector)
    }
}

/// Length of the batch obtained by broadcasting batches of lengths `a` and `b`.
///
/// Lengths broadcast when they are equal or when one of them is 1.
pub fn broadcast_len(a: usize, b: usize) -> Result<usize> {
    if a == b || b == 1 {
        Ok(a)
    } else if a == 1 {
        Ok(b)
    } else {
        Err(ManifoldError::dimension_mismatch(
            format!("batch length {a} or 1"),
            format!("batch length {b}"),
        ))
    }
}

/// A single item or a batch of items.
///
/// Matrix functions map `Single` to `Single` and `Batch` to `Batch`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stack<M> {
    /// One item
    Single(M),
    /// Ordered batch of items
    Batch(Vec<M>),
}

impl<M> Stack<M> {
    /// Number of items.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(items) => items.len(),
        }
    }

    /// True for an empty batch.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for the `Batch` variant.
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Items as a slice.
    pub fn as_slice(&self) -> &[M] {
        match self {
            Self::Single(item) => std::slice::from_ref(item),
            Self::Batch(items) => items,
        }
    }

    /// Item `i`, broadcasting a single item (or a batch of length 1) over
    /// every index.
    pub fn broadcast_get(&self, i: usize) -> &M {
        let items = self.as_slice();
        if items.len() == 1 {
            &items[0]
        } else {
            &items[i]
        }
    }

    /// Iterator over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.as_slice().iter()
    }

    /// The single item, if this is the `Single` variant.
    pub fn into_single(self) -> Option<M> {
        match self {
            Self::Single(item) => Some(item),
            Self::Batch(_) => None,
        }
    }

    /// Maps every item, keeping the variant.
    pub fn map<U, F>(&self, f: F) -> Stack<U>
    where
        F: Fn(&M) -> U,
    {
        match self {
            Self::Single(item) => Stack::Single(f(item)),
            Self::Batch(items) => Stack::Batch(items.iter().map(f).collect()),
        }
    }

    /// Fallible map keeping the variant; the first error aborts the map.
    pub fn try_map<U, F>(&self, f: F) -> Result<Stack<U>>
    where
        F: Fn(&M) -> Result<U>,
    {
        match self {
            Self::Single(item) => Ok(Stack::Single(f(item)?)),
            Self::Batch(items) => Ok(Stack::Batch(
                items.iter().map(f).collect::<Result<Vec<_>>>()?,
            )),
        }
    }

    /// Rebuilds a stack of the same variant from per-item results.
    ///
    /// `items` must hold exactly one element for the `Single` variant.
    pub fn with_items<U>(&self, items: Vec<U>) -> Result<Stack<U>> {
        match self {
            Self::Single(_) => {
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(item), None) => Ok(Stack::Single(item)),
                    _ => Err(ManifoldError::dimension_mismatch(
                        "one item",
                        "several items",
                    )),
                }
            }
            Self::Batch(_) => Ok(Stack::Batch(items)),
        }
    }
}

impl<M: Sync> Stack<M> {
    /// Fallible map keeping the variant, running on the rayon pool once the
    /// batch holds at least `threshold` items.
    #[cfg(feature = "parallel")]
    pub fn par_try_map<U, F>(&self, threshold: usize, f: F) -> Result<Stack<U>>
    where
        U: Send,
        F: Fn(&M) -> Result<U> + Sync + Send,
    {
        use rayon::prelude::*;

        match self {
            Self::Batch(items) if items.len() >= threshold => Ok(Stack::Batch(
                items.par_iter().map(f).collect::<Result<Vec<_>>>()?,
            )),
            _ => self.try_map(f),
        }
    }

    /// Sequential fallback when the `parallel` feature is disabled.
    #[cfg(not(feature = "parallel"))]
    pub fn par_try_map<U, F>(&self, _threshold: usize, f: F) -> Result<Stack<U>>
    where
        U: Send,
        F: Fn(&M) -> Result<U> + Sync + Send,
    {
        self.try_map(f)
    }
}

impl<M> From<M> for Stack<M> {
    fn from(item: M) -> Self {
        Self::Single(item)
    }
}
