//! Row-major point storage for the numerical layers.
//!
//! ## Purpose
//!
//! Algorithms operate on contiguous row-major buffers rather than on tables.
//! `PointSet` is a borrowed `n x d` view with cheap row access.
//!
//! ## Invariants
//!
//! * `data.len() == n * dim`.
//! * Row `i` occupies `data[i * dim..(i + 1) * dim]`.

// External dependencies
use ndarray::{Array2, ArrayView2};
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::WidgetError;

/// Borrowed row-major matrix of points.
#[derive(Debug, Clone, Copy)]
pub struct PointSet<'a, T> {
    data: &'a [T],
    dim: usize,
}

impl<'a, T: Float> PointSet<'a, T> {
    /// Wrap a row-major buffer of `dim`-dimensional points.
    pub fn new(data: &'a [T], dim: usize) -> Result<Self, WidgetError> {
        if dim == 0 {
            if !data.is_empty() {
                return Err(WidgetError::InvalidInput(
                    "zero-dimensional points cannot carry values".to_string(),
                ));
            }
        } else if data.len() % dim != 0 {
            return Err(WidgetError::ShapeMismatch {
                what: "point buffer",
                expected: (data.len() / dim + 1) * dim,
                got: data.len(),
            });
        }
        Ok(Self { data, dim })
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    /// Whether there are no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality of each point.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinates of point `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [T] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Underlying buffer.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }

    /// Index of the first non-finite coordinate, as `(row, column)`.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|p| (p / self.dim.max(1), p % self.dim.max(1)))
    }
}

/// Copy an ndarray matrix into a row-major buffer.
pub fn to_row_major<T: Float>(matrix: ArrayView2<'_, T>) -> Vec<T> {
    matrix.iter().copied().collect()
}

/// Rebuild an owned matrix from a row-major buffer.
pub fn from_row_major<T: Float>(data: Vec<T>, dim: usize) -> Result<Array2<T>, WidgetError> {
    let rows = if dim == 0 { 0 } else { data.len() / dim };
    Array2::from_shape_vec((rows, dim), data)
        .map_err(|e| WidgetError::InvalidInput(format!("cannot reshape points: {e}")))
}
