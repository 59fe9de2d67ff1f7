//! Multivariate Gaussian kernel density estimation.
//!
//! ## Purpose
//!
//! This module fits a Gaussian kernel density estimate to a set of points and
//! evaluates the estimated density at arbitrary query points.
//!
//! ## Design notes
//!
//! * **Full covariance**: The kernel shape follows the sample covariance, so
//!   correlated attributes produce tilted kernels.
//! * **Cholesky factor**: The covariance is factored once at fit time;
//!   each evaluation solves a triangular system instead of inverting.
//! * **Parallelism**: With the `parallel` feature, batches of query points are
//!   evaluated with `rayon`. Each query is independent, so results match the
//!   sequential path exactly.
//!
//! ## Key concepts
//!
//! * **Kernel covariance**: `Sigma = cov(X) * factor^2`.
//! * **Density**: `f(p) = sum_i exp(-0.5 * maha(p, x_i)^2) / (n * sqrt(det(2 pi Sigma)))`.
//!
//! ## Invariants
//!
//! * A fitted estimator has a positive definite covariance.
//! * Densities are non-negative and finite.
//!
//! ## Non-goals
//!
//! * This module does not choose grids or extents.
//! * Per-point weights and custom bandwidth matrices are not supported.

// External dependencies
use num_traits::Float;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Internal dependencies
use crate::math::kernel::{gaussian, normalization, BandwidthMethod};
use crate::primitives::errors::WidgetError;
use crate::primitives::points::PointSet;

// ============================================================================
// Gaussian KDE
// ============================================================================

/// Fitted Gaussian kernel density estimate.
#[derive(Debug, Clone)]
pub struct GaussianKde<T> {
    data: Vec<T>,
    dim: usize,
    factor: T,
    covariance: Vec<T>,
    cholesky: Vec<T>,
    norm: T,
}

impl<T: Float> GaussianKde<T> {
    /// Fit the estimator to `points` using the given bandwidth rule.
    pub fn fit(points: PointSet<'_, T>, method: BandwidthMethod) -> Result<Self, WidgetError> {
        let n = points.len();
        let dim = points.dim();
        if n < 2 {
            return Err(WidgetError::TooFewInstances { got: n, min: 2 });
        }
        if dim == 0 {
            return Err(WidgetError::InvalidInput(
                "density estimation needs at least one dimension".to_string(),
            ));
        }

        let factor: T = method.factor(n, dim);
        let mut covariance = sample_covariance(points);
        let f2 = factor * factor;
        covariance.iter_mut().for_each(|c| *c = *c * f2);

        let cholesky = cholesky(&covariance, dim).ok_or(WidgetError::SingularCovariance)?;
        let det = (0..dim).fold(T::one(), |acc, i| {
            let l = cholesky[i * dim + i];
            acc * l * l
        });
        let norm = normalization(det, dim, n);
        if !norm.is_finite() {
            return Err(WidgetError::SingularCovariance);
        }

        log::trace!("kde fit: n={n}, d={dim}, method={method}");

        Ok(Self {
            data: points.as_slice().to_vec(),
            dim,
            factor,
            covariance,
            cholesky,
            norm,
        })
    }

    /// Number of fitted points.
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Whether the estimator holds no points.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Bandwidth factor applied to the sample covariance.
    pub fn factor(&self) -> T {
        self.factor
    }

    /// Kernel covariance, row-major `dim x dim`.
    pub fn covariance(&self) -> &[T] {
        &self.covariance
    }

    /// Density at a single point.
    pub fn evaluate(&self, point: &[T]) -> T {
        debug_assert_eq!(point.len(), self.dim);
        let mut diff = vec![T::zero(); self.dim];
        let sum = self
            .data
            .chunks_exact(self.dim)
            .fold(T::zero(), |acc, x| {
                for (d, (&p, &xi)) in diff.iter_mut().zip(point.iter().zip(x)) {
                    *d = p - xi;
                }
                acc + gaussian(self.squared_mahalanobis(&mut diff))
            });
        sum * self.norm
    }

    /// Squared Mahalanobis norm of `diff`; `diff` is overwritten.
    fn squared_mahalanobis(&self, diff: &mut [T]) -> T {
        // Forward substitution: L z = diff.
        let dim = self.dim;
        let mut acc = T::zero();
        for i in 0..dim {
            let mut s = diff[i];
            for k in 0..i {
                s = s - self.cholesky[i * dim + k] * diff[k];
            }
            let z = s / self.cholesky[i * dim + i];
            diff[i] = z;
            acc = acc + z * z;
        }
        acc
    }
}

impl<T: Float + Send + Sync> GaussianKde<T> {
    /// Densities at every point of `queries`, in order.
    pub fn evaluate_many(&self, queries: PointSet<'_, T>) -> Vec<T> {
        if queries.dim() != self.dim {
            return Vec::new();
        }

        #[cfg(feature = "parallel")]
        {
            queries
                .as_slice()
                .par_chunks_exact(self.dim)
                .map(|q| self.evaluate(q))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            queries.rows().map(|q| self.evaluate(q)).collect()
        }
    }
}

// ============================================================================
// Linear Algebra Helpers
// ============================================================================

/// Unbiased sample covariance, row-major `dim x dim`.
fn sample_covariance<T: Float>(points: PointSet<'_, T>) -> Vec<T> {
    let n = points.len();
    let dim = points.dim();
    let n_t = T::from(n).unwrap_or_else(T::one);

    let mut mean = vec![T::zero(); dim];
    for row in points.rows() {
        for (m, &v) in mean.iter_mut().zip(row) {
            *m = *m + v;
        }
    }
    mean.iter_mut().for_each(|m| *m = *m / n_t);

    let mut cov = vec![T::zero(); dim * dim];
    for row in points.rows() {
        for a in 0..dim {
            let da = row[a] - mean[a];
            for b in a..dim {
                cov[a * dim + b] = cov[a * dim + b] + da * (row[b] - mean[b]);
            }
        }
    }

    let denom = n_t - T::one();
    for a in 0..dim {
        for b in a..dim {
            let v = cov[a * dim + b] / denom;
            cov[a * dim + b] = v;
            cov[b * dim + a] = v;
        }
    }
    cov
}

/// Lower Cholesky factor of a symmetric matrix, `None` if not positive definite.
fn cholesky<T: Float>(matrix: &[T], dim: usize) -> Option<Vec<T>> {
    let scale = (0..dim)
        .map(|i| matrix[i * dim + i].abs())
        .fold(T::zero(), T::max);
    // Pivots below this relative size are rounding noise of a rank-deficient matrix.
    let tol = T::epsilon().sqrt() * scale;

    let mut l = vec![T::zero(); dim * dim];
    for j in 0..dim {
        let mut pivot = matrix[j * dim + j];
        for k in 0..j {
            pivot = pivot - l[j * dim + k] * l[j * dim + k];
        }
        if pivot <= tol || !pivot.is_finite() {
            return None;
        }
        let ljj = pivot.sqrt();
        l[j * dim + j] = ljj;

        for i in (j + 1)..dim {
            let mut s = matrix[i * dim + j];
            for k in 0..j {
                s = s - l[i * dim + k] * l[j * dim + k];
            }
            l[i * dim + j] = s / ljj;
        }
    }
    Some(l)
}
