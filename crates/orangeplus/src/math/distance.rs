//! Distance metrics for neighbourhood queries.
//!
//! ## Purpose
//!
//! This module provides the named dissimilarity measures offered by the
//! clustering widget, keyed by the names users know from SciPy and
//! scikit-learn.
//!
//! ## Design notes
//!
//! * **Aliases**: `l1`, `cityblock` and `manhattan` are the same measure, as are
//!   `l2`, `euclidean` and `minkowski` (with p = 2). They remain separate
//!   variants because neighbour-search strategies accept them by name.
//! * **Degenerate vectors**: Cosine and correlation distances of a zero
//!   (or constant) vector are 1; Bray-Curtis of two zero vectors is 0; Canberra
//!   terms with a zero denominator contribute 0.
//!
//! ## Invariants
//!
//! * Distances are non-negative and symmetric.
//! * Identical points are at distance zero, except under cosine and
//!   correlation when the shared vector is degenerate.
//! * All measures return finite values for finite inputs.

// External dependencies
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// Internal dependencies
use crate::primitives::errors::WidgetError;

// ============================================================================
// Distance Metric Enum
// ============================================================================

/// Point-to-point dissimilarity measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Sum of absolute differences.
    Cityblock,
    /// One minus the cosine of the angle between the vectors.
    Cosine,
    /// Square root of the sum of squared differences.
    Euclidean,
    /// Alias of `Cityblock`.
    L1,
    /// Alias of `Euclidean`.
    L2,
    /// Alias of `Cityblock`.
    Manhattan,
    /// `sum |u - v| / sum |u + v|`.
    Braycurtis,
    /// `sum |u - v| / (|u| + |v|)`.
    Canberra,
    /// Largest absolute coordinate difference.
    Chebyshev,
    /// One minus the Pearson correlation of the vectors.
    Correlation,
    /// Fraction of differing coordinates.
    Hamming,
    /// Minkowski distance with p = 2.
    #[default]
    Minkowski,
    /// Sum of squared differences.
    Sqeuclidean,
}

impl DistanceMetric {
    /// All metrics in the order the settings panel lists them.
    pub const ALL: [DistanceMetric; 13] = [
        DistanceMetric::Cityblock,
        DistanceMetric::Cosine,
        DistanceMetric::Euclidean,
        DistanceMetric::L1,
        DistanceMetric::L2,
        DistanceMetric::Manhattan,
        DistanceMetric::Braycurtis,
        DistanceMetric::Canberra,
        DistanceMetric::Chebyshev,
        DistanceMetric::Correlation,
        DistanceMetric::Hamming,
        DistanceMetric::Minkowski,
        DistanceMetric::Sqeuclidean,
    ];

    /// Implementation key, also used as the display label.
    #[inline]
    pub const fn key(&self) -> &'static str {
        match self {
            DistanceMetric::Cityblock => "cityblock",
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::L1 => "l1",
            DistanceMetric::L2 => "l2",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Braycurtis => "braycurtis",
            DistanceMetric::Canberra => "canberra",
            DistanceMetric::Chebyshev => "chebyshev",
            DistanceMetric::Correlation => "correlation",
            DistanceMetric::Hamming => "hamming",
            DistanceMetric::Minkowski => "minkowski",
            DistanceMetric::Sqeuclidean => "sqeuclidean",
        }
    }

    /// Position of the metric in [`DistanceMetric::ALL`].
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|m| m == self).unwrap_or(0)
    }

    /// Whether the metric is a member of the Minkowski family (L1, L2, L-inf).
    pub const fn is_minkowski_family(&self) -> bool {
        matches!(
            self,
            DistanceMetric::Cityblock
                | DistanceMetric::Euclidean
                | DistanceMetric::L1
                | DistanceMetric::L2
                | DistanceMetric::Manhattan
                | DistanceMetric::Chebyshev
                | DistanceMetric::Minkowski
        )
    }

    /// Compute the distance between two points of equal dimension.
    pub fn distance<T: Float>(&self, a: &[T], b: &[T]) -> T {
        debug_assert_eq!(a.len(), b.len());
        match self {
            DistanceMetric::Cityblock | DistanceMetric::L1 | DistanceMetric::Manhattan => a
                .iter()
                .zip(b)
                .fold(T::zero(), |acc, (&x, &y)| acc + (x - y).abs()),
            DistanceMetric::Euclidean | DistanceMetric::L2 | DistanceMetric::Minkowski => {
                squared_euclidean(a, b).sqrt()
            }
            DistanceMetric::Sqeuclidean => squared_euclidean(a, b),
            DistanceMetric::Chebyshev => a
                .iter()
                .zip(b)
                .fold(T::zero(), |acc, (&x, &y)| acc.max((x - y).abs())),
            DistanceMetric::Cosine => cosine(a.iter().copied(), b.iter().copied()),
            DistanceMetric::Correlation => {
                let mean_a = mean(a);
                let mean_b = mean(b);
                cosine(
                    a.iter().map(|&x| x - mean_a),
                    b.iter().map(|&y| y - mean_b),
                )
            }
            DistanceMetric::Braycurtis => {
                let (num, den) = a.iter().zip(b).fold(
                    (T::zero(), T::zero()),
                    |(num, den), (&x, &y)| (num + (x - y).abs(), den + (x + y).abs()),
                );
                if den > T::zero() {
                    num / den
                } else {
                    T::zero()
                }
            }
            DistanceMetric::Canberra => a.iter().zip(b).fold(T::zero(), |acc, (&x, &y)| {
                let den = x.abs() + y.abs();
                if den > T::zero() {
                    acc + (x - y).abs() / den
                } else {
                    acc
                }
            }),
            DistanceMetric::Hamming => {
                if a.is_empty() {
                    return T::zero();
                }
                let differing = a.iter().zip(b).filter(|(x, y)| x != y).count();
                T::from(differing).unwrap_or_else(T::zero)
                    / T::from(a.len()).unwrap_or_else(T::one)
            }
        }
    }
}

impl Display for DistanceMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DistanceMetric {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| WidgetError::UnknownVariant {
                kind: "metric",
                name: s.to_string(),
            })
    }
}

// ============================================================================
// Helpers
// ============================================================================

#[inline]
fn squared_euclidean<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b).fold(T::zero(), |acc, (&x, &y)| {
        let d = x - y;
        acc + d * d
    })
}

#[inline]
fn mean<T: Float>(v: &[T]) -> T {
    if v.is_empty() {
        return T::zero();
    }
    v.iter().fold(T::zero(), |acc, &x| acc + x) / T::from(v.len()).unwrap_or_else(T::one)
}

fn cosine<T: Float>(a: impl Iterator<Item = T>, b: impl Iterator<Item = T>) -> T {
    let (dot, na, nb) = a.zip(b).fold(
        (T::zero(), T::zero(), T::zero()),
        |(dot, na, nb), (x, y)| (dot + x * y, na + x * x, nb + y * y),
    );
    if na > T::zero() && nb > T::zero() {
        let norm = na.sqrt() * nb.sqrt();
        // Rounding can push the similarity past +-1.
        let two = T::one() + T::one();
        (T::one() - dot / norm).max(T::zero()).min(two)
    } else {
        T::one()
    }
}
