//! Synthetic minority oversampling (SMOTE).
//!
//! ## Purpose
//!
//! This module rebalances a labelled point set by synthesizing new points
//! on the segments between class members and their nearest same-class
//! neighbours.
//!
//! ## Design notes
//!
//! * **Class order**: Classes are visited in ascending label order; ties for
//!   majority or minority resolve to the lower label.
//! * **Seeding**: Each class draws from a fresh `StdRng` seeded with the same
//!   seed, so a class's synthetic rows do not depend on which other classes
//!   are resampled.
//! * **Neighbour clamp**: The neighbour count is capped at one less than the
//!   smallest class size.
//!
//! ## Key concepts
//!
//! * **Target**: Number of rows to generate for a class, derived from the
//!   sampling strategy and the majority count.
//! * **Interpolation**: `x_new = x + step * (x_nn - x)`, `step` uniform in `[0, 1)`.
//!
//! ## Invariants
//!
//! * Original points come first, unchanged and in input order.
//! * The output never has fewer points than the input.
//!
//! ## Non-goals
//!
//! * Undersampling and SMOTE variants (borderline, SVM, ADASYN).
//! * Categorical features.

// External dependencies
use num_traits::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// Internal dependencies
use crate::algorithms::neighbors::{NearestNeighbors, NeighborAlgorithm};
use crate::math::distance::DistanceMetric;
use crate::primitives::errors::WidgetError;
use crate::primitives::points::PointSet;

// ============================================================================
// Sampling Strategy
// ============================================================================

/// Which classes are oversampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Same as `NotMajority`.
    #[default]
    Auto,

    /// Every class.
    All,

    /// Every class except the majority.
    #[serde(rename = "not majority", alias = "not_majority")]
    NotMajority,

    /// Only the minority class.
    Minority,

    /// Every class except the minority.
    #[serde(rename = "not minority", alias = "not_minority")]
    NotMinority,
}

impl SamplingStrategy {
    /// All strategies in the order the settings panel lists them.
    pub const ALL: [SamplingStrategy; 5] = [
        SamplingStrategy::Auto,
        SamplingStrategy::All,
        SamplingStrategy::NotMajority,
        SamplingStrategy::Minority,
        SamplingStrategy::NotMinority,
    ];

    /// Display name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            SamplingStrategy::Auto => "Auto",
            SamplingStrategy::All => "All",
            SamplingStrategy::NotMajority => "Not majority",
            SamplingStrategy::Minority => "Minority",
            SamplingStrategy::NotMinority => "Not minority",
        }
    }

    /// Implementation key.
    #[inline]
    pub const fn key(&self) -> &'static str {
        match self {
            SamplingStrategy::Auto => "auto",
            SamplingStrategy::All => "all",
            SamplingStrategy::NotMajority => "not majority",
            SamplingStrategy::Minority => "minority",
            SamplingStrategy::NotMinority => "not minority",
        }
    }

    /// Rows to generate per class, in ascending class order.
    pub fn targets(&self, counts: &ClassCounts) -> Vec<(usize, usize)> {
        let (Some(majority), Some(minority)) = (counts.majority(), counts.minority()) else {
            return Vec::new();
        };
        let n_majority = counts.count(majority);
        counts
            .iter()
            .filter(|&(class, _)| match self {
                SamplingStrategy::Minority => class == minority,
                SamplingStrategy::Auto | SamplingStrategy::NotMajority => class != majority,
                SamplingStrategy::NotMinority => class != minority,
                SamplingStrategy::All => true,
            })
            .map(|(class, count)| (class, n_majority - count))
            .collect()
    }
}

impl Display for SamplingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SamplingStrategy {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| WidgetError::UnknownVariant {
                kind: "sampling strategy",
                name: s.to_string(),
            })
    }
}

// ============================================================================
// Class Counts
// ============================================================================

/// Number of points per class label, in ascending label order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassCounts {
    counts: BTreeMap<usize, usize>,
}

impl ClassCounts {
    /// Count the labels.
    pub fn from_labels(labels: &[usize]) -> Self {
        let mut counts = BTreeMap::new();
        for &label in labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Number of distinct classes present.
    pub fn n_classes(&self) -> usize {
        self.counts.len()
    }

    /// Total number of points.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Count of `class` (zero when absent).
    pub fn count(&self, class: usize) -> usize {
        self.counts.get(&class).copied().unwrap_or(0)
    }

    /// `(class, count)` pairs in ascending class order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(&c, &n)| (c, n))
    }

    /// Largest class, lowest label on ties.
    pub fn majority(&self) -> Option<usize> {
        self.iter()
            .fold(None, |best: Option<(usize, usize)>, (c, n)| match best {
                Some((_, bn)) if bn >= n => best,
                _ => Some((c, n)),
            })
            .map(|(c, _)| c)
    }

    /// Smallest class, lowest label on ties.
    pub fn minority(&self) -> Option<usize> {
        self.iter()
            .fold(None, |best: Option<(usize, usize)>, (c, n)| match best {
                Some((_, bn)) if bn <= n => best,
                _ => Some((c, n)),
            })
            .map(|(c, _)| c)
    }

    /// Size of the smallest class.
    pub fn minority_count(&self) -> usize {
        self.minority().map(|c| self.count(c)).unwrap_or(0)
    }
}

// ============================================================================
// SMOTE
// ============================================================================

/// Configured oversampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Smote {
    /// Which classes to oversample.
    pub strategy: SamplingStrategy,
    /// Requested number of neighbours per point.
    pub k_neighbors: usize,
    /// Seed for every per-class random stream.
    pub random_seed: u64,
}

/// Resampled points and labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Resampled<T> {
    /// Row-major points: originals followed by synthetic rows.
    pub data: Vec<T>,
    /// Label of every row.
    pub labels: Vec<usize>,
    /// Number of original rows at the front of `data`.
    pub n_original: usize,
    /// Neighbour count actually used.
    pub effective_k: usize,
    /// Class counts before resampling.
    pub counts_before: ClassCounts,
    /// Class counts after resampling.
    pub counts_after: ClassCounts,
}

impl<T> Resampled<T> {
    /// Number of synthetic rows.
    pub fn n_synthetic(&self) -> usize {
        self.labels.len() - self.n_original
    }
}

impl Smote {
    /// Neighbour count after capping at `minority_count - 1`.
    pub fn effective_k(&self, minority_count: usize) -> usize {
        self.k_neighbors.min(minority_count.saturating_sub(1))
    }

    /// Oversample `points` labelled by `labels`.
    pub fn fit_resample<T: Float>(
        &self,
        points: PointSet<'_, T>,
        labels: &[usize],
    ) -> Result<Resampled<T>, WidgetError> {
        if labels.len() != points.len() {
            return Err(WidgetError::ShapeMismatch {
                what: "class labels",
                expected: points.len(),
                got: labels.len(),
            });
        }

        let counts = ClassCounts::from_labels(labels);
        if counts.n_classes() < 2 {
            return Err(WidgetError::SingleClass);
        }

        let minority_count = counts.minority_count();
        let effective_k = self.effective_k(minority_count);
        let targets = self.strategy.targets(&counts);
        let needed: usize = targets.iter().map(|&(_, t)| t).sum();
        if needed > 0 && effective_k < 1 {
            return Err(WidgetError::InsufficientMinorityClass {
                count: minority_count,
            });
        }
        if effective_k < self.k_neighbors {
            log::debug!(
                "k_neighbors clamped from {} to {effective_k} (smallest class has {minority_count} rows)",
                self.k_neighbors
            );
        }

        let dim = points.dim();
        let mut data = Vec::with_capacity((labels.len() + needed) * dim);
        data.extend_from_slice(points.as_slice());
        let mut out_labels = Vec::with_capacity(labels.len() + needed);
        out_labels.extend_from_slice(labels);

        for &(class, n_new) in &targets {
            if n_new == 0 {
                continue;
            }
            let class_data: Vec<T> = labels
                .iter()
                .enumerate()
                .filter(|&(_, &l)| l == class)
                .flat_map(|(i, _)| points.row(i).iter().copied())
                .collect();
            let class_points = PointSet::new(&class_data, dim)?;
            let synthetic = self.synthesize(class_points, effective_k, n_new)?;
            log::trace!("class {class}: {} synthetic rows", n_new);
            data.extend(synthetic);
            out_labels.extend(std::iter::repeat_n(class, n_new));
        }

        let counts_after = ClassCounts::from_labels(&out_labels);
        Ok(Resampled {
            data,
            labels: out_labels,
            n_original: labels.len(),
            effective_k,
            counts_before: counts,
            counts_after,
        })
    }

    /// Generate `n_new` rows from the members of one class.
    fn synthesize<T: Float>(
        &self,
        class_points: PointSet<'_, T>,
        k: usize,
        n_new: usize,
    ) -> Result<Vec<T>, WidgetError> {
        let nn = NearestNeighbors::new(
            class_points,
            DistanceMetric::Euclidean,
            NeighborAlgorithm::Brute,
        )?;
        let neighbors = nn.kneighbors_excluding_self(k);
        let m = class_points.len();

        let mut rng = StdRng::seed_from_u64(self.random_seed);
        let sample_indices: Vec<usize> = (0..n_new).map(|_| rng.random_range(0..m * k)).collect();
        let steps: Vec<T> = (0..n_new)
            .map(|_| T::from(rng.random::<f64>()).unwrap_or_else(T::zero))
            .collect();

        let mut out = Vec::with_capacity(n_new * class_points.dim());
        for (&sample, &step) in sample_indices.iter().zip(&steps) {
            let row = sample / k;
            let col = sample % k;
            let origin = class_points.row(row);
            let neighbor = class_points.row(neighbors[row][col]);
            out.extend(
                origin
                    .iter()
                    .zip(neighbor)
                    .map(|(&x, &nb)| x + step * (nb - x)),
            );
        }
        Ok(out)
    }
}
