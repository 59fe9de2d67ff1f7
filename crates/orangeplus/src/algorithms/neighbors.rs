//! Neighbour search strategies and exact nearest-neighbour queries.
//!
//! ## Purpose
//!
//! This module names the neighbour-search strategies a user can choose
//! between, records which distance metrics each strategy accepts, and answers
//! the neighbourhood queries needed by OPTICS and SMOTE.
//!
//! ## Design notes
//!
//! * **Exact search**: Every strategy answers queries exactly with a full
//!   distance scan, so the choice of strategy never changes results. The
//!   strategy still governs which metrics are accepted.
//! * **Deterministic ties**: Neighbours at equal distance are ordered by index.
//!
//! ## Key concepts
//!
//! * **kd tree**: Minkowski-family metrics only.
//! * **Ball tree**: Minkowski family plus Bray-Curtis, Canberra and Hamming.
//! * **Brute force**: Any metric.
//! * **Auto**: The first of kd tree, ball tree and brute force that accepts the metric.
//!
//! ## Invariants
//!
//! * A `NearestNeighbors` index only exists for a compatible metric/strategy pair.
//! * Core distances count the query point itself as its own nearest neighbour.
//!
//! ## Non-goals
//!
//! * Approximate search and materialised tree structures.

// External dependencies
use core::cmp::Ordering;
use num_traits::Float;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// Internal dependencies
use crate::math::distance::DistanceMetric;
use crate::primitives::errors::WidgetError;
use crate::primitives::points::PointSet;

// ============================================================================
// Neighbour Algorithm
// ============================================================================

/// Neighbour-search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborAlgorithm {
    /// Pick the most specific strategy that accepts the metric.
    #[default]
    Auto,

    /// Ball tree.
    BallTree,

    /// kd tree.
    KdTree,

    /// Exhaustive pairwise scan.
    Brute,
}

impl NeighborAlgorithm {
    /// All strategies in the order the settings panel lists them.
    pub const ALL: [NeighborAlgorithm; 4] = [
        NeighborAlgorithm::Auto,
        NeighborAlgorithm::BallTree,
        NeighborAlgorithm::KdTree,
        NeighborAlgorithm::Brute,
    ];

    /// Display name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            NeighborAlgorithm::Auto => "Auto",
            NeighborAlgorithm::BallTree => "Ball Tree",
            NeighborAlgorithm::KdTree => "kd Tree",
            NeighborAlgorithm::Brute => "Brute",
        }
    }

    /// Implementation key.
    #[inline]
    pub const fn key(&self) -> &'static str {
        match self {
            NeighborAlgorithm::Auto => "auto",
            NeighborAlgorithm::BallTree => "ball_tree",
            NeighborAlgorithm::KdTree => "kd_tree",
            NeighborAlgorithm::Brute => "brute",
        }
    }

    /// Whether this strategy accepts `metric`.
    pub const fn supports(&self, metric: DistanceMetric) -> bool {
        match self {
            NeighborAlgorithm::KdTree => metric.is_minkowski_family(),
            NeighborAlgorithm::BallTree => {
                metric.is_minkowski_family()
                    || matches!(
                        metric,
                        DistanceMetric::Braycurtis
                            | DistanceMetric::Canberra
                            | DistanceMetric::Hamming
                    )
            }
            NeighborAlgorithm::Auto | NeighborAlgorithm::Brute => true,
        }
    }

    /// Fail with `IncompatibleMetric` unless `metric` is accepted.
    pub fn check(&self, metric: DistanceMetric) -> Result<(), WidgetError> {
        if self.supports(metric) {
            Ok(())
        } else {
            Err(WidgetError::IncompatibleMetric {
                metric: metric.key(),
                algorithm: self.key(),
            })
        }
    }

    /// Concrete strategy used for `metric`.
    ///
    /// `Auto` resolves to the first of kd tree, ball tree and brute force that
    /// accepts the metric; other strategies resolve to themselves.
    pub const fn resolve(&self, metric: DistanceMetric) -> NeighborAlgorithm {
        match self {
            NeighborAlgorithm::Auto => {
                if NeighborAlgorithm::KdTree.supports(metric) {
                    NeighborAlgorithm::KdTree
                } else if NeighborAlgorithm::BallTree.supports(metric) {
                    NeighborAlgorithm::BallTree
                } else {
                    NeighborAlgorithm::Brute
                }
            }
            other => *other,
        }
    }
}

impl Display for NeighborAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NeighborAlgorithm {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.key().eq_ignore_ascii_case(s) || a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| WidgetError::UnknownVariant {
                kind: "algorithm",
                name: s.to_string(),
            })
    }
}

// ============================================================================
// Nearest Neighbours
// ============================================================================

/// Exact neighbourhood queries over a fixed point set.
#[derive(Debug, Clone, Copy)]
pub struct NearestNeighbors<'a, T> {
    points: PointSet<'a, T>,
    metric: DistanceMetric,
    algorithm: NeighborAlgorithm,
}

impl<'a, T: Float> NearestNeighbors<'a, T> {
    /// Build an index, rejecting incompatible metric/strategy pairs.
    pub fn new(
        points: PointSet<'a, T>,
        metric: DistanceMetric,
        algorithm: NeighborAlgorithm,
    ) -> Result<Self, WidgetError> {
        algorithm.check(metric)?;
        Ok(Self {
            points,
            metric,
            algorithm: algorithm.resolve(metric),
        })
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distance metric in use.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Resolved search strategy (never `Auto`).
    pub fn algorithm(&self) -> NeighborAlgorithm {
        self.algorithm
    }

    /// Distance between indexed points `i` and `j`.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> T {
        self.metric.distance(self.points.row(i), self.points.row(j))
    }

    /// Distances from point `i` to every indexed point (itself included).
    pub fn distances_from(&self, i: usize) -> Vec<T> {
        let origin = self.points.row(i);
        self.points
            .rows()
            .map(|row| self.metric.distance(origin, row))
            .collect()
    }

    /// Distance from point `i` to its `k`-th nearest point, counting itself.
    ///
    /// Returns infinity when fewer than `k` points exist.
    pub fn kth_distance(&self, i: usize, k: usize) -> T {
        if k == 0 || k > self.len() {
            return T::infinity();
        }
        let mut dists = self.distances_from(i);
        let (_, kth, _) = dists.select_nth_unstable_by(k - 1, total_cmp);
        *kth
    }

    /// Indices of the `k` nearest neighbours of every point, excluding itself.
    ///
    /// Neighbours are ordered by distance, then by index.
    pub fn kneighbors_excluding_self(&self, k: usize) -> Vec<Vec<usize>> {
        (0..self.len())
            .map(|i| {
                let dists = self.distances_from(i);
                let mut order: Vec<usize> = (0..self.len()).filter(|&j| j != i).collect();
                order.sort_by(|&a, &b| total_cmp(&dists[a], &dists[b]).then(a.cmp(&b)));
                order.truncate(k);
                order
            })
            .collect()
    }
}

impl<'a, T: Float + Send + Sync> NearestNeighbors<'a, T> {
    /// Core distance of every point for neighbourhood size `min_samples`.
    pub fn core_distances(&self, min_samples: usize) -> Vec<T> {
        #[cfg(feature = "parallel")]
        {
            (0..self.len())
                .into_par_iter()
                .map(|i| self.kth_distance(i, min_samples))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            (0..self.len())
                .map(|i| self.kth_distance(i, min_samples))
                .collect()
        }
    }
}

/// Total order on floats with NaN sorted last.
#[inline]
fn total_cmp<T: Float>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or_else(|| match (a.is_nan(), b.is_nan()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    })
}
