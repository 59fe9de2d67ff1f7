//! OPTICS ordering and xi-steepness cluster extraction.
//!
//! ## Purpose
//!
//! This module orders points by density reachability and extracts a
//! hierarchy of clusters from the resulting reachability plot by locating
//! steep downward and upward areas.
//!
//! ## Design notes
//!
//! * **Exact graph**: Core and reachability distances come from an exact
//!   neighbour scan with an unbounded radius.
//! * **Deterministic order**: The next point is the unprocessed point with the
//!   smallest reachability; ties go to the lowest index. Candidate
//!   reachabilities are rounded to the decimal precision of `T` (15 digits
//!   for `f64`) before comparison, so rounding noise cannot break ties.
//! * **Predecessor correction**: Candidate clusters are trimmed from the right
//!   until their last point was reached from inside the cluster.
//! * **Labelling**: Clusters are visited in discovery order (inner clusters
//!   before the clusters enclosing them). A cluster is labelled only if none of
//!   its points carry a label yet.
//!
//! ## Key concepts
//!
//! * **Core distance**: Distance to the `min_samples`-th nearest point, the
//!   point itself included.
//! * **Reachability**: `max(core(p), d(p, q))` for the best predecessor `p`.
//! * **Steep point**: `r[i] / r[i + 1]` at most `1 - xi` (upward) or at least
//!   `1 / (1 - xi)` (downward), with a trailing infinite reachability.
//!
//! ## Invariants
//!
//! * `ordering` is a permutation of `0..n`.
//! * The first point in the ordering has infinite reachability.
//! * Cluster spans are inclusive positions in the ordering and hold at least
//!   `min_cluster_size` points.
//!
//! ## Non-goals
//!
//! * DBSCAN-style extraction at a fixed epsilon.
//! * A finite maximum radius.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::neighbors::NearestNeighbors;

// ============================================================================
// Reachability Graph
// ============================================================================

/// Processing order and distances produced by OPTICS.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachabilityGraph<T> {
    /// Point indices in processing order.
    pub ordering: Vec<usize>,
    /// Reachability distance of each point (by point index).
    pub reachability: Vec<T>,
    /// Core distance of each point (by point index).
    pub core_distances: Vec<T>,
    /// Point from which each point was reached, if any.
    pub predecessor: Vec<Option<usize>>,
}

impl<T: Float> ReachabilityGraph<T> {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.ordering.len()
    }

    /// Whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.ordering.is_empty()
    }

    /// Reachability values in processing order.
    pub fn reachability_plot(&self) -> Vec<T> {
        self.ordering.iter().map(|&p| self.reachability[p]).collect()
    }

    /// Predecessors in processing order.
    pub fn predecessor_plot(&self) -> Vec<Option<usize>> {
        self.ordering.iter().map(|&p| self.predecessor[p]).collect()
    }
}

/// Build the reachability graph of the indexed points.
pub fn reachability_graph<T: Float + Send + Sync>(
    nn: &NearestNeighbors<'_, T>,
    min_samples: usize,
) -> ReachabilityGraph<T> {
    let n = nn.len();
    let core_distances = nn.core_distances(min_samples);
    let mut reachability = vec![T::infinity(); n];
    let mut predecessor = vec![None; n];
    let mut processed = vec![false; n];
    let mut ordering = Vec::with_capacity(n);

    for _ in 0..n {
        let point = next_point(&reachability, &processed);
        processed[point] = true;
        ordering.push(point);

        let core = core_distances[point];
        if core.is_infinite() {
            continue;
        }
        for q in (0..n).filter(|&q| !processed[q]) {
            let reach = round_to_precision(nn.distance(point, q).max(core));
            if reach < reachability[q] {
                reachability[q] = reach;
                predecessor[q] = Some(point);
            }
        }
    }

    if reachability.iter().all(|r| r.is_infinite()) {
        log::warn!("all reachability values are infinite; min_samples may be too large");
    }

    ReachabilityGraph {
        ordering,
        reachability,
        core_distances,
        predecessor,
    }
}

/// Round to the decimal precision of `T`, ties to even.
fn round_to_precision<T: Float>(value: T) -> T {
    let digits = (-T::epsilon().log10()).floor().to_i32().unwrap_or(15);
    let scale = T::from(10.0).map_or_else(T::one, |ten| ten.powi(digits));
    let scaled = value * scale;
    let mut rounded = scaled.round();
    if (rounded - scaled).abs() == T::from(0.5).unwrap_or_else(T::zero) {
        let two = T::one() + T::one();
        rounded = (scaled / two).round() * two;
    }
    rounded / scale
}

/// Unprocessed point with the smallest reachability, lowest index on ties.
fn next_point<T: Float>(reachability: &[T], processed: &[bool]) -> usize {
    let mut best: Option<usize> = None;
    for (i, &r) in reachability.iter().enumerate() {
        if processed[i] {
            continue;
        }
        match best {
            Some(b) if reachability[b] <= r => {}
            _ => best = Some(i),
        }
    }
    best.unwrap_or(0)
}

// ============================================================================
// Xi Extraction
// ============================================================================

/// Inclusive range of positions in the processing order forming one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterSpan {
    /// First position.
    pub start: usize,
    /// Last position.
    pub end: usize,
}

impl ClusterSpan {
    /// Number of points in the span.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; spans hold at least one point.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Steep downward area awaiting a matching upward area.
#[derive(Debug, Clone, Copy)]
struct SteepDownArea<T> {
    start: usize,
    end: usize,
    mib: T,
}

/// Extract xi clusters from a reachability graph.
///
/// Clusters are returned in discovery order.
pub fn xi_clusters<T: Float>(
    graph: &ReachabilityGraph<T>,
    xi: T,
    min_samples: usize,
    min_cluster_size: usize,
) -> Vec<ClusterSpan> {
    let n = graph.len();
    if n == 0 {
        return Vec::new();
    }

    let mut r = graph.reachability_plot();
    r.push(T::infinity());
    let predecessor = graph.predecessor_plot();
    let xi_complement = T::one() - xi;

    let mut steep_up = vec![false; n];
    let mut steep_down = vec![false; n];
    let mut upward = vec![false; n];
    let mut downward = vec![false; n];
    for i in 0..n {
        // NaN ratios (inf / inf, 0 / 0) are neither steep nor monotone.
        let ratio = r[i] / r[i + 1];
        steep_up[i] = ratio <= xi_complement;
        steep_down[i] = ratio >= T::one() / xi_complement;
        downward[i] = ratio > T::one();
        upward[i] = ratio < T::one();
    }

    let mut sdas: Vec<SteepDownArea<T>> = Vec::new();
    let mut clusters = Vec::new();
    let mut index = 0;
    let mut mib = T::zero();

    for steep_index in (0..n).filter(|&i| steep_up[i] || steep_down[i]) {
        if steep_index < index {
            continue;
        }
        mib = r[index..=steep_index].iter().fold(mib, |acc, &v| acc.max(v));

        if steep_down[steep_index] {
            sdas = update_filter_sdas(sdas, mib, xi_complement, &r);
            let d_end = extend_region(&steep_down, &upward, steep_index, min_samples);
            sdas.push(SteepDownArea {
                start: steep_index,
                end: d_end,
                mib: T::zero(),
            });
            index = d_end + 1;
            mib = r[index];
        } else {
            sdas = update_filter_sdas(sdas, mib, xi_complement, &r);
            let u_start = steep_index;
            let u_end = extend_region(&steep_up, &downward, u_start, min_samples);
            index = u_end + 1;
            mib = r[index];

            let mut u_clusters = Vec::new();
            for d in &sdas {
                let mut c_start = d.start;
                let mut c_end = u_end;

                if r[c_end + 1] * xi_complement < d.mib {
                    continue;
                }

                let d_max = r[d.start];
                if d_max * xi_complement >= r[c_end + 1] {
                    while c_start < d.end && r[c_start + 1] > r[c_end + 1] {
                        c_start += 1;
                    }
                } else if r[c_end + 1] * xi_complement >= d_max {
                    while c_end > u_start && r[c_end - 1] > d_max {
                        c_end -= 1;
                    }
                }

                let Some((s, e)) =
                    correct_predecessor(&r, &predecessor, &graph.ordering, c_start, c_end)
                else {
                    continue;
                };
                c_start = s;
                c_end = e;

                if c_end + 1 - c_start < min_cluster_size {
                    continue;
                }
                if c_start > d.end || c_end < u_start {
                    continue;
                }
                u_clusters.push(ClusterSpan {
                    start: c_start,
                    end: c_end,
                });
            }
            u_clusters.reverse();
            clusters.extend(u_clusters);
        }
    }

    clusters
}

/// Last position of the steep area starting at `start`.
///
/// `against[i]` marks points moving opposite to the steep direction. The
/// area ends at the first such point, or once more than `min_samples`
/// consecutive points are neither steep nor moving against it.
fn extend_region(steep: &[bool], against: &[bool], start: usize, min_samples: usize) -> usize {
    let mut non_steep = 0;
    let mut end = start;
    for index in start..steep.len() {
        if steep[index] {
            non_steep = 0;
            end = index;
        } else if against[index] {
            break;
        } else {
            non_steep += 1;
            if non_steep > min_samples {
                break;
            }
        }
    }
    end
}

/// Drop steep down areas whose start is not steep relative to `mib` and
/// raise the remaining areas' maximum-in-between values.
fn update_filter_sdas<T: Float>(
    sdas: Vec<SteepDownArea<T>>,
    mib: T,
    xi_complement: T,
    r: &[T],
) -> Vec<SteepDownArea<T>> {
    if mib.is_infinite() {
        return Vec::new();
    }
    sdas.into_iter()
        .filter(|sda| mib <= r[sda.start] * xi_complement)
        .map(|mut sda| {
            sda.mib = sda.mib.max(mib);
            sda
        })
        .collect()
}

/// Shrink `[s, e]` until its last point was reached from inside the span.
fn correct_predecessor<T: Float>(
    r: &[T],
    predecessor: &[Option<usize>],
    ordering: &[usize],
    s: usize,
    mut e: usize,
) -> Option<(usize, usize)> {
    while s < e {
        if r[s] > r[e] {
            return Some((s, e));
        }
        if let Some(p_e) = predecessor[e] {
            if ordering[s..e].contains(&p_e) {
                return Some((s, e));
            }
        }
        e -= 1;
    }
    None
}

/// Per-point cluster labels from xi clusters (`None` for noise).
///
/// Labels are indexed by point, not by position in the ordering.
pub fn xi_labels(ordering: &[usize], clusters: &[ClusterSpan]) -> Vec<Option<usize>> {
    let mut by_position: Vec<Option<usize>> = vec![None; ordering.len()];
    let mut label = 0;
    for c in clusters {
        let span = &mut by_position[c.start..=c.end];
        if span.iter().all(Option::is_none) {
            span.iter_mut().for_each(|l| *l = Some(label));
            label += 1;
        }
    }

    let mut labels = vec![None; ordering.len()];
    for (position, &point) in ordering.iter().enumerate() {
        labels[point] = by_position[position];
    }
    labels
}
