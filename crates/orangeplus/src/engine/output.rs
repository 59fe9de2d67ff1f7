//! Output types produced by the widget computations.
//!
//! ## Purpose
//!
//! This module defines the artifacts returned by the three compute
//! functions: the density grid and its plot descriptor, the clustering result
//! with its reachability plot, and the resampling result with its summary.
//!
//! ## Design notes
//!
//! * **Plain data**: Plot descriptors carry coordinates, labels and colours;
//!   hosts draw them without further computation.
//! * **Ergonomics**: Summaries implement `Display` and produce the info lines
//!   shown in the widgets.
//!
//! ## Invariants
//!
//! * `DensityGrid::values` has shape `(xs.len(), ys.len())`.
//! * Reachability series partition the positions `0..n` of the ordering.
//! * Resampled tables have at least as many rows as their input.
//!
//! ## Non-goals
//!
//! * This module does not perform calculations beyond simple summaries.
//! * This module does not render anything.

// External dependencies
use ndarray::{Array1, Array2};
use std::fmt::{Display, Formatter, Result};

// Internal dependencies
use crate::algorithms::contour::ContourLine;
use crate::algorithms::neighbors::NeighborAlgorithm;
use crate::algorithms::optics::{ClusterSpan, ReachabilityGraph};
use crate::algorithms::smote::ClassCounts;
use crate::math::color::{Color, Gradient};
use crate::math::extent::AxisExtent;
use crate::math::kernel::BandwidthMethod;
use crate::primitives::table::Table;

// ============================================================================
// Density Estimation
// ============================================================================

/// Title of every density plot.
pub const KDE_PLOT_TITLE: &str = "Two Dimensional Gaussian Kernel Density Estimation";

/// Density values sampled on a rectilinear grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    /// Grid coordinates along the first attribute.
    pub xs: Vec<f64>,
    /// Grid coordinates along the second attribute.
    pub ys: Vec<f64>,
    /// `values[[i, j]]` is the density at `(xs[i], ys[j])`.
    pub values: Array2<f64>,
    /// Range covered by `xs`.
    pub x_extent: AxisExtent<f64>,
    /// Range covered by `ys`.
    pub y_extent: AxisExtent<f64>,
}

impl DensityGrid {
    /// Smallest density on the grid.
    pub fn min_density(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest density on the grid.
    pub fn max_density(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Heat-map colours, one per grid cell, indexed like `values`.
    pub fn heatmap(&self, gradient: &Gradient) -> Array2<Color> {
        let lo = self.min_density();
        let span = self.max_density() - lo;
        self.values.mapv(|v| {
            let t = if span > 0.0 { (v - lo) / span } else { 0.0 };
            gradient.sample(t)
        })
    }
}

/// Everything a host needs to draw the density plot.
#[derive(Debug, Clone, PartialEq)]
pub struct KdePlot {
    /// Plot title.
    pub title: String,
    /// Name of the first selected attribute.
    pub x_label: String,
    /// Name of the second selected attribute.
    pub y_label: String,
    /// Sampled density.
    pub grid: DensityGrid,
    /// Contour lines, lowest level first.
    pub contours: Vec<ContourLine>,
    /// Colour of contour lines.
    pub contour_color: Color,
    /// Heat-map colour scale.
    pub colormap: Gradient,
    /// Bandwidth rule used.
    pub bandwidth: BandwidthMethod,
    /// Bandwidth factor used.
    pub factor: f64,
    /// Number of points the density was fitted to.
    pub instances: usize,
}

impl Display for KdePlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  Attributes: {} x {}", self.x_label, self.y_label)?;
        writeln!(f, "  Instances:  {}", self.instances)?;
        writeln!(f, "  Bandwidth:  {} (factor {:.6})", self.bandwidth, self.factor)?;
        writeln!(
            f,
            "  Grid:       {} x {} over [{:.4}, {:.4}] x [{:.4}, {:.4}]",
            self.grid.xs.len(),
            self.grid.ys.len(),
            self.grid.x_extent.min,
            self.grid.x_extent.max,
            self.grid.y_extent.min,
            self.grid.y_extent.max
        )?;
        writeln!(
            f,
            "  Density:    [{:.6e}, {:.6e}]",
            self.grid.min_density(),
            self.grid.max_density()
        )?;
        write!(f, "  Contours:   {}", self.contours.len())
    }
}

// ============================================================================
// Clustering
// ============================================================================

/// Axis labels of the reachability plot.
pub const REACHABILITY_X_LABEL: &str = "Ordering of the points as processed by OPTICS";
pub const REACHABILITY_Y_LABEL: &str = "Reachability distance (epsilon distance)";

/// Points of one cluster (or of the noise) in the reachability plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachabilitySeries {
    /// Cluster index, `None` for noise.
    pub cluster: Option<usize>,
    /// Line colour.
    pub color: Color,
    /// Positions in the processing order.
    pub positions: Vec<usize>,
    /// Reachability at each position.
    pub values: Vec<f64>,
}

/// Reachability plot descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachabilityPlot {
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// Reachability in processing order, infinities replaced by the largest finite value.
    pub values: Vec<f64>,
    /// One series per cluster followed by the noise series.
    pub series: Vec<ReachabilitySeries>,
}

/// Result of clustering a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteringResult {
    /// Processing order and distances.
    pub graph: ReachabilityGraph<f64>,
    /// Extracted clusters in discovery order.
    pub clusters: Vec<ClusterSpan>,
    /// Cluster of each input row, `None` for noise.
    pub labels: Vec<Option<usize>>,
    /// Number of labelled clusters.
    pub n_clusters: usize,
    /// Neighbour-search strategy the computation resolved to.
    pub algorithm: NeighborAlgorithm,
    /// Reachability plot.
    pub plot: ReachabilityPlot,
    /// Input table with the appended cluster column.
    pub table: Table,
}

impl ClusteringResult {
    /// Number of rows labelled as noise.
    pub fn n_noise(&self) -> usize {
        self.labels.iter().filter(|l| l.is_none()).count()
    }

    /// Distinct values in the cluster column, counting noise as one value.
    pub fn n_distinct_values(&self) -> usize {
        self.n_clusters + usize::from(self.n_noise() > 0)
    }
}

impl Display for ClusteringResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Instances: {}", self.labels.len())?;
        writeln!(f, "  Algorithm: {}", self.algorithm)?;
        writeln!(f, "  {} values in the cluster outcome", self.n_clusters)?;
        write!(f, "  {} noisy samples in the leaf cluster", self.n_noise())
    }
}

// ============================================================================
// Resampling
// ============================================================================

/// Diagnostic counts of a resampling run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResamplingSummary {
    /// Rows in the input table.
    pub input_instances: usize,
    /// Values declared by the class variable.
    pub class_values: usize,
    /// Rows in the output table.
    pub output_instances: usize,
}

impl ResamplingSummary {
    /// `(output - input) / input * 100`.
    pub fn oversampling_percentage(&self) -> f64 {
        if self.input_instances == 0 {
            return 0.0;
        }
        (self.output_instances as f64 - self.input_instances as f64) / self.input_instances as f64
            * 100.0
    }

    /// Whether nothing was generated.
    pub fn is_balanced(&self) -> bool {
        self.output_instances == self.input_instances
    }

    /// `"{:.2}% oversampling"`.
    pub fn oversampling_line(&self) -> String {
        format!("{:.2}% oversampling", self.oversampling_percentage())
    }

    /// Balance status line.
    pub fn status_line(&self) -> &'static str {
        if self.is_balanced() {
            "Attention! Input dataset is already balanced."
        } else {
            "Input dataset is imbalanced."
        }
    }
}

impl Display for ResamplingSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "{} instances in input data set", self.input_instances)?;
        writeln!(f, "{} values in the categorical outcome", self.class_values)?;
        writeln!(f, "{} instances in output data set", self.output_instances)?;
        writeln!(f, "{}", self.oversampling_line())?;
        write!(f, "{}", self.status_line())
    }
}

/// Result of resampling a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResamplingResult {
    /// Resampled features, originals first.
    pub x: Array2<f64>,
    /// Resampled class values.
    pub y: Array1<f64>,
    /// Neighbour count actually used.
    pub effective_k: usize,
    /// Class counts before resampling.
    pub counts_before: ClassCounts,
    /// Class counts after resampling.
    pub counts_after: ClassCounts,
    /// Diagnostic counts.
    pub summary: ResamplingSummary,
    /// Output table with the input domain.
    pub table: Table,
}
