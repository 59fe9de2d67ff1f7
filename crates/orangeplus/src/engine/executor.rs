//! Execution engine for the widget computations.
//!
//! ## Purpose
//!
//! This module holds the three pure compute functions that turn an input
//! table and a settings record into an artifact: the density plot, the
//! clustering result and the resampled table. It also defines the settings
//! records themselves, which widgets persist between sessions.
//!
//! ## Design notes
//!
//! * **Pure**: Every function depends only on its arguments; the same table
//!   and settings always produce the same artifact.
//! * **Validate first**: Inputs go through `Validator` before any numerical work.
//! * **Persistable settings**: Settings derive `serde` traits with field
//!   defaults, so records saved by older versions still load.
//!
//! ## Invariants
//!
//! * Output tables are new values; input tables are never modified.
//! * Clustering output keeps the input row order.
//! * Resampling output lists original rows first.
//!
//! ## Non-goals
//!
//! * This module does not hold widget state or emit signals.
//! * This module does not cache artifacts between calls.

// External dependencies
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::algorithms::contour::{nice_levels, trace};
use crate::algorithms::kde::GaussianKde;
use crate::algorithms::neighbors::{NearestNeighbors, NeighborAlgorithm};
use crate::algorithms::optics::{reachability_graph, xi_clusters, xi_labels};
use crate::algorithms::smote::{SamplingStrategy, Smote};
use crate::engine::output::{
    ClusteringResult, DensityGrid, KdePlot, ReachabilityPlot, ReachabilitySeries,
    ResamplingResult, ResamplingSummary, KDE_PLOT_TITLE, REACHABILITY_X_LABEL,
    REACHABILITY_Y_LABEL,
};
use crate::engine::validator::Validator;
use crate::math::color::{cluster_color, Color, Gradient};
use crate::math::distance::DistanceMetric;
use crate::math::extent::{linspace, padded_extent};
use crate::math::kernel::BandwidthMethod;
use crate::primitives::errors::WidgetError;
use crate::primitives::points::{from_row_major, to_row_major, PointSet};
use crate::primitives::table::{Table, Variable};

// ============================================================================
// Settings
// ============================================================================

/// Persisted settings of the density widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdeSettings {
    /// Selected indices into the table's continuous-variable list.
    pub attributes: Vec<usize>,
    /// Bandwidth rule.
    pub bandwidth: BandwidthMethod,
    /// Grid points per axis.
    pub grid_size: usize,
    /// Maximum number of contour levels.
    pub contour_levels: usize,
}

impl KdeSettings {
    /// Default grid resolution per axis.
    pub const DEFAULT_GRID_SIZE: usize = 100;

    /// Default number of contour levels.
    pub const DEFAULT_CONTOUR_LEVELS: usize = 7;

    /// Fraction of the data span added to each side of an axis.
    pub const PADDING: f64 = 1.0 / 3.0;
}

impl Default for KdeSettings {
    fn default() -> Self {
        Self {
            attributes: Vec::new(),
            bandwidth: BandwidthMethod::default(),
            grid_size: Self::DEFAULT_GRID_SIZE,
            contour_levels: Self::DEFAULT_CONTOUR_LEVELS,
        }
    }
}

/// Persisted settings of the clustering widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticsSettings {
    /// Neighbourhood size defining a core point.
    pub min_samples: usize,
    /// Distance metric.
    pub metric: DistanceMetric,
    /// Minimum steepness of cluster boundaries.
    pub xi: f64,
    /// Neighbour-search strategy.
    pub algorithm: NeighborAlgorithm,
}

impl Default for OpticsSettings {
    fn default() -> Self {
        Self {
            min_samples: 5,
            metric: DistanceMetric::default(),
            xi: 0.05,
            algorithm: NeighborAlgorithm::default(),
        }
    }
}

/// Persisted settings of the resampling widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoteSettings {
    /// Which classes to oversample.
    pub sampling_strategy: SamplingStrategy,
    /// Seed of the per-class random streams.
    pub random_seed: u64,
    /// Requested neighbours per point (clamped at compute time).
    pub k_neighbors: usize,
    /// Emit only on explicit commit.
    pub manual_commit: bool,
}

impl Default for SmoteSettings {
    fn default() -> Self {
        Self {
            sampling_strategy: SamplingStrategy::default(),
            random_seed: 0,
            k_neighbors: 1,
            manual_commit: false,
        }
    }
}

// ============================================================================
// Density Estimation
// ============================================================================

/// Estimate the bivariate density of two selected continuous variables.
pub fn compute_kde2d(table: &Table, settings: &KdeSettings) -> Result<KdePlot, WidgetError> {
    let continuous = table.continuous_variables();
    Validator::validate_attribute_selection(&settings.attributes, continuous.len())?;
    Validator::validate_grid_size(settings.grid_size)?;

    let (x_role, x_var) = continuous[settings.attributes[0]];
    let (y_role, y_var) = continuous[settings.attributes[1]];
    let (Some(x_col), Some(y_col)) = (table.column(x_role), table.column(y_role)) else {
        return Err(WidgetError::InvalidInput(
            "selected attribute has no column".to_string(),
        ));
    };

    let data: Vec<f64> = x_col
        .iter()
        .zip(y_col.iter())
        .flat_map(|(&x, &y)| [x, y])
        .collect();
    let points = PointSet::new(&data, 2)?;
    Validator::validate_points(points, 2)?;

    let kde = GaussianKde::fit(points, settings.bandwidth)?;

    let x_values: Vec<f64> = x_col.to_vec();
    let y_values: Vec<f64> = y_col.to_vec();
    let (Some(x_extent), Some(y_extent)) = (
        padded_extent(&x_values, KdeSettings::PADDING),
        padded_extent(&y_values, KdeSettings::PADDING),
    ) else {
        return Err(WidgetError::EmptyInput);
    };
    let xs = linspace(x_extent, settings.grid_size);
    let ys = linspace(y_extent, settings.grid_size);

    let queries: Vec<f64> = xs
        .iter()
        .flat_map(|&x| ys.iter().flat_map(move |&y| [x, y]))
        .collect();
    let densities = kde.evaluate_many(PointSet::new(&queries, 2)?);
    let values = Array2::from_shape_vec((xs.len(), ys.len()), densities)
        .map_err(|e| WidgetError::InvalidInput(format!("density grid: {e}")))?;

    let grid = DensityGrid {
        xs,
        ys,
        values,
        x_extent,
        y_extent,
    };
    let contours = nice_levels(
        grid.min_density(),
        grid.max_density(),
        settings.contour_levels,
    )
    .into_iter()
    .map(|level| trace(&grid.xs, &grid.ys, grid.values.view(), level))
    .collect();

    log::trace!(
        "kde2d: {} x {} over {} points",
        x_var.name(),
        y_var.name(),
        points.len()
    );

    Ok(KdePlot {
        title: KDE_PLOT_TITLE.to_string(),
        x_label: x_var.name().to_string(),
        y_label: y_var.name().to_string(),
        grid,
        contours,
        contour_color: Color::black(),
        colormap: Gradient::coolwarm(),
        bandwidth: settings.bandwidth,
        factor: kde.factor(),
        instances: points.len(),
    })
}

// ============================================================================
// Clustering
// ============================================================================

/// Name of the meta column appended by clustering.
pub const CLUSTER_COLUMN: &str = "Cluster";

/// Cluster the rows of `table` and annotate them with a cluster column.
pub fn compute_optics(
    table: &Table,
    settings: &OpticsSettings,
) -> Result<ClusteringResult, WidgetError> {
    Validator::validate_min_samples(settings.min_samples)?;
    Validator::validate_xi(settings.xi)?;
    Validator::validate_metric(settings.metric, settings.algorithm)?;
    if table.len() < 2 {
        return Err(WidgetError::TooFewInstances {
            got: table.len(),
            min: 2,
        });
    }
    Validator::validate_has_attributes(table)?;

    let data = to_row_major(table.x().view());
    let points = PointSet::new(&data, table.x().ncols())?;
    Validator::validate_points(points, 2)?;
    Validator::validate_min_samples_for(settings.min_samples, points.len())?;

    let nn = NearestNeighbors::new(points, settings.metric, settings.algorithm)?;
    let graph = reachability_graph(&nn, settings.min_samples);
    let clusters = xi_clusters(
        &graph,
        settings.xi,
        settings.min_samples,
        settings.min_samples,
    );
    let labels = xi_labels(&graph.ordering, &clusters);
    let n_clusters = labels.iter().flatten().max().map_or(0, |&m| m + 1);

    log::trace!(
        "optics: {} points, {} clusters, algorithm {}",
        points.len(),
        n_clusters,
        nn.algorithm().key()
    );

    let plot = reachability_plot(&graph.reachability_plot(), &graph.ordering, &labels, n_clusters);
    let annotated = annotate_clusters(table, &labels, n_clusters)?;

    Ok(ClusteringResult {
        graph,
        clusters,
        labels,
        n_clusters,
        algorithm: nn.algorithm(),
        plot,
        table: annotated,
    })
}

/// Build the reachability plot from values in processing order.
fn reachability_plot(
    reachability: &[f64],
    ordering: &[usize],
    labels: &[Option<usize>],
    n_clusters: usize,
) -> ReachabilityPlot {
    let max_finite = reachability
        .iter()
        .copied()
        .filter(|r| r.is_finite())
        .fold(f64::NAN, f64::max);
    let values: Vec<f64> = reachability
        .iter()
        .map(|&r| if r.is_finite() { r } else { max_finite })
        .collect();
    let plot_labels: Vec<Option<usize>> = ordering.iter().map(|&p| labels[p]).collect();

    let series_for = |cluster: Option<usize>, color: Color| {
        let positions: Vec<usize> = (0..values.len())
            .filter(|&i| plot_labels[i] == cluster)
            .collect();
        ReachabilitySeries {
            cluster,
            color,
            values: positions.iter().map(|&i| values[i]).collect(),
            positions,
        }
    };

    let mut series: Vec<ReachabilitySeries> = (0..n_clusters)
        .map(|k| series_for(Some(k), cluster_color(k)))
        .collect();
    series.push(series_for(None, Color::black()));

    ReachabilityPlot {
        x_label: REACHABILITY_X_LABEL.to_string(),
        y_label: REACHABILITY_Y_LABEL.to_string(),
        values,
        series,
    }
}

/// Copy of `table` with a discrete cluster meta column (`C1..Ck`, noise missing).
fn annotate_clusters(
    table: &Table,
    labels: &[Option<usize>],
    n_clusters: usize,
) -> Result<Table, WidgetError> {
    let var = Variable::discrete(
        CLUSTER_COLUMN,
        (1..=n_clusters).map(|k| format!("C{k}")),
    );
    let domain = table.domain().with_meta(var);

    let n = table.len();
    let n_metas = table.metas().ncols();
    let mut metas = Array2::from_elem((n, n_metas + 1), f64::NAN);
    metas.slice_mut(s![.., ..n_metas]).assign(table.metas());
    for (row, label) in labels.iter().enumerate() {
        metas[[row, n_metas]] = label.map_or(f64::NAN, |l| l as f64);
    }

    let annotated = Table::new(domain, table.x().clone(), table.y().cloned(), metas)?;
    match table.weights() {
        Some(w) => annotated.with_weights(w.clone()),
        None => Ok(annotated),
    }
}

// ============================================================================
// Resampling
// ============================================================================

/// Oversample the classes of `table` with SMOTE.
pub fn compute_smote(
    table: &Table,
    settings: &SmoteSettings,
) -> Result<ResamplingResult, WidgetError> {
    Validator::validate_k_neighbors(settings.k_neighbors)?;
    Validator::validate_seed(settings.random_seed)?;
    Validator::validate_has_attributes(table)?;
    let labels = Validator::validate_class(table)?;

    let dim = table.x().ncols();
    let data = to_row_major(table.x().view());
    let points = PointSet::new(&data, dim)?;
    Validator::validate_points(points, 1)?;

    let smote = Smote {
        strategy: settings.sampling_strategy,
        k_neighbors: settings.k_neighbors,
        random_seed: settings.random_seed,
    };
    let resampled = smote.fit_resample(points, &labels)?;

    let n_out = resampled.labels.len();
    let x = from_row_major(resampled.data, dim)?;
    let y: Array1<f64> = resampled.labels.iter().map(|&l| l as f64).collect();

    let mut metas = Array2::from_elem((n_out, table.metas().ncols()), f64::NAN);
    metas
        .slice_mut(s![..resampled.n_original, ..])
        .assign(table.metas());

    let out = Table::new(table.domain_arc(), x.clone(), Some(y.clone()), metas)?;
    let summary = ResamplingSummary {
        input_instances: table.len(),
        class_values: table
            .domain()
            .class_var()
            .map_or(0, |c| c.values().len()),
        output_instances: n_out,
    };

    log::trace!(
        "smote: {} -> {} rows (k = {})",
        summary.input_instances,
        summary.output_instances,
        resampled.effective_k
    );

    Ok(ResamplingResult {
        x,
        y,
        effective_k: resampled.effective_k,
        counts_before: resampled.counts_before,
        counts_after: resampled.counts_after,
        summary,
        table: out,
    })
}
