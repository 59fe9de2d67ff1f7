//! Tests for the compute functions.
//!
//! These tests verify the pure table-to-artifact computations behind the
//! three widgets:
//! - Density grid extents, labels and contours
//! - Cluster annotation of the output table and the reachability plot
//! - Resampled tables and their diagnostic summary
//! - Error reporting for invalid tables and settings
//! - Idempotence for a fixed input and parameter set
//!
//! ## Test Organization
//!
//! 1. **Density Estimation** - `compute_kde2d`
//! 2. **Clustering** - `compute_optics`
//! 3. **Resampling** - `compute_smote`

use approx::assert_relative_eq;
use ndarray::{array, Array1, Array2};

use orangeplus::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

/// 5 x 5 lattice over the unit square, with a continuous class `z = x + 2y`.
fn unit_square_table() -> Table {
    let domain = Domain::new(
        vec![Variable::continuous("x"), Variable::continuous("y")],
        Some(Variable::continuous("z")),
        vec![],
    );
    let mut rows = Vec::new();
    let mut z = Vec::new();
    for i in 0..5 {
        for j in 0..5 {
            let (x, y) = (i as f64 / 4.0, j as f64 / 4.0);
            rows.extend([x, y]);
            z.push(x + 2.0 * y);
        }
    }
    let x = Array2::from_shape_vec((25, 2), rows).unwrap();
    Table::from_features(domain, x, Some(Array1::from(z))).unwrap()
}

/// Two blobs and an outlier, with a string-like meta id and weights.
fn blobs_table() -> Table {
    let domain = Domain::new(
        vec![Variable::continuous("a"), Variable::continuous("b")],
        None,
        vec![Variable::continuous("id")],
    );
    let x = array![
        [0.0, 0.0],
        [0.5, 0.2],
        [0.2, 0.6],
        [0.8, 0.7],
        [0.4, 1.0],
        [1.0, 0.1],
        [10.0, 10.0],
        [10.4, 10.3],
        [10.1, 10.8],
        [10.9, 10.5],
        [10.6, 9.9],
        [11.0, 10.9],
        [50.0, -40.0],
    ];
    let metas = Array2::from_shape_fn((13, 1), |(i, _)| i as f64 * 10.0);
    Table::new(domain, x, None, metas)
        .unwrap()
        .with_weights(Array1::from_elem(13, 2.0))
        .unwrap()
}

/// Class `no` has five rows, class `yes` two; one meta column.
fn imbalanced_table() -> Table {
    let domain = Domain::new(
        vec![Variable::continuous("a"), Variable::continuous("b")],
        Some(Variable::discrete("class", ["no", "yes"])),
        vec![Variable::continuous("id")],
    );
    let x = array![
        [0.0, 0.0],
        [1.0, 2.0],
        [2.0, 4.0],
        [3.0, 6.0],
        [4.0, 8.0],
        [1.0, -1.0],
        [3.0, -3.0],
    ];
    let y = array![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0];
    let metas = Array2::from_shape_fn((7, 1), |(i, _)| i as f64);
    Table::new(domain, x, Some(y), metas)
        .unwrap()
        .with_weights(Array1::ones(7))
        .unwrap()
}

fn kde_settings(attributes: Vec<usize>) -> KdeSettings {
    KdeSettings {
        attributes,
        ..KdeSettings::default()
    }
}

fn optics_settings(min_samples: usize) -> OpticsSettings {
    OpticsSettings {
        min_samples,
        metric: DistanceMetric::Euclidean,
        ..OpticsSettings::default()
    }
}

// ============================================================================
// Density Estimation Tests
// ============================================================================

/// Test grid extents are the data range padded by a third on each side.
#[test]
fn test_kde_extent_padding() {
    let table = unit_square_table();
    let plot = compute_kde2d(&table, &kde_settings(vec![0, 1])).unwrap();
    let grid = &plot.grid;

    assert_eq!(grid.values.dim(), (100, 100));
    assert_eq!(grid.xs.len(), 100);
    assert_relative_eq!(grid.x_extent.min, -1.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(grid.x_extent.max, 4.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(grid.y_extent.min, -1.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(grid.y_extent.max, 4.0 / 3.0, epsilon = 1e-12);
    assert_eq!(grid.xs[0], grid.x_extent.min);
    assert_eq!(grid.xs[99], grid.x_extent.max);
}

/// Test each axis is padded independently.
#[test]
fn test_kde_axes_padded_independently() {
    let table = unit_square_table();
    // Column 2 is the continuous class z in [0, 3].
    let plot = compute_kde2d(&table, &kde_settings(vec![0, 2])).unwrap();

    assert_eq!(plot.x_label, "x");
    assert_eq!(plot.y_label, "z");
    assert_relative_eq!(plot.grid.y_extent.min, -1.0, epsilon = 1e-12);
    assert_relative_eq!(plot.grid.y_extent.max, 4.0, epsilon = 1e-12);
}

/// Test plot metadata and contour levels.
#[test]
fn test_kde_plot_contents() {
    let table = unit_square_table();
    let plot = compute_kde2d(&table, &kde_settings(vec![1, 0])).unwrap();

    assert_eq!(plot.title, "Two Dimensional Gaussian Kernel Density Estimation");
    assert_eq!(plot.x_label, "y");
    assert_eq!(plot.instances, 25);
    assert_eq!(plot.bandwidth, BandwidthMethod::Scott);
    assert_relative_eq!(plot.factor, 25f64.powf(-1.0 / 6.0), epsilon = 1e-12);
    assert_eq!(plot.contour_color, Color::black());

    let (lo, hi) = (plot.grid.min_density(), plot.grid.max_density());
    assert!(lo >= 0.0 && hi > lo);
    assert!(!plot.contours.is_empty() && plot.contours.len() <= 7);
    for line in &plot.contours {
        assert!(line.level > lo && line.level < hi);
        assert!(!line.segments.is_empty());
    }

    let heatmap = plot.grid.heatmap(&plot.colormap);
    assert_eq!(heatmap.dim(), (100, 100));
    assert!(plot.to_string().contains("Attributes: y x x"));
}

/// Test a custom grid size and contour cap.
#[test]
fn test_kde_custom_grid() {
    let table = unit_square_table();
    let settings = KdeSettings {
        attributes: vec![0, 1],
        bandwidth: BandwidthMethod::Silverman,
        grid_size: 30,
        contour_levels: 3,
    };
    let plot = compute_kde2d(&table, &settings).unwrap();
    assert_eq!(plot.grid.values.dim(), (30, 30));
    assert!(plot.contours.len() <= 3);
}

/// Test invalid selections are rejected.
#[test]
fn test_kde_invalid_selection() {
    let table = unit_square_table();
    assert!(matches!(
        compute_kde2d(&table, &kde_settings(vec![0])),
        Err(WidgetError::InvalidAttributeSelection { got: 1 })
    ));
    assert!(matches!(
        compute_kde2d(&table, &kde_settings(vec![0, 3])),
        Err(WidgetError::AttributeOutOfRange { index: 3, len: 3 })
    ));
}

/// Test collinear attributes surface a singular covariance.
#[test]
fn test_kde_collinear_fails() {
    let table = unit_square_table();
    let domain = Domain::new(
        vec![Variable::continuous("x"), Variable::continuous("x2")],
        None,
        vec![],
    );
    let col = table.x().column(0).to_owned();
    let x = Array2::from_shape_fn((25, 2), |(i, j)| col[i] * (j as f64 + 1.0));
    let collinear = Table::from_features(domain, x, None).unwrap();

    assert!(matches!(
        compute_kde2d(&collinear, &kde_settings(vec![0, 1])),
        Err(WidgetError::SingularCovariance)
    ));
}

/// Test missing values are reported.
#[test]
fn test_kde_missing_values() {
    let domain = Domain::new(
        vec![Variable::continuous("a"), Variable::continuous("b")],
        None,
        vec![],
    );
    let x = array![[0.0, 1.0], [2.0, f64::NAN], [1.0, 0.5]];
    let table = Table::from_features(domain, x, None).unwrap();
    assert!(matches!(
        compute_kde2d(&table, &kde_settings(vec![0, 1])),
        Err(WidgetError::InvalidNumericValue(_))
    ));
}

/// Test repeated computation gives identical plots.
#[test]
fn test_kde_idempotent() {
    let table = unit_square_table();
    let settings = kde_settings(vec![0, 1]);
    assert_eq!(
        compute_kde2d(&table, &settings).unwrap(),
        compute_kde2d(&table, &settings).unwrap()
    );
}

// ============================================================================
// Clustering Tests
// ============================================================================

/// Test the output table keeps every row and gains a cluster column.
#[test]
fn test_optics_annotates_table() {
    let table = blobs_table();
    let result = compute_optics(&table, &optics_settings(3)).unwrap();
    let out = &result.table;

    assert_eq!(out.len(), table.len());
    assert_eq!(out.x(), table.x());
    assert_eq!(out.domain().attributes(), table.domain().attributes());
    assert_eq!(out.weights(), table.weights());

    let metas = out.domain().metas();
    assert_eq!(metas.len(), 2);
    assert_eq!(metas[0].name(), "id");
    assert_eq!(metas[1].name(), CLUSTER_COLUMN);
    assert_eq!(metas[1].values(), ["C1", "C2"]);

    let column = out.column(Role::Meta(1)).unwrap();
    assert!(column.iter().take(6).all(|&v| v == 0.0));
    assert!(column.iter().skip(6).take(6).all(|&v| v == 1.0));
    assert!(column[12].is_nan());
    assert_eq!(out.column(Role::Meta(0)).unwrap(), table.column(Role::Meta(0)).unwrap());

    // The input table is untouched.
    assert_eq!(table.domain().metas().len(), 1);
}

/// Test the cluster column has one value per cluster plus one for noise.
#[test]
fn test_optics_distinct_values() {
    let table = blobs_table();
    let result = compute_optics(&table, &optics_settings(3)).unwrap();

    assert_eq!(result.n_clusters, 2);
    assert_eq!(result.n_noise(), 1);
    assert_eq!(result.n_distinct_values(), 3);
    assert_eq!(result.algorithm, NeighborAlgorithm::KdTree);

    let summary = result.to_string();
    assert!(summary.contains("2 values in the cluster outcome"));
    assert!(summary.contains("1 noisy samples in the leaf cluster"));
}

/// Test the reachability plot replaces infinities and splits series by cluster.
#[test]
fn test_optics_reachability_plot() {
    let table = blobs_table();
    let result = compute_optics(&table, &optics_settings(3)).unwrap();
    let plot = &result.plot;

    assert_eq!(plot.values.len(), 13);
    assert!(plot.values.iter().all(|v| v.is_finite()));
    let max = plot.values.iter().copied().fold(f64::MIN, f64::max);
    assert_eq!(plot.values[0], max);

    assert_eq!(plot.series.len(), 3);
    assert_eq!(plot.series[0].cluster, Some(0));
    assert_eq!(plot.series[1].cluster, Some(1));
    assert_ne!(plot.series[0].color, plot.series[1].color);
    assert_ne!(plot.series[0].color, Color::black());
    let noise = &plot.series[2];
    assert_eq!(noise.cluster, None);
    assert_eq!(noise.color, Color::black());
    assert_eq!(noise.positions, vec![12]);

    let total: usize = plot.series.iter().map(|s| s.positions.len()).sum();
    assert_eq!(total, 13);
    assert_eq!(plot.x_label, "Ordering of the points as processed by OPTICS");
}

/// Test an existing `Cluster` meta gets a unique new name.
#[test]
fn test_optics_cluster_name_collision() {
    let domain = Domain::new(
        vec![Variable::continuous("a")],
        None,
        vec![Variable::continuous("Cluster")],
    );
    let x = array![[0.0], [0.1], [0.2], [5.0], [5.1], [5.2]];
    let metas = Array2::zeros((6, 1));
    let table = Table::new(domain, x, None, metas).unwrap();

    let result = compute_optics(&table, &optics_settings(2)).unwrap();
    assert_eq!(result.table.domain().metas()[1].name(), "Cluster (1)");
}

/// Test fewer than two rows is a validation error.
#[test]
fn test_optics_too_few_rows() {
    let domain = Domain::new(vec![Variable::continuous("a")], None, vec![]);
    let table = Table::from_features(domain, array![[1.0]], None).unwrap();
    assert!(matches!(
        compute_optics(&table, &optics_settings(2)),
        Err(WidgetError::TooFewInstances { got: 1, min: 2 })
    ));
}

/// Test invalid settings are rejected.
#[test]
fn test_optics_invalid_settings() {
    let table = blobs_table();

    assert!(matches!(
        compute_optics(&table, &optics_settings(20)),
        Err(WidgetError::MinSamplesExceedsInstances {
            min_samples: 20,
            instances: 13
        })
    ));
    assert!(matches!(
        compute_optics(&table, &optics_settings(1)),
        Err(WidgetError::InvalidMinSamples(1))
    ));

    let settings = OpticsSettings {
        metric: DistanceMetric::Cosine,
        algorithm: NeighborAlgorithm::KdTree,
        ..OpticsSettings::default()
    };
    assert!(matches!(
        compute_optics(&table, &settings),
        Err(WidgetError::IncompatibleMetric { .. })
    ));

    let settings = OpticsSettings {
        xi: 1.0,
        ..optics_settings(3)
    };
    assert!(matches!(
        compute_optics(&table, &settings),
        Err(WidgetError::InvalidXi(_))
    ));
}

/// Test repeated clustering gives identical results.
#[test]
fn test_optics_idempotent() {
    let table = blobs_table();
    let settings = optics_settings(4);
    let first = compute_optics(&table, &settings).unwrap();
    let second = compute_optics(&table, &settings).unwrap();

    assert_eq!(first.graph, second.graph);
    assert_eq!(first.labels, second.labels);
    assert_eq!(first.plot, second.plot);
    // Noise is NaN in the cluster column, so compare bit patterns.
    let bits = |t: &Table| -> Vec<u64> { t.metas().iter().map(|v| v.to_bits()).collect() };
    assert_eq!(bits(&first.table), bits(&second.table));
}

// ============================================================================
// Resampling Tests
// ============================================================================

/// Test the resampled table and its summary.
#[test]
fn test_smote_resampled_table() {
    let table = imbalanced_table();
    let result = compute_smote(&table, &SmoteSettings::default()).unwrap();
    let out = &result.table;

    assert_eq!(out.len(), 10);
    assert_eq!(out.domain(), table.domain());
    assert_eq!(result.x.nrows(), 10);
    assert_eq!(result.y.len(), 10);
    assert_eq!(result.counts_after.count(0), 5);
    assert_eq!(result.counts_after.count(1), 5);
    assert_eq!(result.effective_k, 1);

    // Originals first, with their metas; synthetic metas are missing.
    assert_eq!(out.x().slice(ndarray::s![..7, ..]), table.x().view());
    let ids = out.column(Role::Meta(0)).unwrap();
    assert!(ids.iter().take(7).enumerate().all(|(i, &v)| v == i as f64));
    assert!(ids.iter().skip(7).all(|v| v.is_nan()));
    assert!(out.weights().is_none());
}

/// Test the oversampling percentage and info lines.
#[test]
fn test_smote_summary() {
    let table = imbalanced_table();
    let summary = compute_smote(&table, &SmoteSettings::default())
        .unwrap()
        .summary;

    assert_eq!(summary.input_instances, 7);
    assert_eq!(summary.class_values, 2);
    assert_eq!(summary.output_instances, 10);
    assert_eq!(summary.oversampling_percentage(), (10.0 - 7.0) / 7.0 * 100.0);
    assert_eq!(summary.oversampling_line(), "42.86% oversampling");
    assert!(!summary.is_balanced());
    assert_eq!(summary.status_line(), "Input dataset is imbalanced.");
    assert!(summary
        .to_string()
        .contains("2 values in the categorical outcome"));
}

/// Test a balanced table reports zero growth.
#[test]
fn test_smote_already_balanced() {
    let domain = Domain::new(
        vec![Variable::continuous("a")],
        Some(Variable::discrete("c", ["p", "q", "r"])),
        vec![],
    );
    let table = Table::from_features(
        domain,
        array![[0.0], [1.0], [2.0], [3.0]],
        Some(array![0.0, 1.0, 0.0, 1.0]),
    )
    .unwrap();
    let summary = compute_smote(&table, &SmoteSettings::default())
        .unwrap()
        .summary;

    assert_eq!(summary.oversampling_percentage(), 0.0);
    assert_eq!(summary.class_values, 3);
    assert_eq!(
        summary.status_line(),
        "Attention! Input dataset is already balanced."
    );
}

/// Test class-column problems are reported.
#[test]
fn test_smote_class_errors() {
    let domain = Domain::new(vec![Variable::continuous("a")], None, vec![]);
    let no_class = Table::from_features(domain, array![[0.0], [1.0]], None).unwrap();
    assert!(matches!(
        compute_smote(&no_class, &SmoteSettings::default()),
        Err(WidgetError::MissingClassVariable)
    ));

    let domain = Domain::new(
        vec![Variable::continuous("a")],
        Some(Variable::continuous("target")),
        vec![],
    );
    let continuous =
        Table::from_features(domain, array![[0.0], [1.0]], Some(array![0.5, 1.5])).unwrap();
    assert!(matches!(
        compute_smote(&continuous, &SmoteSettings::default()),
        Err(WidgetError::NonDiscreteClass(_))
    ));

    let domain = Domain::new(
        vec![Variable::continuous("a")],
        Some(Variable::discrete("c", ["p", "q"])),
        vec![],
    );
    let missing = Table::from_features(
        domain,
        array![[0.0], [1.0], [2.0]],
        Some(array![0.0, f64::NAN, 1.0]),
    )
    .unwrap();
    assert!(matches!(
        compute_smote(&missing, &SmoteSettings::default()),
        Err(WidgetError::InvalidNumericValue(_))
    ));
}

/// Test out-of-range settings are rejected.
#[test]
fn test_smote_invalid_settings() {
    let table = imbalanced_table();
    let seed = SmoteSettings {
        random_seed: 100,
        ..SmoteSettings::default()
    };
    assert!(matches!(
        compute_smote(&table, &seed),
        Err(WidgetError::InvalidSeed(100))
    ));

    let k = SmoteSettings {
        k_neighbors: 0,
        ..SmoteSettings::default()
    };
    assert!(matches!(
        compute_smote(&table, &k),
        Err(WidgetError::InvalidNeighbors(0))
    ));
}

/// Test a fixed seed reproduces the same resampled arrays.
#[test]
fn test_smote_idempotent() {
    let table = imbalanced_table();
    let settings = SmoteSettings {
        random_seed: 42,
        k_neighbors: 4,
        ..SmoteSettings::default()
    };
    let first = compute_smote(&table, &settings).unwrap();
    let second = compute_smote(&table, &settings).unwrap();
    assert_eq!(first.x, second.x);
    assert_eq!(first.y, second.y);
    assert_eq!(first.counts_after, second.counts_after);
}
