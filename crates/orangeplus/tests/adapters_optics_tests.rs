//! Tests for the OPTICS widget.
//!
//! These tests drive the widget the way a host does and verify:
//! - The idle, ready and computed states
//! - Emitted outputs and info lines
//! - Metric and algorithm coupling
//! - Validation of tuning parameters
//!
//! ## Test Organization
//!
//! 1. **Lifecycle** - Idle, computed, cleared
//! 2. **Parameters** - Recompute on change, rejected values
//! 3. **Metric Coupling** - Warnings and algorithm fallback

use ndarray::{array, Array1, Array2};

use orangeplus::prelude::*;

/// Two blobs and an outlier with a three-valued discrete class.
fn blobs_table() -> Table {
    let domain = Domain::new(
        vec![Variable::continuous("a"), Variable::continuous("b")],
        Some(Variable::discrete("group", ["left", "right", "far"])),
        vec![],
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
    let y = Array1::from_shape_fn(13, |i| match i {
        0..=5 => 0.0,
        6..=11 => 1.0,
        _ => 2.0,
    });
    Table::from_features(domain, x, Some(y)).unwrap()
}

fn single_row_table() -> Table {
    let domain = Domain::new(vec![Variable::continuous("a")], None, vec![]);
    Table::from_features(domain, Array2::zeros((1, 1)), None).unwrap()
}

fn widget_with_data(min_samples: usize) -> OpticsWidget {
    let mut widget = OpticsWidget::new(OpticsSettings {
        min_samples,
        ..OpticsSettings::default()
    });
    widget.set_data(Some(blobs_table()));
    widget
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

/// Test a fresh widget waits for data.
#[test]
fn test_initial_state() {
    let widget = OpticsWidget::default();
    assert_eq!(widget.state(), OpticsState::Idle);
    assert!(!widget.is_options_enabled());
    assert_eq!(widget.output().sends(), 0);
    assert_eq!(widget.output().spec().name, "Data");
    assert_eq!(
        widget.messages().info(),
        ["No data on input yet, waiting to get something."]
    );
    assert_eq!(widget.cut_point(), 0.05);
}

/// Test valid data is clustered and emitted.
#[test]
fn test_data_is_clustered() {
    let widget = widget_with_data(3);

    assert_eq!(widget.state(), OpticsState::Computed);
    assert!(widget.is_options_enabled());
    assert_eq!(widget.output().sends(), 1);

    let out = widget.output().value().unwrap();
    assert_eq!(out.len(), 13);
    assert_eq!(out.domain().metas()[0].name(), CLUSTER_COLUMN);

    assert_eq!(
        widget.messages().info(),
        [
            "13 instances in input data set",
            "3 values in the categorical outcome",
            "2 values in the cluster outcome",
            "1 noisy samples in the leaf cluster",
        ]
    );
    assert_eq!(widget.plot().unwrap().values.len(), 13);
}

/// Test a single-row table is refused with a blocking error.
#[test]
fn test_single_row_is_refused() {
    let mut widget = widget_with_data(3);
    widget.set_data(Some(single_row_table()));

    assert_eq!(widget.state(), OpticsState::Idle);
    assert!(widget.output().value().is_none());
    assert_eq!(widget.output().sends(), 2);
    assert_eq!(
        widget.messages().error(),
        Some("Not enough unique data instances. At least two are required.")
    );
}

/// Test clearing the input returns to idle and clears the output.
#[test]
fn test_clear_input() {
    let mut widget = widget_with_data(3);
    widget.set_input(None);

    assert_eq!(widget.state(), OpticsState::Idle);
    assert!(widget.result().is_none());
    assert!(widget.output().value().is_none());
    assert!(widget.messages().error().is_none());
}

// ============================================================================
// Parameter Tests
// ============================================================================

/// Test a parameter change recomputes from scratch and emits again.
#[test]
fn test_parameter_change_recomputes() {
    let mut widget = widget_with_data(3);
    widget.set_xi(0.2).unwrap();
    assert_eq!(widget.output().sends(), 2);
    assert_eq!(widget.settings().xi, 0.2);

    widget.set_min_samples(4).unwrap();
    assert_eq!(widget.output().sends(), 3);
    assert_eq!(widget.state(), OpticsState::Computed);
    assert_eq!(widget.result().unwrap().graph.len(), 13);
}

/// Test out-of-range values are rejected without a recompute.
#[test]
fn test_invalid_parameters_rejected() {
    let mut widget = widget_with_data(3);

    assert_eq!(
        widget.set_min_samples(1),
        Err(WidgetError::InvalidMinSamples(1))
    );
    assert!(widget.set_xi(1.5).is_err());
    assert_eq!(widget.settings().min_samples, 3);
    assert_eq!(widget.output().sends(), 1);
}

/// Test a neighbourhood larger than the data leaves no output.
#[test]
fn test_min_samples_above_row_count() {
    let mut widget = widget_with_data(3);
    widget.set_min_samples(20).unwrap();

    assert_eq!(widget.state(), OpticsState::Ready);
    assert!(widget.output().value().is_none());
    assert!(widget.messages().has(MessageLevel::Error));
    assert!(!widget
        .messages()
        .info()
        .iter()
        .any(|l| l.contains("cluster outcome")));

    widget.set_min_samples(3).unwrap();
    assert_eq!(widget.state(), OpticsState::Computed);
    assert!(widget.messages().error().is_none());
}

/// Test the cut point is stored.
#[test]
fn test_cut_point() {
    let mut widget = widget_with_data(3);
    widget.set_cut_point(0.7);
    assert_eq!(widget.cut_point(), 0.7);
}

// ============================================================================
// Metric Coupling Tests
// ============================================================================

/// Test an unsupported metric resets the algorithm with a warning.
#[test]
fn test_metric_resets_algorithm() {
    let mut widget = widget_with_data(3);
    widget.set_algorithm(NeighborAlgorithm::KdTree);

    widget.set_metric(DistanceMetric::Cosine);
    assert_eq!(widget.settings().algorithm, NeighborAlgorithm::Auto);
    assert_eq!(widget.settings().metric, DistanceMetric::Cosine);
    let warning = widget.messages().warning().unwrap();
    assert!(warning.contains("cosine") && warning.contains("kd Tree"));
    assert_eq!(widget.state(), OpticsState::Computed);

    widget.set_metric(DistanceMetric::Manhattan);
    assert!(widget.messages().warning().is_none());
}

/// Test an algorithm that cannot use the metric falls back to auto.
#[test]
fn test_incompatible_algorithm_resets() {
    let mut widget = widget_with_data(3);
    widget.set_metric(DistanceMetric::Correlation);
    let sends = widget.output().sends();

    widget.set_algorithm(NeighborAlgorithm::BallTree);
    assert_eq!(widget.settings().algorithm, NeighborAlgorithm::Auto);
    let warning = widget.messages().warning().unwrap();
    assert!(warning.contains("Ball Tree") && warning.contains("correlation"));
    assert!(widget.messages().error().is_none());
    assert_eq!(widget.output().sends(), sends + 1);
    assert_eq!(widget.result().unwrap().algorithm, NeighborAlgorithm::Brute);

    widget.set_algorithm(NeighborAlgorithm::Brute);
    assert_eq!(widget.settings().algorithm, NeighborAlgorithm::Brute);
    assert!(widget.messages().warning().is_none());
}
