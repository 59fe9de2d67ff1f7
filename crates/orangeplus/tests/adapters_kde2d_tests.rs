//! Tests for the KDE-2D widget.
//!
//! ## Test Organization
//!
//! 1. **Data Arrival** - Attribute list, selection reset, clearing
//! 2. **Selection** - Recompute on two attributes, no-op otherwise
//! 3. **Failures** - Degenerate data surfaces an error

use ndarray::{array, Array2};

use orangeplus::prelude::*;

fn scatter_table() -> Table {
    let domain = Domain::new(
        vec![
            Variable::continuous("sepal"),
            Variable::discrete("kind", ["a", "b"]),
            Variable::continuous("petal"),
        ],
        None,
        vec![],
    );
    let x = Array2::from_shape_fn((20, 3), |(i, j)| match j {
        0 => (i as f64 * 0.37).sin() * 3.0,
        1 => (i % 2) as f64,
        _ => (i as f64 * 0.91).cos() + i as f64 * 0.1,
    });
    Table::from_features(domain, x, None).unwrap()
}

// ============================================================================
// Data Arrival Tests
// ============================================================================

/// Test a fresh widget shows nothing.
#[test]
fn test_initial_state() {
    let widget = Kde2dWidget::default();
    assert!(widget.plot().is_none());
    assert!(widget.data().is_none());
    assert!(!widget.is_options_enabled());
    assert_eq!(widget.meta().name, "KDE-2D");
    assert!(widget.meta().outputs.is_empty());
}

/// Test new data lists continuous variables and resets the selection.
#[test]
fn test_data_resets_selection() {
    let mut widget = Kde2dWidget::new(KdeSettings {
        attributes: vec![0, 1],
        ..KdeSettings::default()
    });
    widget.set_data(Some(scatter_table()));

    assert_eq!(widget.attribute_names(), ["sepal", "petal"]);
    assert_eq!(widget.settings().attributes, vec![0]);
    assert!(widget.is_options_enabled());
    assert!(widget.plot().is_none());
}

/// Test clearing the input clears the plot and disables options.
#[test]
fn test_clear_input() {
    let mut widget = Kde2dWidget::default();
    widget.set_data(Some(scatter_table()));
    widget.set_attributes(vec![0, 1]);
    assert!(widget.plot().is_some());

    widget.set_input(None);
    assert!(widget.plot().is_none());
    assert!(widget.attribute_names().is_empty());
    assert!(!widget.is_options_enabled());
}

// ============================================================================
// Selection Tests
// ============================================================================

/// Test selecting two attributes draws the plot.
#[test]
fn test_two_attributes_compute_plot() {
    let mut widget = Kde2dWidget::default();
    widget.set_data(Some(scatter_table()));
    widget.set_attributes(vec![1, 0]);

    let plot = widget.plot().unwrap();
    assert_eq!(plot.x_label, "petal");
    assert_eq!(plot.y_label, "sepal");
    assert_eq!(plot.grid.values.dim(), (100, 100));
    assert!(widget.messages().error().is_none());
}

/// Test other selection sizes leave the previous plot in place.
#[test]
fn test_incomplete_selection_is_noop() {
    let mut widget = Kde2dWidget::default();
    widget.set_data(Some(scatter_table()));
    widget.set_attributes(vec![0, 1]);
    let before = widget.plot().cloned();

    widget.set_attributes(vec![1]);
    assert_eq!(widget.plot().cloned(), before);
    widget.set_attributes(vec![0, 1, 1]);
    assert_eq!(widget.plot().cloned(), before);
    assert!(widget.messages().error().is_none());
}

/// Test changing the bandwidth recomputes.
#[test]
fn test_bandwidth_change_recomputes() {
    let mut widget = Kde2dWidget::default();
    widget.set_data(Some(scatter_table()));
    widget.set_attributes(vec![0, 1]);
    let scott = widget.plot().unwrap().factor;

    widget.set_bandwidth(BandwidthMethod::Silverman);
    let plot = widget.plot().unwrap();
    assert_eq!(plot.bandwidth, BandwidthMethod::Silverman);
    // In two dimensions both rules give the same factor.
    assert!((plot.factor - scott).abs() < 1e-12);
}

// ============================================================================
// Failure Tests
// ============================================================================

/// Test a singular covariance is shown as an error.
#[test]
fn test_singular_data_reports_error() {
    let domain = Domain::new(
        vec![Variable::continuous("u"), Variable::continuous("v")],
        None,
        vec![],
    );
    let x = array![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
    let table = Table::from_features(domain, x, None).unwrap();

    let mut widget = Kde2dWidget::default();
    widget.set_data(Some(table));
    widget.set_attributes(vec![0, 1]);

    assert!(widget.plot().is_none());
    assert!(widget.messages().has(MessageLevel::Error));
}
