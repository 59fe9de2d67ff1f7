//! Input validation for widget settings and tables.
//!
//! ## Purpose
//!
//! This module gathers every check performed before a computation runs:
//! table shape and finiteness, class-column requirements and the bounds of
//! each widget parameter.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Side-effect free**: Validators never adjust a value; clamping is the
//!   caller's decision.
//!
//! ## Key concepts
//!
//! * **Parameter Bounds**: `min_samples` in [2, 100], `xi` in [0, 1),
//!   `k_neighbors` in [1, 100], `random_seed` in [0, 99].
//! * **Finite Checks**: Feature matrices must not contain NaN or infinities.
//! * **Compatibility**: Metric and neighbour-search strategy must agree.
//!
//! ## Invariants
//!
//! * All validated inputs satisfy their respective constraints.
//!
//! ## Non-goals
//!
//! * This module does not transform or filter input data.
//! * This module does not perform the computations itself.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::neighbors::NeighborAlgorithm;
use crate::math::distance::DistanceMetric;
use crate::primitives::errors::WidgetError;
use crate::primitives::points::PointSet;
use crate::primitives::table::Table;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for widget settings and input tables.
///
/// All methods fail fast upon identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Bounds
    // ========================================================================

    /// Accepted `min_samples` range.
    pub const MIN_SAMPLES_RANGE: (usize, usize) = (2, 100);

    /// Accepted `k_neighbors` range.
    pub const K_NEIGHBORS_RANGE: (usize, usize) = (1, 100);

    /// Largest accepted random seed.
    pub const MAX_SEED: u64 = 99;

    // ========================================================================
    // Input Validation
    // ========================================================================

    /// Validate a point set: non-empty, at least `min` rows, all values finite.
    pub fn validate_points<T: Float>(points: PointSet<'_, T>, min: usize) -> Result<(), WidgetError> {
        // Check 1: Non-empty
        if points.is_empty() {
            return Err(WidgetError::EmptyInput);
        }

        // Check 2: Sufficient rows
        if points.len() < min {
            return Err(WidgetError::TooFewInstances {
                got: points.len(),
                min,
            });
        }

        // Check 3: All values finite
        if let Some((row, col)) = points.first_non_finite() {
            let value = points.row(row)[col].to_f64().unwrap_or(f64::NAN);
            return Err(WidgetError::InvalidNumericValue(format!(
                "x[{row}, {col}]={value}"
            )));
        }

        Ok(())
    }

    /// Validate that a table has at least one attribute column.
    pub fn validate_has_attributes(table: &Table) -> Result<(), WidgetError> {
        if table.domain().attributes().is_empty() {
            return Err(WidgetError::InvalidInput(
                "table has no attribute columns".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate the class column and return it as integer labels.
    ///
    /// The class variable must exist, be discrete, and have no missing values.
    pub fn validate_class(table: &Table) -> Result<Vec<usize>, WidgetError> {
        let class_var = table
            .domain()
            .class_var()
            .ok_or(WidgetError::MissingClassVariable)?;
        if !class_var.is_discrete() {
            return Err(WidgetError::NonDiscreteClass(class_var.name().to_string()));
        }
        let y = table.y().ok_or(WidgetError::MissingClassVariable)?;

        y.iter()
            .enumerate()
            .map(|(i, &v)| {
                if class_var.value_label(v).is_some() {
                    Ok(v as usize)
                } else {
                    Err(WidgetError::InvalidNumericValue(format!(
                        "{}[{i}]={v} (missing or unknown class value)",
                        class_var.name()
                    )))
                }
            })
            .collect()
    }

    // ========================================================================
    // KDE Parameters
    // ========================================================================

    /// Validate a two-attribute selection against `len` selectable attributes.
    pub fn validate_attribute_selection(selection: &[usize], len: usize) -> Result<(), WidgetError> {
        if selection.len() != 2 {
            return Err(WidgetError::InvalidAttributeSelection {
                got: selection.len(),
            });
        }
        if let Some(&index) = selection.iter().find(|&&i| i >= len) {
            return Err(WidgetError::AttributeOutOfRange { index, len });
        }
        Ok(())
    }

    /// Validate the number of grid points per axis.
    pub fn validate_grid_size(size: usize) -> Result<(), WidgetError> {
        if size < 2 {
            return Err(WidgetError::InvalidGridSize(size));
        }
        Ok(())
    }

    // ========================================================================
    // OPTICS Parameters
    // ========================================================================

    /// Validate the minimum neighbourhood size.
    pub fn validate_min_samples(min_samples: usize) -> Result<(), WidgetError> {
        let (lo, hi) = Self::MIN_SAMPLES_RANGE;
        if !(lo..=hi).contains(&min_samples) {
            return Err(WidgetError::InvalidMinSamples(min_samples));
        }
        Ok(())
    }

    /// Validate the minimum neighbourhood size against the number of rows.
    pub fn validate_min_samples_for(min_samples: usize, instances: usize) -> Result<(), WidgetError> {
        if min_samples > instances {
            return Err(WidgetError::MinSamplesExceedsInstances {
                min_samples,
                instances,
            });
        }
        Ok(())
    }

    /// Validate the steepness threshold.
    pub fn validate_xi(xi: f64) -> Result<(), WidgetError> {
        if !xi.is_finite() || !(0.0..1.0).contains(&xi) {
            return Err(WidgetError::InvalidXi(xi));
        }
        Ok(())
    }

    /// Validate that `algorithm` accepts `metric`.
    pub fn validate_metric(
        metric: DistanceMetric,
        algorithm: NeighborAlgorithm,
    ) -> Result<(), WidgetError> {
        algorithm.check(metric)
    }

    // ========================================================================
    // SMOTE Parameters
    // ========================================================================

    /// Validate the neighbour count.
    pub fn validate_k_neighbors(k: usize) -> Result<(), WidgetError> {
        let (lo, hi) = Self::K_NEIGHBORS_RANGE;
        if !(lo..=hi).contains(&k) {
            return Err(WidgetError::InvalidNeighbors(k));
        }
        Ok(())
    }

    /// Validate the random seed.
    pub fn validate_seed(seed: u64) -> Result<(), WidgetError> {
        if seed > Self::MAX_SEED {
            return Err(WidgetError::InvalidSeed(seed));
        }
        Ok(())
    }

    // ========================================================================
    // Builder Validation
    // ========================================================================

    /// Report a parameter that was set more than once.
    pub fn validate_no_duplicates(duplicate: Option<&'static str>) -> Result<(), WidgetError> {
        if let Some(parameter) = duplicate {
            return Err(WidgetError::DuplicateParameter { parameter });
        }
        Ok(())
    }
}
