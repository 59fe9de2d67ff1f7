//! Error types for widget computations.
//!
//! ## Purpose
//!
//! This module defines the error conditions raised while validating tables,
//! building widget configurations and running the density, clustering and
//! resampling computations.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors include the offending values (e.g., actual vs. required counts).
//! * **Deferred**: Duplicate builder parameters are recorded and reported at `build()`.
//! * **Displayable**: Every variant renders a message suitable for a widget error banner.
//!
//! ## Key concepts
//!
//! 1. **Table validation**: Shape mismatches, missing class variables, non-finite values.
//! 2. **Parameter validation**: Out-of-range neighbour counts, steepness, attribute selections.
//! 3. **Compatibility**: Distance metrics not supported by a neighbour-search strategy.
//! 4. **Numerical failures**: Singular covariance in density estimation.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * This module does not provide error recovery or fallback strategies.

// External dependencies
use std::error::Error;
use std::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for widget operations.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// The input table has no rows.
    EmptyInput,

    /// Generic invalid input error with a descriptive message.
    InvalidInput(String),

    /// Input data contains NaN or infinite values where finite values are required.
    InvalidNumericValue(String),

    /// Number of instances is below the minimum requirement.
    TooFewInstances {
        /// Number of instances provided.
        got: usize,
        /// Minimum required instances.
        min: usize,
    },

    /// An array does not match the shape implied by the domain.
    ShapeMismatch {
        /// Which part of the table is malformed.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Bivariate density estimation needs exactly two attributes.
    InvalidAttributeSelection {
        /// Number of attributes selected.
        got: usize,
    },

    /// A selected attribute index does not exist.
    AttributeOutOfRange {
        /// The index provided.
        index: usize,
        /// Number of selectable attributes.
        len: usize,
    },

    /// The kernel covariance matrix is not positive definite.
    SingularCovariance,

    /// Evaluation grids need at least two points per axis.
    InvalidGridSize(usize),

    /// Minimum neighbourhood size must be in [2, 100].
    InvalidMinSamples(usize),

    /// Minimum neighbourhood size exceeds the number of instances.
    MinSamplesExceedsInstances {
        /// The configured minimum neighbourhood size.
        min_samples: usize,
        /// Number of instances.
        instances: usize,
    },

    /// Steepness threshold must be in [0, 1).
    InvalidXi(f64),

    /// The neighbour-search strategy cannot use the distance metric.
    IncompatibleMetric {
        /// Metric implementation key.
        metric: &'static str,
        /// Algorithm implementation key.
        algorithm: &'static str,
    },

    /// The table has no class variable.
    MissingClassVariable,

    /// The class variable is not discrete.
    NonDiscreteClass(String),

    /// Resampling needs at least two distinct classes.
    SingleClass,

    /// Neighbour count must be in [1, 100].
    InvalidNeighbors(usize),

    /// A class chosen for oversampling is too small to have neighbours.
    InsufficientMinorityClass {
        /// Instances in the smallest class.
        count: usize,
    },

    /// Random seed must be in [0, 99].
    InvalidSeed(u64),

    /// A named option could not be parsed.
    UnknownVariant {
        /// Option family (e.g. "metric").
        kind: &'static str,
        /// The unrecognised name.
        name: String,
    },

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for WidgetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::EmptyInput => write!(f, "Input table is empty"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::InvalidNumericValue(s) => write!(f, "Invalid numeric value: {s}"),
            Self::TooFewInstances { got, min } => {
                write!(
                    f,
                    "Not enough unique data instances: got {got}, at least {min} are required"
                )
            }
            Self::ShapeMismatch {
                what,
                expected,
                got,
            } => {
                write!(f, "Shape mismatch in {what}: expected {expected}, got {got}")
            }
            Self::InvalidAttributeSelection { got } => {
                write!(f, "Exactly two attributes must be selected, got {got}")
            }
            Self::AttributeOutOfRange { index, len } => {
                write!(
                    f,
                    "Attribute index {index} is out of range ({len} continuous attributes)"
                )
            }
            Self::SingularCovariance => {
                write!(
                    f,
                    "Kernel covariance is singular; the selected attributes are degenerate or collinear"
                )
            }
            Self::InvalidGridSize(size) => {
                write!(f, "Invalid grid size: {size} (must be at least 2)")
            }
            Self::InvalidMinSamples(ms) => {
                write!(f, "Invalid min_samples: {ms} (must be in [2, 100])")
            }
            Self::MinSamplesExceedsInstances {
                min_samples,
                instances,
            } => {
                write!(
                    f,
                    "min_samples ({min_samples}) must be no greater than the number of instances ({instances})"
                )
            }
            Self::InvalidXi(xi) => write!(f, "Invalid xi: {xi} (must be >= 0 and < 1)"),
            Self::IncompatibleMetric { metric, algorithm } => {
                write!(
                    f,
                    "Metric '{metric}' is not supported by the '{algorithm}' neighbour search"
                )
            }
            Self::MissingClassVariable => write!(f, "Input table has no class variable"),
            Self::NonDiscreteClass(name) => {
                write!(f, "Class variable '{name}' must be categorical")
            }
            Self::SingleClass => {
                write!(f, "The class column needs more than one class")
            }
            Self::InvalidNeighbors(k) => {
                write!(f, "Invalid k_neighbors: {k} (must be in [1, 100])")
            }
            Self::InsufficientMinorityClass { count } => {
                write!(
                    f,
                    "Smallest class has {count} instance(s); at least 2 are needed to synthesize neighbours"
                )
            }
            Self::InvalidSeed(seed) => write!(f, "Invalid random seed: {seed} (must be in [0, 99])"),
            Self::UnknownVariant { kind, name } => write!(f, "Unknown {kind}: '{name}'"),
            Self::DuplicateParameter { parameter } => {
                write!(
                    f,
                    "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
                )
            }
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

impl Error for WidgetError {}
