//! High-level API for the widget computations.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry points. Fluent builders
//! configure each computation, validate the configuration in `build()`, and
//! return a model whose `fit` runs the computation on a table. The same
//! settings records are what the widgets persist.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builders with sensible defaults for all parameters.
//! * **Validated**: Parameters are validated when `.build()` is called.
//! * **Strict**: Setting a parameter twice is reported as an error at `build()`.
//!
//! ## Key concepts
//!
//! ### Configuration Flow
//!
//! 1. Create a builder via `Kde2d::new()`, `Optics::new()` or `Smote::new()`.
//! 2. Chain configuration methods (`.min_samples()`, `.metric()`, etc.).
//! 3. Call `.build()` and then `.fit(&table)` on the model.

// Internal dependencies
use crate::engine::validator::Validator;

// Publicly re-exported types
pub use crate::adapters::kde2d::Kde2dWidget;
pub use crate::adapters::messages::{MessageLevel, Messages};
pub use crate::adapters::optics::{OpticsState, OpticsWidget};
pub use crate::adapters::smote::SmoteWidget;
pub use crate::adapters::{registry, Widget};
pub use crate::algorithms::neighbors::NeighborAlgorithm;
pub use crate::algorithms::smote::SamplingStrategy;
pub use crate::engine::executor::{
    compute_kde2d, compute_optics, compute_smote, KdeSettings, OpticsSettings, SmoteSettings,
    CLUSTER_COLUMN,
};
pub use crate::engine::output::{
    ClusteringResult, KdePlot, ReachabilityPlot, ResamplingResult, ResamplingSummary,
};
pub use crate::math::color::Color;
pub use crate::math::distance::DistanceMetric;
pub use crate::math::kernel::BandwidthMethod;
pub use crate::primitives::errors::WidgetError;
pub use crate::primitives::signals::{OutputSlot, SignalSpec, SignalType, WidgetMeta, CATEGORY};
pub use crate::primitives::table::{Domain, Role, Table, Variable, VariableKind};

// ============================================================================
// KDE-2D
// ============================================================================

/// Fluent builder for bivariate density estimation.
#[derive(Debug, Clone, Default)]
pub struct KdeBuilder {
    /// Selected indices into the continuous-variable list.
    pub attributes: Option<Vec<usize>>,

    /// Bandwidth rule.
    pub bandwidth: Option<BandwidthMethod>,

    /// Grid points per axis.
    pub grid_size: Option<usize>,

    /// Maximum number of contour levels.
    pub contour_levels: Option<usize>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl KdeBuilder {
    /// Create a new builder with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the two continuous variables to estimate.
    pub fn attributes(mut self, first: usize, second: usize) -> Self {
        if self.attributes.is_some() {
            self.duplicate_param = Some("attributes");
        }
        self.attributes = Some(vec![first, second]);
        self
    }

    /// Set the bandwidth rule.
    pub fn bandwidth(mut self, method: BandwidthMethod) -> Self {
        if self.bandwidth.is_some() {
            self.duplicate_param = Some("bandwidth");
        }
        self.bandwidth = Some(method);
        self
    }

    /// Set the number of grid points per axis.
    pub fn grid_size(mut self, size: usize) -> Self {
        if self.grid_size.is_some() {
            self.duplicate_param = Some("grid_size");
        }
        self.grid_size = Some(size);
        self
    }

    /// Set the maximum number of contour levels.
    pub fn contour_levels(mut self, levels: usize) -> Self {
        if self.contour_levels.is_some() {
            self.duplicate_param = Some("contour_levels");
        }
        self.contour_levels = Some(levels);
        self
    }

    /// Validate the configuration.
    pub fn build(self) -> Result<Kde2dModel, WidgetError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        let defaults = KdeSettings::default();
        let settings = KdeSettings {
            attributes: self.attributes.unwrap_or_else(|| vec![0, 1]),
            bandwidth: self.bandwidth.unwrap_or(defaults.bandwidth),
            grid_size: self.grid_size.unwrap_or(defaults.grid_size),
            contour_levels: self.contour_levels.unwrap_or(defaults.contour_levels),
        };
        Validator::validate_grid_size(settings.grid_size)?;
        Ok(Kde2dModel { settings })
    }
}

/// Validated density-estimation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kde2dModel {
    settings: KdeSettings,
}

impl Kde2dModel {
    /// Estimate the density of the selected variables of `table`.
    pub fn fit(&self, table: &Table) -> Result<KdePlot, WidgetError> {
        compute_kde2d(table, &self.settings)
    }

    pub fn settings(&self) -> &KdeSettings {
        &self.settings
    }
}

// ============================================================================
// OPTICS
// ============================================================================

/// Fluent builder for OPTICS clustering.
#[derive(Debug, Clone, Default)]
pub struct OpticsBuilder {
    /// Neighbourhood size defining a core point.
    pub min_samples: Option<usize>,

    /// Distance metric.
    pub metric: Option<DistanceMetric>,

    /// Minimum steepness.
    pub xi: Option<f64>,

    /// Neighbour-search strategy.
    pub algorithm: Option<NeighborAlgorithm>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl OpticsBuilder {
    /// Create a new builder with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the core-point neighbourhood size (2 to 100).
    pub fn min_samples(mut self, min_samples: usize) -> Self {
        if self.min_samples.is_some() {
            self.duplicate_param = Some("min_samples");
        }
        self.min_samples = Some(min_samples);
        self
    }

    /// Set the distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        if self.metric.is_some() {
            self.duplicate_param = Some("metric");
        }
        self.metric = Some(metric);
        self
    }

    /// Set the minimum steepness in `[0, 1)`.
    pub fn xi(mut self, xi: f64) -> Self {
        if self.xi.is_some() {
            self.duplicate_param = Some("xi");
        }
        self.xi = Some(xi);
        self
    }

    /// Set the neighbour-search strategy.
    pub fn algorithm(mut self, algorithm: NeighborAlgorithm) -> Self {
        if self.algorithm.is_some() {
            self.duplicate_param = Some("algorithm");
        }
        self.algorithm = Some(algorithm);
        self
    }

    /// Validate the configuration.
    pub fn build(self) -> Result<OpticsModel, WidgetError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        let defaults = OpticsSettings::default();
        let settings = OpticsSettings {
            min_samples: self.min_samples.unwrap_or(defaults.min_samples),
            metric: self.metric.unwrap_or(defaults.metric),
            xi: self.xi.unwrap_or(defaults.xi),
            algorithm: self.algorithm.unwrap_or(defaults.algorithm),
        };
        Validator::validate_min_samples(settings.min_samples)?;
        Validator::validate_xi(settings.xi)?;
        Validator::validate_metric(settings.metric, settings.algorithm)?;
        Ok(OpticsModel { settings })
    }
}

/// Validated clustering configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticsModel {
    settings: OpticsSettings,
}

impl OpticsModel {
    /// Cluster the rows of `table`.
    pub fn fit(&self, table: &Table) -> Result<ClusteringResult, WidgetError> {
        compute_optics(table, &self.settings)
    }

    pub fn settings(&self) -> &OpticsSettings {
        &self.settings
    }
}

// ============================================================================
// SMOTE
// ============================================================================

/// Fluent builder for SMOTE oversampling.
#[derive(Debug, Clone, Default)]
pub struct SmoteBuilder {
    /// Which classes to oversample.
    pub sampling_strategy: Option<SamplingStrategy>,

    /// Seed of the per-class random streams.
    pub random_seed: Option<u64>,

    /// Requested neighbours per point.
    pub k_neighbors: Option<usize>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl SmoteBuilder {
    /// Create a new builder with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sampling strategy.
    pub fn sampling_strategy(mut self, strategy: SamplingStrategy) -> Self {
        if self.sampling_strategy.is_some() {
            self.duplicate_param = Some("sampling_strategy");
        }
        self.sampling_strategy = Some(strategy);
        self
    }

    /// Set the random seed (0 to 99).
    pub fn random_seed(mut self, seed: u64) -> Self {
        if self.random_seed.is_some() {
            self.duplicate_param = Some("random_seed");
        }
        self.random_seed = Some(seed);
        self
    }

    /// Set the requested neighbour count (1 to 100).
    pub fn k_neighbors(mut self, k: usize) -> Self {
        if self.k_neighbors.is_some() {
            self.duplicate_param = Some("k_neighbors");
        }
        self.k_neighbors = Some(k);
        self
    }

    /// Validate the configuration.
    pub fn build(self) -> Result<SmoteModel, WidgetError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        let defaults = SmoteSettings::default();
        let settings = SmoteSettings {
            sampling_strategy: self.sampling_strategy.unwrap_or(defaults.sampling_strategy),
            random_seed: self.random_seed.unwrap_or(defaults.random_seed),
            k_neighbors: self.k_neighbors.unwrap_or(defaults.k_neighbors),
            manual_commit: defaults.manual_commit,
        };
        Validator::validate_k_neighbors(settings.k_neighbors)?;
        Validator::validate_seed(settings.random_seed)?;
        Ok(SmoteModel { settings })
    }
}

/// Validated oversampling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoteModel {
    settings: SmoteSettings,
}

impl SmoteModel {
    /// Rebalance the classes of `table`.
    pub fn fit(&self, table: &Table) -> Result<ResamplingResult, WidgetError> {
        compute_smote(table, &self.settings)
    }

    pub fn settings(&self) -> &SmoteSettings {
        &self.settings
    }
}
