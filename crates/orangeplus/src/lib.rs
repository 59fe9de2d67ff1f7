//! # orangeplus: density, clustering and oversampling widgets
//!
//! Three analysis widgets for a visual data-mining host, each a thin reactive
//! adapter around a pure computation on a labelled table:
//!
//! - **KDE-2D**: bivariate Gaussian kernel density estimate of two continuous
//!   variables on a 100 x 100 grid, with contour lines.
//! - **OPTICS**: density-based ordering with xi-steepness cluster extraction,
//!   a reachability plot, and a `Cluster` meta column on the output table.
//! - **SMOTE**: synthetic minority oversampling that rebalances the classes.
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::array;
//! use orangeplus::prelude::*;
//!
//! let domain = Domain::new(
//!     vec![Variable::continuous("a"), Variable::continuous("b")],
//!     Some(Variable::discrete("class", ["no", "yes"])),
//!     vec![],
//! );
//! let x = array![
//!     [0.0, 0.1], [0.2, 0.0], [0.1, 0.3], [0.3, 0.2],
//!     [0.0, 0.4], [5.0, 5.1], [5.2, 4.9], [5.1, 5.3],
//! ];
//! let y = array![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
//! let table = Table::from_features(domain, x, Some(y))?;
//!
//! // Cluster
//! let clustering = Optics::new().min_samples(2).build()?.fit(&table)?;
//! assert_eq!(clustering.table.len(), table.len());
//!
//! // Rebalance
//! let balanced = Smote::new().k_neighbors(2).build()?.fit(&table)?;
//! assert_eq!(balanced.table.len(), 10);
//!
//! // Estimate the density of the two attributes
//! let plot = Kde2d::new().attributes(0, 1).build()?.fit(&table)?;
//! assert_eq!(plot.grid.values.dim(), (100, 100));
//! # Ok::<(), WidgetError>(())
//! ```
//!
//! ## Widgets
//!
//! Widgets hold settings, the last input and the last artifact. The host
//! delivers inputs and reads outputs and messages:
//!
//! ```rust
//! use orangeplus::prelude::*;
//!
//! let mut widget = OpticsWidget::default();
//! widget.set_data(None);
//! assert!(widget.output().value().is_none());
//! assert_eq!(widget.state(), OpticsState::Idle);
//! ```
//!
//! ## Features
//!
//! - `parallel`: evaluate density grids and core distances with `rayon`.
//! - `dev`: expose the internal layers for white-box testing.
//!
//! ## Logging
//!
//! The crate logs through the `log` facade and installs no logger. State
//! transitions and emitted outputs are logged at `debug`, automatic
//! corrections at `warn`, and computations at `trace`.

// Layer 1: Primitives - data structures and basic utilities.
mod primitives;

// Layer 2: Math - pure mathematical functions.
mod math;

// Layer 3: Algorithms - density, neighbours, clustering, resampling.
mod algorithms;

// Layer 4: Engine - validation, results and compute functions.
mod engine;

// Layer 5: Adapters - reactive widgets.
mod adapters;

// High-level fluent API.
mod api;

// Standard prelude.
pub mod prelude {
    pub use crate::api::{
        compute_kde2d, compute_optics, compute_smote, registry, BandwidthMethod,
        ClusteringResult, Color, DistanceMetric, Domain, KdeBuilder as Kde2d, KdePlot,
        KdeSettings, Kde2dModel, Kde2dWidget, MessageLevel, Messages, NeighborAlgorithm,
        OpticsBuilder as Optics, OpticsModel, OpticsSettings, OpticsState, OpticsWidget,
        OutputSlot, ReachabilityPlot, ResamplingResult, ResamplingSummary, Role,
        SamplingStrategy, SignalSpec, SignalType, SmoteBuilder as Smote, SmoteModel,
        SmoteSettings, SmoteWidget, Table, Variable, VariableKind, Widget, WidgetError,
        WidgetMeta, CATEGORY, CLUSTER_COLUMN,
    };
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
