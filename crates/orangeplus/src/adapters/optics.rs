//! Density-based clustering widget.
//!
//! ## Purpose
//!
//! This adapter keeps the state of the OPTICS widget: the incoming table, the
//! four clustering knobs, the last clustering result and the annotated output
//! table. Data arrival and every knob change re-run `compute_optics`.
//!
//! ## Design notes
//!
//! * **Visible corrections**: An incompatible metric and search strategy pair
//!   is never kept. Whichever side changed, the strategy falls back to `Auto`
//!   and a warning names both.
//! * **Blocking errors**: Any failure clears the output.
//!
//! ## Key concepts
//!
//! * **Idle**: No data; options disabled, output `None`.
//! * **Ready**: Data present; options enabled.
//! * **Computed**: Plot and output table populated.
//!
//! ## Invariants
//!
//! * The output slot holds the annotated table exactly when a result exists.

// Internal dependencies
use crate::adapters::messages::{Messages, NOT_ENOUGH_INSTANCES, WAITING_FOR_DATA};
use crate::adapters::Widget;
use crate::algorithms::neighbors::NeighborAlgorithm;
use crate::engine::executor::{compute_optics, OpticsSettings};
use crate::engine::output::{ClusteringResult, ReachabilityPlot};
use crate::engine::validator::Validator;
use crate::math::distance::DistanceMetric;
use crate::primitives::errors::WidgetError;
use crate::primitives::signals::{OutputSlot, SignalSpec, WidgetMeta, CATEGORY};
use crate::primitives::table::Table;

// ============================================================================
// Widget
// ============================================================================

/// Lifecycle state of the clustering widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpticsState {
    /// No usable input.
    Idle,
    /// Input present, no result (the last computation failed).
    Ready,
    /// Plot and output populated.
    Computed,
}

/// OPTICS widget state.
#[derive(Debug, Clone)]
pub struct OpticsWidget {
    settings: OpticsSettings,
    data: Option<Table>,
    result: Option<ClusteringResult>,
    output: OutputSlot,
    messages: Messages,
    cut_point: f64,
}

impl OpticsWidget {
    /// Registry entry.
    pub const META: WidgetMeta = WidgetMeta {
        name: "OPTICS",
        description: "Dynamically clusters unlabelled data by density",
        icon: "icons/OPTICS.svg",
        priority: 20,
        category: CATEGORY,
        inputs: &[SignalSpec::table("Data")],
        outputs: &[SignalSpec::table("Data")],
    };

    /// Widget restored from persisted settings.
    pub fn new(settings: OpticsSettings) -> Self {
        let mut messages = Messages::new();
        messages.set_info([WAITING_FOR_DATA]);
        Self {
            cut_point: settings.xi,
            settings,
            data: None,
            result: None,
            output: OutputSlot::new(Self::META.outputs[0]),
            messages,
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Receive a table on the `Data` input.
    ///
    /// `None` or a table with fewer than two rows returns the widget to idle
    /// and clears the output.
    pub fn set_data(&mut self, data: Option<Table>) {
        self.messages.clear_error();
        let table = match data {
            Some(t) if t.len() >= 2 => t,
            other => {
                if other.is_some() {
                    self.messages.set_error(NOT_ENOUGH_INSTANCES);
                }
                log::debug!("optics: idle");
                self.data = None;
                self.result = None;
                self.messages.set_info([WAITING_FOR_DATA]);
                self.output.send(None);
                return;
            }
        };

        let mut info = vec![format!("{} instances in input data set", table.len())];
        if let Some(class_var) = table.domain().class_var().filter(|c| c.is_discrete()) {
            info.push(format!(
                "{} values in the categorical outcome",
                class_var.values().len()
            ));
        }
        self.messages.set_info(info);
        log::debug!("optics: received {} instances", table.len());
        self.data = Some(table);
        self.commit();
    }

    /// Change the core-point neighbourhood size.
    pub fn set_min_samples(&mut self, min_samples: usize) -> Result<(), WidgetError> {
        Validator::validate_min_samples(min_samples)?;
        self.settings.min_samples = min_samples;
        self.commit();
        Ok(())
    }

    /// Change the minimum steepness.
    pub fn set_xi(&mut self, xi: f64) -> Result<(), WidgetError> {
        Validator::validate_xi(xi)?;
        self.settings.xi = xi;
        self.commit();
        Ok(())
    }

    /// Change the distance metric.
    ///
    /// If the current search strategy cannot use `metric`, the strategy is
    /// reset to `Auto` and a warning is shown.
    pub fn set_metric(&mut self, metric: DistanceMetric) {
        self.settings.metric = metric;
        if self.settings.algorithm.supports(metric) {
            self.messages.clear_warning();
        } else {
            let previous = self.settings.algorithm;
            self.settings.algorithm = NeighborAlgorithm::Auto;
            self.messages.set_warning(format!(
                "Metric '{}' is not supported by '{}'; neighbourhood algorithm reset to '{}'.",
                metric.key(),
                previous.name(),
                NeighborAlgorithm::Auto.name()
            ));
        }
        self.commit();
    }

    /// Change the neighbour-search strategy.
    ///
    /// A strategy that cannot use the current metric is replaced by `Auto`
    /// and a warning is shown.
    pub fn set_algorithm(&mut self, algorithm: NeighborAlgorithm) {
        if algorithm.supports(self.settings.metric) {
            self.settings.algorithm = algorithm;
            self.messages.clear_warning();
        } else {
            self.settings.algorithm = NeighborAlgorithm::Auto;
            self.messages.set_warning(format!(
                "'{}' does not support metric '{}'; neighbourhood algorithm reset to '{}'.",
                algorithm.name(),
                self.settings.metric.key(),
                NeighborAlgorithm::Auto.name()
            ));
        }
        self.commit();
    }

    /// Record the threshold the user dragged on the reachability plot.
    pub fn set_cut_point(&mut self, value: f64) {
        self.cut_point = value;
    }

    // ========================================================================
    // Computation
    // ========================================================================

    /// Recompute from the current data and settings and emit the result.
    pub fn commit(&mut self) {
        let Some(table) = &self.data else {
            return;
        };

        match compute_optics(table, &self.settings) {
            Ok(result) => {
                self.messages.clear_error();
                let mut info: Vec<String> = self
                    .messages
                    .info()
                    .iter()
                    .filter(|l| !is_result_line(l))
                    .cloned()
                    .collect();
                info.push(format!("{} values in the cluster outcome", result.n_clusters));
                info.push(format!(
                    "{} noisy samples in the leaf cluster",
                    result.n_noise()
                ));
                self.messages.set_info(info);
                self.output.send(Some(result.table.clone()));
                self.result = Some(result);
            }
            Err(e) => {
                let message = match e {
                    WidgetError::TooFewInstances { .. } => NOT_ENOUGH_INSTANCES.to_string(),
                    other => other.to_string(),
                };
                self.messages.set_error(message);
                let info: Vec<String> = self
                    .messages
                    .info()
                    .iter()
                    .filter(|l| !is_result_line(l))
                    .cloned()
                    .collect();
                self.messages.set_info(info);
                self.result = None;
                self.output.send(None);
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn settings(&self) -> &OpticsSettings {
        &self.settings
    }

    pub fn data(&self) -> Option<&Table> {
        self.data.as_ref()
    }

    /// Last clustering result.
    pub fn result(&self) -> Option<&ClusteringResult> {
        self.result.as_ref()
    }

    /// Current reachability plot.
    pub fn plot(&self) -> Option<&ReachabilityPlot> {
        self.result.as_ref().map(|r| &r.plot)
    }

    /// The `Data` output.
    pub fn output(&self) -> &OutputSlot {
        &self.output
    }

    pub fn cut_point(&self) -> f64 {
        self.cut_point
    }

    /// Whether the option controls accept input.
    pub fn is_options_enabled(&self) -> bool {
        self.data.is_some()
    }

    pub fn state(&self) -> OpticsState {
        match (&self.data, &self.result) {
            (None, _) => OpticsState::Idle,
            (Some(_), None) => OpticsState::Ready,
            (Some(_), Some(_)) => OpticsState::Computed,
        }
    }
}

impl Default for OpticsWidget {
    fn default() -> Self {
        Self::new(OpticsSettings::default())
    }
}

impl Widget for OpticsWidget {
    fn meta(&self) -> &'static WidgetMeta {
        &Self::META
    }

    fn set_input(&mut self, data: Option<Table>) {
        self.set_data(data);
    }

    fn messages(&self) -> &Messages {
        &self.messages
    }
}

/// Whether an info line describes a clustering result.
fn is_result_line(line: &str) -> bool {
    line.ends_with("values in the cluster outcome")
        || line.ends_with("noisy samples in the leaf cluster")
}
