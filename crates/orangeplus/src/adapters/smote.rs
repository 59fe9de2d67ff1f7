//! Class-rebalancing widget.
//!
//! ## Purpose
//!
//! This adapter keeps the state of the SMOTE widget: the unbalanced input, the
//! resampling settings, the latest result and the `Balanced Dataset` output.
//!
//! ## Design notes
//!
//! * **Commit modes**: In automatic mode every parameter change recomputes and
//!   emits. In manual mode parameter changes only mark the widget dirty and
//!   `commit` does the work. New data always recomputes and emits.
//! * **Neighbour clamp**: The persisted `k_neighbors` is never rewritten; the
//!   clamped value is reported by `effective_k`.
//!
//! ## Invariants
//!
//! * After `commit`, the output holds the current result's table (or `None`).
//! * `is_dirty` is false right after any emission.

// Internal dependencies
use crate::adapters::messages::{Messages, WAITING_FOR_DATA};
use crate::adapters::Widget;
use crate::algorithms::smote::SamplingStrategy;
use crate::engine::executor::{compute_smote, SmoteSettings};
use crate::engine::output::ResamplingResult;
use crate::engine::validator::Validator;
use crate::primitives::errors::WidgetError;
use crate::primitives::signals::{OutputSlot, SignalSpec, WidgetMeta, CATEGORY};
use crate::primitives::table::Table;

// ============================================================================
// Widget
// ============================================================================

/// SMOTE widget state.
#[derive(Debug, Clone)]
pub struct SmoteWidget {
    settings: SmoteSettings,
    data: Option<Table>,
    result: Option<ResamplingResult>,
    output: OutputSlot,
    messages: Messages,
    status: Option<String>,
    dirty: bool,
}

impl SmoteWidget {
    /// Registry entry.
    pub const META: WidgetMeta = WidgetMeta {
        name: "SMOTE",
        description: "Generates oversamples to balance the distribution of classes within a dataset",
        icon: "icons/SMOTE.svg",
        priority: 10,
        category: CATEGORY,
        inputs: &[SignalSpec::table("Unbalanced Dataset")],
        outputs: &[SignalSpec::table("Balanced Dataset")],
    };

    /// Widget restored from persisted settings.
    pub fn new(settings: SmoteSettings) -> Self {
        let mut messages = Messages::new();
        messages.set_info([WAITING_FOR_DATA]);
        Self {
            settings,
            data: None,
            result: None,
            output: OutputSlot::new(Self::META.outputs[0]),
            messages,
            status: None,
            dirty: false,
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Receive a table on the `Unbalanced Dataset` input and emit the result.
    pub fn set_data(&mut self, data: Option<Table>) {
        match data {
            Some(table) => {
                log::debug!("smote: received {} instances", table.len());
                self.data = Some(table);
                self.recompute();
            }
            None => {
                log::debug!("smote: input cleared");
                self.data = None;
                self.result = None;
                self.status = None;
                self.messages.clear();
                self.messages.set_info([WAITING_FOR_DATA]);
            }
        }
        self.emit();
    }

    /// Change the sampling strategy.
    pub fn set_sampling_strategy(&mut self, strategy: SamplingStrategy) {
        self.settings.sampling_strategy = strategy;
        self.on_params_changed();
    }

    /// Change the random seed (0 to 99).
    pub fn set_random_seed(&mut self, seed: u64) -> Result<(), WidgetError> {
        Validator::validate_seed(seed)?;
        self.settings.random_seed = seed;
        self.on_params_changed();
        Ok(())
    }

    /// Change the requested neighbour count (1 to 100).
    pub fn set_k_neighbors(&mut self, k: usize) -> Result<(), WidgetError> {
        Validator::validate_k_neighbors(k)?;
        self.settings.k_neighbors = k;
        self.on_params_changed();
        Ok(())
    }

    /// Switch between automatic and manual commit.
    ///
    /// Leaving manual mode commits any pending change.
    pub fn set_manual_commit(&mut self, manual: bool) {
        self.settings.manual_commit = manual;
        if !manual && self.dirty {
            self.commit();
        }
    }

    fn on_params_changed(&mut self) {
        if self.data.is_none() {
            return;
        }
        if self.settings.manual_commit {
            log::debug!("smote: settings changed, awaiting commit");
            self.dirty = true;
        } else {
            self.recompute();
            self.emit();
        }
    }

    // ========================================================================
    // Computation
    // ========================================================================

    /// Recompute from the current data and settings and emit the result.
    pub fn commit(&mut self) {
        if self.data.is_some() {
            self.recompute();
        }
        self.emit();
    }

    fn recompute(&mut self) {
        let Some(table) = &self.data else {
            return;
        };

        match compute_smote(table, &self.settings) {
            Ok(result) => {
                self.messages.clear_error();
                let summary = result.summary;
                self.messages.set_info([
                    format!("{} instances in input data set", summary.input_instances),
                    format!("{} values in the categorical outcome", summary.class_values),
                    format!("{} instances in output data set", summary.output_instances),
                    summary.oversampling_line(),
                ]);
                self.status = Some(summary.status_line().to_string());
                self.result = Some(result);
            }
            Err(e) => {
                self.messages.set_error(e.to_string());
                self.messages.set_info([format!(
                    "{} instances in input data set",
                    table.len()
                )]);
                self.status = None;
                self.result = None;
            }
        }
    }

    fn emit(&mut self) {
        self.output
            .send(self.result.as_ref().map(|r| r.table.clone()));
        self.dirty = false;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn settings(&self) -> &SmoteSettings {
        &self.settings
    }

    pub fn data(&self) -> Option<&Table> {
        self.data.as_ref()
    }

    /// Last resampling result.
    pub fn result(&self) -> Option<&ResamplingResult> {
        self.result.as_ref()
    }

    /// The `Balanced Dataset` output.
    pub fn output(&self) -> &OutputSlot {
        &self.output
    }

    /// Balance status line of the last result.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Neighbour count used by the last computation.
    pub fn effective_k(&self) -> Option<usize> {
        self.result.as_ref().map(|r| r.effective_k)
    }

    /// Whether settings changed since the last emission.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_options_enabled(&self) -> bool {
        self.data.is_some()
    }
}

impl Default for SmoteWidget {
    fn default() -> Self {
        Self::new(SmoteSettings::default())
    }
}

impl Widget for SmoteWidget {
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
