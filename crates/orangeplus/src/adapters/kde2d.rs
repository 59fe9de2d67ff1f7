//! Two-dimensional density widget.
//!
//! ## Purpose
//!
//! This adapter keeps the state of the KDE-2D widget: the incoming table, the
//! list of selectable continuous variables, the user's selection and the
//! current plot. Every data or parameter change re-runs `compute_kde2d`.
//!
//! ## Design notes
//!
//! * **Selection gate**: The plot is recomputed only when exactly two
//!   variables are selected; any other selection leaves the last plot as is.
//! * **Fresh data**: New data rebuilds the variable list and resets the
//!   selection to the first variable alone.
//!
//! ## Invariants
//!
//! * `plot` is `None` whenever `data` is `None`.
//! * A shown error means no plot.
//!
//! ## Non-goals
//!
//! * Drawing; the host renders the `KdePlot` descriptor.

// Internal dependencies
use crate::adapters::messages::Messages;
use crate::adapters::Widget;
use crate::engine::executor::{compute_kde2d, KdeSettings};
use crate::engine::output::KdePlot;
use crate::math::kernel::BandwidthMethod;
use crate::primitives::signals::{SignalSpec, WidgetMeta, CATEGORY};
use crate::primitives::table::Table;

// ============================================================================
// Widget
// ============================================================================

/// KDE-2D widget state.
#[derive(Debug, Clone, Default)]
pub struct Kde2dWidget {
    settings: KdeSettings,
    data: Option<Table>,
    attribute_names: Vec<String>,
    plot: Option<KdePlot>,
    messages: Messages,
    options_enabled: bool,
}

impl Kde2dWidget {
    /// Registry entry.
    pub const META: WidgetMeta = WidgetMeta {
        name: "KDE-2D",
        description: "Visualization of two dimensional kernel-density estimate using Gaussian kernels",
        icon: "icons/KDE2D.svg",
        priority: 30,
        category: CATEGORY,
        inputs: &[SignalSpec::table("Data")],
        outputs: &[],
    };

    /// Widget restored from persisted settings.
    pub fn new(settings: KdeSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Receive a table on the `Data` input (`None` clears the widget).
    pub fn set_data(&mut self, data: Option<Table>) {
        self.attribute_names.clear();
        let Some(table) = data else {
            log::debug!("kde2d: input cleared");
            self.data = None;
            self.plot = None;
            self.options_enabled = false;
            self.messages.clear();
            return;
        };

        self.attribute_names = table
            .continuous_variables()
            .into_iter()
            .map(|(_, v)| v.name().to_string())
            .collect();
        log::debug!(
            "kde2d: received {} instances, {} continuous variables",
            table.len(),
            self.attribute_names.len()
        );
        self.data = Some(table);
        self.options_enabled = true;
        self.messages.clear_error();
        self.settings.attributes = vec![0];
        self.on_changed();
    }

    /// Change the attribute selection.
    pub fn set_attributes(&mut self, attributes: Vec<usize>) {
        self.settings.attributes = attributes;
        self.on_changed();
    }

    /// Change the bandwidth rule.
    pub fn set_bandwidth(&mut self, bandwidth: BandwidthMethod) {
        self.settings.bandwidth = bandwidth;
        self.on_changed();
    }

    fn on_changed(&mut self) {
        let Some(table) = &self.data else {
            return;
        };
        if self.settings.attributes.len() != 2 || self.attribute_names.is_empty() {
            return;
        }

        match compute_kde2d(table, &self.settings) {
            Ok(plot) => {
                self.messages.clear_error();
                self.plot = Some(plot);
            }
            Err(e) => {
                self.messages.set_error(e.to_string());
                self.plot = None;
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn settings(&self) -> &KdeSettings {
        &self.settings
    }

    pub fn data(&self) -> Option<&Table> {
        self.data.as_ref()
    }

    /// Names of the selectable continuous variables.
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// Current plot, if any.
    pub fn plot(&self) -> Option<&KdePlot> {
        self.plot.as_ref()
    }

    pub fn is_options_enabled(&self) -> bool {
        self.options_enabled
    }
}

impl Widget for Kde2dWidget {
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
