//! Typed signal slots and widget descriptors.
//!
//! ## Purpose
//!
//! Widgets declare the table-shaped inputs they accept and the outputs they
//! emit. The host reads these declarations to wire widgets together and reads
//! `OutputSlot` to pick up emitted tables.
//!
//! ## Invariants
//!
//! * An output slot holds only the most recently sent value.
//! * Sending `None` clears downstream widgets.

// Internal dependencies
use crate::primitives::table::Table;

/// Category under which all widgets of this crate are listed.
pub const CATEGORY: &str = "Orange Plus";

/// Payload type carried by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalType {
    /// A data table.
    Table,
}

/// Declaration of an input or output signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalSpec {
    /// Name shown on the canvas link.
    pub name: &'static str,
    /// Payload type.
    pub kind: SignalType,
}

impl SignalSpec {
    /// Table-typed signal with the given name.
    pub const fn table(name: &'static str) -> Self {
        Self {
            name,
            kind: SignalType::Table,
        }
    }
}

/// Static description of a widget for the host's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetMeta {
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Icon resource path.
    pub icon: &'static str,
    /// Ordering within the category (lower first).
    pub priority: u32,
    /// Category name.
    pub category: &'static str,
    /// Accepted inputs.
    pub inputs: &'static [SignalSpec],
    /// Emitted outputs.
    pub outputs: &'static [SignalSpec],
}

/// Output slot holding the last emitted table.
#[derive(Debug, Clone)]
pub struct OutputSlot {
    spec: SignalSpec,
    value: Option<Table>,
    sends: usize,
}

impl OutputSlot {
    /// Create an empty slot for the given signal.
    pub fn new(spec: SignalSpec) -> Self {
        Self {
            spec,
            value: None,
            sends: 0,
        }
    }

    /// Emit a value (or clear the output with `None`).
    pub fn send(&mut self, value: Option<Table>) {
        log::debug!(
            "output '{}' <- {}",
            self.spec.name,
            match &value {
                Some(t) => format!("table with {} instances", t.len()),
                None => "None".to_string(),
            }
        );
        self.value = value;
        self.sends += 1;
    }

    /// The most recently emitted value.
    pub fn value(&self) -> Option<&Table> {
        self.value.as_ref()
    }

    /// Number of emissions so far.
    pub fn sends(&self) -> usize {
        self.sends
    }

    /// Signal declaration.
    pub fn spec(&self) -> &SignalSpec {
        &self.spec
    }
}
