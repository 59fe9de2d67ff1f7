//! Layer 5: Adapters
//!
//! # Purpose
//!
//! This layer adapts the engine to the host's reactive widget model. Each
//! widget owns its settings, the last input, the last artifact and its
//! output slots, and re-runs its compute function whenever an input or a
//! setting changes:
//!
//! - **KDE-2D**: Bivariate density heat-map with contours
//! - **OPTICS**: Reachability plot and cluster-annotated table
//! - **SMOTE**: Rebalanced table
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters ← You are here
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

// Internal dependencies
use crate::primitives::signals::WidgetMeta;
use crate::primitives::table::Table;

/// Widget messages.
pub mod messages;

/// Bivariate density widget.
pub mod kde2d;

/// Density-based clustering widget.
pub mod optics;

/// Oversampling widget.
pub mod smote;

use messages::Messages;

/// Behaviour shared by every widget, as seen by the host.
pub trait Widget {
    /// Static registry entry.
    fn meta(&self) -> &'static WidgetMeta;

    /// Deliver a value on the widget's (single) input.
    fn set_input(&mut self, data: Option<Table>);

    /// Messages currently shown.
    fn messages(&self) -> &Messages;
}

/// Registry entries of all widgets, in priority order.
pub fn registry() -> [&'static WidgetMeta; 3] {
    let mut entries = [
        &kde2d::Kde2dWidget::META,
        &optics::OpticsWidget::META,
        &smote::SmoteWidget::META,
    ];
    entries.sort_by_key(|m| m.priority);
    entries
}
