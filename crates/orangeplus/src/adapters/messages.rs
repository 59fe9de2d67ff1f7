//! User-visible widget messages.
//!
//! ## Purpose
//!
//! Widgets report problems and progress through three channels: a blocking
//! error banner, a non-blocking warning banner and a box of info lines. The
//! host renders whatever `Messages` currently holds.
//!
//! ## Invariants
//!
//! * At most one error and one warning are shown at a time; setting a new one
//!   replaces the old.

/// Info line shown before any data arrives.
pub const WAITING_FOR_DATA: &str = "No data on input yet, waiting to get something.";

/// Error shown when a clustering input has fewer than two rows.
pub const NOT_ENOUGH_INSTANCES: &str =
    "Not enough unique data instances. At least two are required.";

/// Severity of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Error,
    Warning,
    Info,
}

/// Messages currently displayed by a widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    error: Option<String>,
    warning: Option<String>,
    info: Vec<String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a blocking error.
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("error: {message}");
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Show a warning.
    pub fn set_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.warning = Some(message);
    }

    pub fn clear_warning(&mut self) {
        self.warning = None;
    }

    /// Replace the info lines.
    pub fn set_info<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.info = lines.into_iter().map(Into::into).collect();
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn info(&self) -> &[String] {
        &self.info
    }

    /// Whether a message of the given level is shown.
    pub fn has(&self, level: MessageLevel) -> bool {
        match level {
            MessageLevel::Error => self.error.is_some(),
            MessageLevel::Warning => self.warning.is_some(),
            MessageLevel::Info => !self.info.is_empty(),
        }
    }
}
