//! Labelled data tables exchanged between widgets.
//!
//! ## Purpose
//!
//! This module models the host's tabular dataset: rows are instances and
//! columns are variables partitioned into attributes, an optional class
//! variable and meta columns.
//!
//! ## Design notes
//!
//! * **Immutable**: Widgets never modify a table in place; derived tables are new values.
//! * **Shared domains**: The domain is reference counted so derived tables can reuse it.
//! * **Numeric encoding**: Discrete values are stored as indices into the variable's
//!   value list; a missing value is `NaN`.
//!
//! ## Invariants
//!
//! * `x` has one column per attribute, `metas` one column per meta variable.
//! * `y` is present exactly when the domain has a class variable.
//! * All arrays have the same number of rows.
//!
//! ## Non-goals
//!
//! * This module does not read or write any file format.
//! * String-valued meta columns are not represented.

// External dependencies
use ndarray::{Array1, Array2, ArrayView1};
use std::sync::Arc;

// Internal dependencies
use crate::primitives::errors::WidgetError;

// ============================================================================
// Variables
// ============================================================================

/// Value type of a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableKind {
    /// Real-valued variable.
    Continuous,

    /// Categorical variable with an ordered list of value labels.
    Discrete {
        /// Value labels; a stored value `i` refers to `values[i]`.
        values: Vec<String>,
    },
}

/// A named column description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    name: String,
    kind: VariableKind,
}

impl Variable {
    /// Create a continuous variable.
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Continuous,
        }
    }

    /// Create a discrete variable with the given value labels.
    pub fn discrete<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Discrete {
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variable kind.
    pub fn kind(&self) -> &VariableKind {
        &self.kind
    }

    /// Whether the variable is continuous.
    pub fn is_continuous(&self) -> bool {
        matches!(self.kind, VariableKind::Continuous)
    }

    /// Whether the variable is discrete.
    pub fn is_discrete(&self) -> bool {
        matches!(self.kind, VariableKind::Discrete { .. })
    }

    /// Value labels of a discrete variable (empty for continuous ones).
    pub fn values(&self) -> &[String] {
        match &self.kind {
            VariableKind::Discrete { values } => values,
            VariableKind::Continuous => &[],
        }
    }

    /// Label of an encoded discrete value, `None` when missing or out of range.
    pub fn value_label(&self, value: f64) -> Option<&str> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
            return None;
        }
        self.values().get(value as usize).map(String::as_str)
    }

    fn renamed(mut self, name: String) -> Self {
        self.name = name;
        self
    }
}

/// Location of a variable within a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Column `i` of the attribute matrix.
    Attribute(usize),
    /// The class column.
    Class,
    /// Column `i` of the meta matrix.
    Meta(usize),
}

// ============================================================================
// Domain
// ============================================================================

/// Schema of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Domain {
    attributes: Vec<Variable>,
    class_var: Option<Variable>,
    metas: Vec<Variable>,
}

impl Domain {
    /// Create a domain from attributes, an optional class variable and metas.
    pub fn new(attributes: Vec<Variable>, class_var: Option<Variable>, metas: Vec<Variable>) -> Self {
        Self {
            attributes,
            class_var,
            metas,
        }
    }

    /// Attribute variables.
    pub fn attributes(&self) -> &[Variable] {
        &self.attributes
    }

    /// Class variable, if any.
    pub fn class_var(&self) -> Option<&Variable> {
        self.class_var.as_ref()
    }

    /// Meta variables.
    pub fn metas(&self) -> &[Variable] {
        &self.metas
    }

    /// Attributes followed by the class variable, with their roles.
    pub fn variables(&self) -> impl Iterator<Item = (Role, &Variable)> {
        self.attributes
            .iter()
            .enumerate()
            .map(|(i, v)| (Role::Attribute(i), v))
            .chain(self.class_var.iter().map(|v| (Role::Class, v)))
    }

    /// Whether any variable (including metas) carries the given name.
    pub fn contains_name(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .chain(self.class_var.iter())
            .chain(self.metas.iter())
            .any(|v| v.name() == name)
    }

    /// Return `base` or the first free `base (i)` name.
    pub fn unique_name(&self, base: &str) -> String {
        if !self.contains_name(base) {
            return base.to_string();
        }
        let mut i = 1;
        loop {
            let candidate = format!("{base} ({i})");
            if !self.contains_name(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }

    /// New domain with one more meta variable, renamed if its name is taken.
    pub fn with_meta(&self, var: Variable) -> Domain {
        let name = self.unique_name(var.name());
        let mut metas = self.metas.clone();
        metas.push(var.renamed(name));
        Domain {
            attributes: self.attributes.clone(),
            class_var: self.class_var.clone(),
            metas,
        }
    }
}

// ============================================================================
// Table
// ============================================================================

/// In-memory labelled dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    domain: Arc<Domain>,
    x: Array2<f64>,
    y: Option<Array1<f64>>,
    metas: Array2<f64>,
    weights: Option<Array1<f64>>,
}

impl Table {
    /// Create a table, checking every array against the domain.
    pub fn new(
        domain: impl Into<Arc<Domain>>,
        x: Array2<f64>,
        y: Option<Array1<f64>>,
        metas: Array2<f64>,
    ) -> Result<Self, WidgetError> {
        let domain = domain.into();
        let n = x.nrows();

        if x.ncols() != domain.attributes.len() {
            return Err(WidgetError::ShapeMismatch {
                what: "attribute columns",
                expected: domain.attributes.len(),
                got: x.ncols(),
            });
        }

        match (&domain.class_var, &y) {
            (Some(_), Some(y)) if y.len() != n => {
                return Err(WidgetError::ShapeMismatch {
                    what: "class rows",
                    expected: n,
                    got: y.len(),
                });
            }
            (Some(_), None) => {
                return Err(WidgetError::InvalidInput(
                    "domain has a class variable but no class column was given".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(WidgetError::MissingClassVariable);
            }
            _ => {}
        }

        if metas.ncols() != domain.metas.len() {
            return Err(WidgetError::ShapeMismatch {
                what: "meta columns",
                expected: domain.metas.len(),
                got: metas.ncols(),
            });
        }
        if metas.nrows() != n {
            return Err(WidgetError::ShapeMismatch {
                what: "meta rows",
                expected: n,
                got: metas.nrows(),
            });
        }

        Ok(Self {
            domain,
            x,
            y,
            metas,
            weights: None,
        })
    }

    /// Create a table without meta columns.
    pub fn from_features(
        domain: impl Into<Arc<Domain>>,
        x: Array2<f64>,
        y: Option<Array1<f64>>,
    ) -> Result<Self, WidgetError> {
        let n = x.nrows();
        Self::new(domain, x, y, Array2::zeros((n, 0)))
    }

    /// Attach instance weights.
    pub fn with_weights(mut self, weights: Array1<f64>) -> Result<Self, WidgetError> {
        if weights.len() != self.len() {
            return Err(WidgetError::ShapeMismatch {
                what: "weights",
                expected: self.len(),
                got: weights.len(),
            });
        }
        self.weights = Some(weights);
        Ok(self)
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    /// Whether the table has no instances.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Table schema.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Shared handle to the schema.
    pub fn domain_arc(&self) -> Arc<Domain> {
        Arc::clone(&self.domain)
    }

    /// Attribute matrix.
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    /// Class column.
    pub fn y(&self) -> Option<&Array1<f64>> {
        self.y.as_ref()
    }

    /// Meta matrix.
    pub fn metas(&self) -> &Array2<f64> {
        &self.metas
    }

    /// Instance weights.
    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.weights.as_ref()
    }

    /// View of a single column.
    pub fn column(&self, role: Role) -> Option<ArrayView1<'_, f64>> {
        match role {
            Role::Attribute(i) if i < self.x.ncols() => Some(self.x.column(i)),
            Role::Class => self.y.as_ref().map(|y| y.view()),
            Role::Meta(i) if i < self.metas.ncols() => Some(self.metas.column(i)),
            _ => None,
        }
    }

    /// Continuous attributes and a continuous class variable, in domain order.
    pub fn continuous_variables(&self) -> Vec<(Role, &Variable)> {
        self.domain
            .variables()
            .filter(|(_, v)| v.is_continuous())
            .collect()
    }
}
