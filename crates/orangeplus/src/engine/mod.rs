//! Layer 4: Engine
//!
//! # Purpose
//!
//! This layer turns tables and settings into artifacts. It validates inputs,
//! converts tables into point sets, runs the algorithms, and packages the
//! results as plot descriptors and output tables.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters (widgets)
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Input and parameter validation.
pub mod validator;

/// Result and plot types.
pub mod output;

/// Pure compute functions and settings records.
pub mod executor;
