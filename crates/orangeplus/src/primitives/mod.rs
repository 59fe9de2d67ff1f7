//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data structures shared by every other layer: the
//! error type, the host table model, row-major point views and signal slots.
//! It has zero internal dependencies within the crate.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters (widgets)
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Shared error types.
pub mod errors;

/// Host table model.
pub mod table;

/// Row-major point views.
pub mod points;

/// Signal slots and widget descriptors.
pub mod signals;
