//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides the pure mathematical building blocks used by the
//! algorithms: the Gaussian kernel and bandwidth rules, distance metrics,
//! padded grid extents and plot colours.
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
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Gaussian kernel and bandwidth rules.
pub mod kernel;

/// Distance metrics.
pub mod distance;

/// Padded extents and linear grids.
pub mod extent;

/// Plot colours.
pub mod color;
