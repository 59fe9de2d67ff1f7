//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer holds the numerical cores of the three widgets: the Gaussian
//! density estimator, exact neighbour search, OPTICS ordering with xi
//! extraction, SMOTE resampling and contour tracing. Algorithms work on
//! row-major point sets and know nothing about tables or widgets.
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
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Gaussian kernel density estimation.
pub mod kde;

/// Neighbour search strategies and queries.
pub mod neighbors;

/// OPTICS ordering and xi extraction.
pub mod optics;

/// SMOTE oversampling.
pub mod smote;

/// Marching-squares contours.
pub mod contour;
