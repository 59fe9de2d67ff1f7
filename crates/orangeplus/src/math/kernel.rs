//! Gaussian kernel and bandwidth selection for density estimation.
//!
//! ## Purpose
//!
//! This module provides the multivariate Gaussian kernel used by the
//! density estimator together with the two rule-of-thumb bandwidth presets.
//!
//! ## Design notes
//!
//! * **Scaled covariance**: The kernel covariance is the sample covariance
//!   multiplied by the squared bandwidth factor.
//! * **Normalisation**: Density values integrate to one over the plane.
//!
//! ## Key concepts
//!
//! * **Scott's rule**: `n^(-1 / (d + 4))`.
//! * **Silverman's rule**: `(n (d + 2) / 4)^(-1 / (d + 4))`.
//!
//! ## Invariants
//!
//! * Kernel values are non-negative and maximal at zero distance.
//! * Bandwidth factors are positive for `n >= 1`.
//!
//! ## Non-goals
//!
//! * This module does not compute covariances or evaluate grids.

// External dependencies
use core::f64::consts::PI;
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// Internal dependencies
use crate::primitives::errors::WidgetError;

// ============================================================================
// Mathematical Constants
// ============================================================================

/// 2*pi, the per-dimension factor of the Gaussian normalising constant.
const TWO_PI: f64 = 2.0 * PI;

// ============================================================================
// Bandwidth Method
// ============================================================================

/// Rule used to derive the kernel bandwidth factor from the sample size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandwidthMethod {
    /// Scott's rule of thumb.
    #[default]
    Scott,

    /// Silverman's rule of thumb.
    Silverman,
}

impl BandwidthMethod {
    /// All presets in display order.
    pub const ALL: [BandwidthMethod; 2] = [BandwidthMethod::Scott, BandwidthMethod::Silverman];

    /// Display name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            BandwidthMethod::Scott => "Scott",
            BandwidthMethod::Silverman => "Silverman",
        }
    }

    /// Implementation key.
    #[inline]
    pub const fn key(&self) -> &'static str {
        match self {
            BandwidthMethod::Scott => "scott",
            BandwidthMethod::Silverman => "silverman",
        }
    }

    /// Bandwidth factor for `n` points in `d` dimensions.
    pub fn factor<T: Float>(&self, n: usize, d: usize) -> T {
        let n = T::from(n).unwrap_or_else(T::one);
        let d = T::from(d).unwrap_or_else(T::one);
        let two = T::one() + T::one();
        let four = two + two;
        let exponent = -T::one() / (d + four);
        match self {
            BandwidthMethod::Scott => n.powf(exponent),
            BandwidthMethod::Silverman => (n * (d + two) / four).powf(exponent),
        }
    }
}

impl Display for BandwidthMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BandwidthMethod {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s) || m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| WidgetError::UnknownVariant {
                kind: "bandwidth method",
                name: s.to_string(),
            })
    }
}

// ============================================================================
// Kernel Functions
// ============================================================================

/// Unnormalised Gaussian kernel of a squared Mahalanobis distance.
#[inline]
pub fn gaussian<T: Float>(squared_distance: T) -> T {
    let half = T::from(0.5).unwrap_or_else(T::zero);
    (-half * squared_distance).exp()
}

/// Normalising constant `1 / (n * sqrt(det(2 pi Sigma)))` for `n` kernels.
///
/// `det` is the determinant of the kernel covariance in `d` dimensions.
#[inline]
pub fn normalization<T: Float>(det: T, d: usize, n: usize) -> T {
    let two_pi = T::from(TWO_PI).unwrap_or_else(T::one);
    let scale = two_pi.powi(d as i32) * det;
    T::one() / (T::from(n).unwrap_or_else(T::one) * scale.sqrt())
}
