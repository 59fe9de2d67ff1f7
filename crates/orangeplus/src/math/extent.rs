//! Padded axis extents and evaluation grids.
//!
//! ## Purpose
//!
//! Density surfaces are evaluated beyond the observed data so that the
//! kernel tails are visible. This module computes the padded range of an
//! axis and the evenly spaced grid points inside it.
//!
//! ## Key concepts
//!
//! * **Padding**: Each side of `[min, max]` is extended by `fraction * (max - min)`.
//! * **Inclusive grids**: Both end points of the extent are grid points.
//!
//! ## Invariants
//!
//! * `extent.min <= extent.max` for finite inputs.
//! * A grid of `n` points starts at `extent.min` and ends exactly at `extent.max`.
//!
//! ## Non-goals
//!
//! * This module does not filter non-finite values; callers validate first.

// External dependencies
use num_traits::Float;

// ============================================================================
// Axis Extent
// ============================================================================

/// Closed interval covered by one grid axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtent<T> {
    /// Lower bound.
    pub min: T,
    /// Upper bound.
    pub max: T,
}

impl<T: Float> AxisExtent<T> {
    /// Width of the interval.
    pub fn span(&self) -> T {
        self.max - self.min
    }

    /// Whether `value` lies inside the interval.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Range of `values` widened by `fraction` of its span on each side.
///
/// Returns `None` for an empty slice.
pub fn padded_extent<T: Float>(values: &[T], fraction: T) -> Option<AxisExtent<T>> {
    let (&first, rest) = values.split_first()?;
    let (lo, hi) = rest
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let delta = (hi - lo) * fraction;
    Some(AxisExtent {
        min: lo - delta,
        max: hi + delta,
    })
}

/// `n` evenly spaced points from `extent.min` to `extent.max` inclusive.
pub fn linspace<T: Float>(extent: AxisExtent<T>, n: usize) -> Vec<T> {
    match n {
        0 => Vec::new(),
        1 => vec![extent.min],
        _ => {
            let step = extent.span() / T::from(n - 1).unwrap_or_else(T::one);
            let mut points: Vec<T> = (0..n)
                .map(|i| extent.min + step * T::from(i).unwrap_or_else(T::zero))
                .collect();
            points[n - 1] = extent.max;
            points
        }
    }
}
