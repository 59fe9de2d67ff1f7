//! Iso-line extraction by marching squares.
//!
//! ## Purpose
//!
//! This module traces contour lines of a scalar field sampled on a
//! rectilinear grid and chooses round contour levels for a value range.
//!
//! ## Design notes
//!
//! * **Segments**: Lines are returned as unordered segments; hosts draw them
//!   directly without stitching.
//! * **Saddles**: Ambiguous cells are resolved with the mean of the four corners.
//!
//! ## Invariants
//!
//! * Every segment end point lies on a cell edge, linearly interpolated.
//! * Levels are strictly inside the open value range.

// External dependencies
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// A 2-D point `(x, y)`.
pub type Point = (f64, f64);

/// All segments of one iso-line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLine {
    /// Field value along the line.
    pub level: f64,
    /// Line segments.
    pub segments: Vec<[Point; 2]>,
}

/// Up to `n` evenly spaced round levels strictly inside `(min, max)`.
pub fn nice_levels(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n == 0 || !min.is_finite() || !max.is_finite() || max <= min {
        return Vec::new();
    }
    let step = nice_step((max - min) / (n + 1) as f64);
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let first = (min / step).floor() as i64 + 1;
    (first..)
        .map(|k| k as f64 * step)
        .take_while(|&level| level < max)
        .filter(|&level| level > min)
        .take(n)
        .collect()
}

/// Smallest step of the form `{1, 2, 2.5, 5} * 10^e` not below `raw`.
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw * (1.0 - 1e-12))
        .unwrap_or(10.0 * magnitude)
}

/// Trace the iso-line at `level`.
///
/// `values[[i, j]]` is the field at `(xs[i], ys[j])`.
pub fn trace(xs: &[f64], ys: &[f64], values: ArrayView2<'_, f64>, level: f64) -> ContourLine {
    let mut segments = Vec::new();
    let (nx, ny) = values.dim();
    if nx < 2 || ny < 2 || xs.len() != nx || ys.len() != ny {
        return ContourLine { level, segments };
    }

    for i in 0..nx - 1 {
        for j in 0..ny - 1 {
            // Corners counter-clockwise from bottom-left.
            let corners = [
                ((xs[i], ys[j]), values[[i, j]]),
                ((xs[i + 1], ys[j]), values[[i + 1, j]]),
                ((xs[i + 1], ys[j + 1]), values[[i + 1, j + 1]]),
                ((xs[i], ys[j + 1]), values[[i, j + 1]]),
            ];
            if corners.iter().any(|(_, v)| !v.is_finite()) {
                continue;
            }
            let case = corners
                .iter()
                .enumerate()
                .fold(0u8, |acc, (bit, (_, v))| {
                    if *v >= level {
                        acc | (1 << bit)
                    } else {
                        acc
                    }
                });

            // Edge e joins corner e and corner (e + 1) % 4.
            let edge = |e: usize| -> Point {
                let (pa, va) = corners[e];
                let (pb, vb) = corners[(e + 1) % 4];
                let t = if vb == va { 0.5 } else { (level - va) / (vb - va) };
                (pa.0 + t * (pb.0 - pa.0), pa.1 + t * (pb.1 - pa.1))
            };
            let centre_high = || corners.iter().map(|(_, v)| v).sum::<f64>() / 4.0 >= level;

            let pairs: &[(usize, usize)] = match case {
                0 | 15 => &[],
                1 | 14 => &[(3, 0)],
                2 | 13 => &[(0, 1)],
                3 | 12 => &[(3, 1)],
                4 | 11 => &[(1, 2)],
                6 | 9 => &[(0, 2)],
                7 | 8 => &[(3, 2)],
                5 => {
                    if centre_high() {
                        &[(0, 1), (2, 3)]
                    } else {
                        &[(3, 0), (1, 2)]
                    }
                }
                _ => {
                    if centre_high() {
                        &[(3, 0), (1, 2)]
                    } else {
                        &[(0, 1), (2, 3)]
                    }
                }
            };
            segments.extend(pairs.iter().map(|&(a, b)| [edge(a), edge(b)]));
        }
    }

    ContourLine { level, segments }
}
