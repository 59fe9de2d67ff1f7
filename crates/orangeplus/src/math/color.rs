//! Colours for plot descriptors.
//!
//! ## Purpose
//!
//! Plot descriptors carry concrete colours so that every host draws clusters
//! and density heat-maps the same way. Cluster colours walk a nine-step hue
//! wheel; heat-maps use a diverging blue-to-red gradient.
//!
//! ## Key concepts
//!
//! * **Hue wheel**: index `i` maps to hue `360 * (i mod 9) / 9` at full
//!   saturation and value.
//! * **Cluster offset**: cluster `k` uses wheel index `150 + k`; noise is black.
//! * **Gradient sampling**: piecewise-linear interpolation between stops.

// External dependencies
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Number of hues on the cluster colour wheel.
const WHEEL_HUES: u32 = 9;

/// Wheel index of the first cluster.
const CLUSTER_COLOR_OFFSET: usize = 150;

/// Stops of the diverging heat-map gradient (cool to warm).
const COOLWARM: [Color; 5] = [
    Color::rgb(59, 76, 192),
    Color::rgb(141, 176, 254),
    Color::rgb(221, 221, 221),
    Color::rgb(244, 154, 123),
    Color::rgb(180, 4, 38),
];

// ============================================================================
// Color
// ============================================================================

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Opaque colour from hue (degrees), saturation and value (0-255).
    pub fn from_hsv(hue: u32, saturation: u8, value: u8) -> Self {
        let v = f64::from(value) / 255.0;
        if saturation == 0 {
            let c = to_channel(v);
            return Self::rgb(c, c, c);
        }
        let s = f64::from(saturation) / 255.0;
        let h = f64::from(hue % 360) / 60.0;
        let sector = h.floor() as u32;
        let f = h - f64::from(sector);
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::rgb(to_channel(r), to_channel(g), to_channel(b))
    }

    /// `#rrggbb` representation.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

#[inline]
fn to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Colour of position `index` on the nine-hue wheel.
pub fn wheel_color(index: usize) -> Color {
    let step = (index % WHEEL_HUES as usize) as u32;
    Color::from_hsv(step * 360 / WHEEL_HUES, 255, 255)
}

/// Colour of cluster `k` (zero-based) in reachability plots.
pub fn cluster_color(k: usize) -> Color {
    wheel_color(CLUSTER_COLOR_OFFSET + k)
}

// ============================================================================
// Gradient
// ============================================================================

/// Piecewise-linear colour gradient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradient {
    stops: Vec<Color>,
}

impl Gradient {
    /// Gradient through the given stops; an empty list yields black.
    pub fn new(stops: Vec<Color>) -> Self {
        Self { stops }
    }

    /// Diverging blue-grey-red gradient used for density heat-maps.
    pub fn coolwarm() -> Self {
        Self::new(COOLWARM.to_vec())
    }

    /// Sample the gradient at `t` in `[0, 1]` (clamped).
    pub fn sample(&self, t: f64) -> Color {
        match self.stops.len() {
            0 => return Color::black(),
            1 => return self.stops[0],
            _ => {}
        }
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = self.stops.len() - 1;
        let scaled = t * segments as f64;
        let idx = scaled.floor() as usize;
        if idx >= segments {
            return self.stops[segments];
        }
        self.stops[idx].lerp(self.stops[idx + 1], scaled - idx as f64)
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::coolwarm()
    }
}
