#![cfg(feature = "dev")]
//! Tests for plot colours.
//!
//! ## Test Organization
//!
//! 1. **HSV Conversion** - Primary hues and grey
//! 2. **Cluster Wheel** - Nine-hue wheel and the cluster offset
//! 3. **Gradients** - End points, clamping, interpolation

use orangeplus::internals::math::color::{cluster_color, wheel_color, Color, Gradient};

// ============================================================================
// HSV Conversion Tests
// ============================================================================

/// Test the primary and secondary hues at full saturation and value.
#[test]
fn test_hsv_primaries() {
    assert_eq!(Color::from_hsv(0, 255, 255), Color::rgb(255, 0, 0));
    assert_eq!(Color::from_hsv(120, 255, 255), Color::rgb(0, 255, 0));
    assert_eq!(Color::from_hsv(240, 255, 255), Color::rgb(0, 0, 255));
    assert_eq!(Color::from_hsv(60, 255, 255), Color::rgb(255, 255, 0));
    assert_eq!(Color::from_hsv(360, 255, 255), Color::rgb(255, 0, 0));
}

/// Test that zero saturation gives grey.
#[test]
fn test_hsv_grey() {
    assert_eq!(Color::from_hsv(200, 0, 128), Color::rgb(128, 128, 128));
}

/// Test hex formatting.
#[test]
fn test_hex() {
    assert_eq!(Color::rgb(255, 16, 0).to_hex(), "#ff1000");
    assert_eq!(Color::black().to_hex(), "#000000");
}

// ============================================================================
// Cluster Wheel Tests
// ============================================================================

/// Test the nine-step hue wheel.
///
/// Index `i` maps to hue `40 * (i mod 9)` degrees.
#[test]
fn test_wheel_color() {
    assert_eq!(wheel_color(0), Color::rgb(255, 0, 0));
    assert_eq!(wheel_color(3), Color::from_hsv(120, 255, 255));
    assert_eq!(wheel_color(9), wheel_color(0));
    assert_eq!(wheel_color(1), Color::from_hsv(40, 255, 255));
}

/// Test that clusters start at wheel index 150.
#[test]
fn test_cluster_color_offset() {
    // 150 mod 9 = 6, hue 240 (blue).
    assert_eq!(cluster_color(0), Color::rgb(0, 0, 255));
    assert_eq!(cluster_color(1), wheel_color(151));
    assert_eq!(cluster_color(3), cluster_color(12));
    assert_ne!(cluster_color(0), cluster_color(1));
}

// ============================================================================
// Gradient Tests
// ============================================================================

/// Test gradient end points and clamping.
#[test]
fn test_gradient_end_points() {
    let g = Gradient::coolwarm();
    assert_eq!(g.sample(0.0), Color::rgb(59, 76, 192));
    assert_eq!(g.sample(1.0), Color::rgb(180, 4, 38));
    assert_eq!(g.sample(-3.0), g.sample(0.0));
    assert_eq!(g.sample(7.0), g.sample(1.0));
    assert_eq!(g.sample(f64::NAN), g.sample(0.0));
}

/// Test linear interpolation between two stops.
#[test]
fn test_gradient_interpolation() {
    let g = Gradient::new(vec![Color::rgb(0, 0, 0), Color::rgb(200, 100, 50)]);
    assert_eq!(g.sample(0.5), Color::rgb(100, 50, 25));
    assert_eq!(Gradient::new(vec![]).sample(0.3), Color::black());
}
