#![cfg(feature = "dev")]
//! Tests for the Gaussian kernel and bandwidth rules.
//!
//! These tests verify the kernel building blocks used by density estimation:
//! - Bandwidth factors of Scott's and Silverman's rules
//! - Kernel values and the normalising constant
//! - Name parsing and serialization of bandwidth rules
//!
//! ## Test Organization
//!
//! 1. **Bandwidth Rules** - Factor values for known sizes
//! 2. **Kernel Functions** - Kernel shape and normalisation
//! 3. **Names** - Display, parsing, serde

use approx::assert_relative_eq;
use std::f64::consts::PI;

use orangeplus::internals::math::kernel::{gaussian, normalization, BandwidthMethod};

// ============================================================================
// Bandwidth Rule Tests
// ============================================================================

/// Test Scott's rule against its closed form.
///
/// Verifies `n^(-1/(d+4))` for a few sizes and dimensions.
#[test]
fn test_scott_factor() {
    for (n, d) in [(10usize, 1usize), (100, 2), (57, 3)] {
        let expected = (n as f64).powf(-1.0 / (d as f64 + 4.0));
        let got: f64 = BandwidthMethod::Scott.factor(n, d);
        assert_relative_eq!(got, expected, epsilon = 1e-12);
    }
}

/// Test Silverman's rule against its closed form.
#[test]
fn test_silverman_factor() {
    for (n, d) in [(10usize, 1usize), (100, 2), (57, 3)] {
        let nf = n as f64;
        let df = d as f64;
        let expected = (nf * (df + 2.0) / 4.0).powf(-1.0 / (df + 4.0));
        let got: f64 = BandwidthMethod::Silverman.factor(n, d);
        assert_relative_eq!(got, expected, epsilon = 1e-12);
    }
}

/// Test that both rules coincide in two dimensions.
///
/// With `d = 2`, `n (d + 2) / 4 = n`.
#[test]
fn test_rules_agree_in_two_dimensions() {
    let scott: f64 = BandwidthMethod::Scott.factor(150, 2);
    let silverman: f64 = BandwidthMethod::Silverman.factor(150, 2);
    assert_relative_eq!(scott, silverman, epsilon = 1e-12);
}

/// Test factors shrink as the sample grows.
#[test]
fn test_factor_decreases_with_n() {
    let small: f64 = BandwidthMethod::Scott.factor(10, 2);
    let large: f64 = BandwidthMethod::Scott.factor(1000, 2);
    assert!(small > large);
    assert!(large > 0.0);
}

// ============================================================================
// Kernel Function Tests
// ============================================================================

/// Test the kernel shape.
#[test]
fn test_gaussian_kernel() {
    assert_relative_eq!(gaussian(0.0_f64), 1.0);
    assert_relative_eq!(gaussian(2.0_f64), (-1.0_f64).exp());
    assert!(gaussian(100.0_f64) < 1e-20);
}

/// Test the normalising constant of a unit covariance.
#[test]
fn test_normalization() {
    assert_relative_eq!(normalization(1.0_f64, 2, 1), 1.0 / (2.0 * PI), epsilon = 1e-12);
    assert_relative_eq!(
        normalization(4.0_f64, 1, 10),
        1.0 / (10.0 * (2.0 * PI * 4.0).sqrt()),
        epsilon = 1e-12
    );
}

// ============================================================================
// Name Tests
// ============================================================================

/// Test display names, keys and parsing.
#[test]
fn test_bandwidth_names() {
    assert_eq!(BandwidthMethod::default(), BandwidthMethod::Scott);
    assert_eq!(BandwidthMethod::Silverman.to_string(), "Silverman");
    assert_eq!("scott".parse::<BandwidthMethod>(), Ok(BandwidthMethod::Scott));
    assert_eq!(
        "Silverman".parse::<BandwidthMethod>(),
        Ok(BandwidthMethod::Silverman)
    );
    assert!("normal".parse::<BandwidthMethod>().is_err());
}

/// Test that bandwidth rules serialize by key.
#[test]
fn test_bandwidth_serde() {
    assert_eq!(
        serde_json::to_string(&BandwidthMethod::Silverman).unwrap(),
        "\"silverman\""
    );
}
