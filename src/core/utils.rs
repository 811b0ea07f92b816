//! Utility functions for the simulation.
//!
//! This module contains helper functions for:
//! - Angle normalisation.
//! - Summary statistics over QBER histories (mean, spread, trend).

use statrs::statistics::Statistics;

/// Maps any angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Statistics::mean(values)
}

/// Population standard deviation (divides by `n`), 0.0 for fewer than two values.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    Statistics::population_std_dev(values)
}

/// Direction of a series in `[-1, 1]`.
///
/// Least-squares slope of the `(index, value)` pairs, multiplied by the series
/// length and clamped.
pub fn trend(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let denominator = Statistics::population_variance(xs.as_slice());
    if denominator == 0.0 {
        return 0.0;
    }

    let slope = Statistics::population_covariance(xs.as_slice(), values) / denominator;
    (slope * n as f64).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_both_directions() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!(normalize_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn std_dev_is_population_form() {
        // population variance of [0, 2] is 1
        assert!((population_std_dev(&[0.0, 2.0]) - 1.0).abs() < 1e-12);
        assert_eq!(population_std_dev(&[0.3]), 0.0);
    }

    #[test]
    fn trend_of_flat_series_is_zero() {
        assert!(trend(&[0.1, 0.1, 0.1, 0.1]).abs() < 1e-12);
    }

    #[test]
    fn trend_is_scaled_and_clamped() {
        // slope 0.01 over 4 points -> 0.04
        let rising = [0.00, 0.01, 0.02, 0.03];
        assert!((trend(&rising) - 0.04).abs() < 1e-9);

        let steep = [0.0, 0.5, 1.0];
        assert_eq!(trend(&steep), 1.0);

        let falling = [1.0, 0.5, 0.0];
        assert_eq!(trend(&falling), -1.0);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[0.1, 0.3]) - 0.2).abs() < 1e-12);
    }
}
