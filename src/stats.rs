//! Numeric helpers shared by the analyzers
//!
//! Population statistics over `f64` slices. Empty input yields 0.0 so callers
//! can guard ratios explicitly instead of propagating NaN.

/// Lower bound of every score
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every score
pub const SCORE_MAX: f64 = 100.0;

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0.0 for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    // Identical values are exactly zero spread, without mean rounding residue
    if values.iter().all(|v| *v == values[0]) {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean absolute difference between consecutive values, 0.0 below two values
pub fn mean_abs_diff(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let total: f64 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    total / (values.len() - 1) as f64
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamp into the 0-100 score range
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(SCORE_MIN, SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_is_population() {
        // Population variance of [2,4,4,4,5,5,7,9] is exactly 4
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
        assert_eq!(std_dev(&[3.0, 3.0, 3.0]), 0.0);
        assert_eq!(std_dev(&vec![9.81; 1000]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_mean_abs_diff() {
        assert_eq!(mean_abs_diff(&[1.0]), 0.0);
        // |3-1| + |2-3| = 3 over 2 gaps
        assert!((mean_abs_diff(&[1.0, 3.0, 2.0]) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(87.456), 87.46);
        assert_eq!(round2(87.454), 87.45);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-4.0), 0.0);
        assert_eq!(clamp_score(140.0), 100.0);
        assert_eq!(clamp_score(55.5), 55.5);
    }
}
