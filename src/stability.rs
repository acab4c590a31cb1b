//! Stability analysis
//!
//! Derives postural steadiness from the acceleration vector:
//! - Movement variability (coefficient of variation of the magnitude)
//! - Lateral and vertical sway (axis standard deviations)
//! - Smoothness (mean sample-to-sample magnitude change)
//! - Symmetry (mean absolute lateral acceleration)

use crate::error::GaitError;
use crate::preprocess::{Axis, SignalPreprocessor};
use crate::stats::{clamp_score, mean, mean_abs_diff, round2, std_dev};
use crate::types::{SensorSample, StabilityMetrics};

/// Mean magnitudes at or below this are treated as a degenerate recording
const MIN_MEAN_MAGNITUDE: f64 = 1e-9;

/// Stability analyzer
pub struct StabilityAnalyzer;

impl StabilityAnalyzer {
    /// Compute stability metrics, falling back to all-zero metrics when the
    /// recording is too short or degenerate
    pub fn calculate_stability(samples: &[SensorSample]) -> StabilityMetrics {
        Self::try_calculate_stability(samples).unwrap_or_default()
    }

    /// Compute stability metrics
    ///
    /// Returns `InvalidInput` for fewer than 2 samples, a near-zero mean
    /// magnitude or non-finite readings.
    pub fn try_calculate_stability(
        samples: &[SensorSample],
    ) -> Result<StabilityMetrics, GaitError> {
        if samples.len() < 2 {
            return Err(GaitError::InvalidInput(format!(
                "stability needs at least 2 samples, got {}",
                samples.len()
            )));
        }

        let magnitude = SignalPreprocessor::magnitude(samples);
        let lateral = SignalPreprocessor::axis(samples, Axis::Y);
        let vertical = SignalPreprocessor::axis(samples, Axis::Z);

        let mean_magnitude = mean(&magnitude);
        if !mean_magnitude.is_finite() || mean_magnitude <= MIN_MEAN_MAGNITUDE {
            return Err(GaitError::InvalidInput(
                "acceleration magnitude is zero or non-finite".to_string(),
            ));
        }

        let movement_variability = std_dev(&magnitude) / mean_magnitude;
        let lateral_stability = std_dev(&lateral);
        let vertical_stability = std_dev(&vertical);
        let smoothness = mean_abs_diff(&magnitude);
        let symmetry = lateral.iter().map(|v| v.abs()).sum::<f64>() / lateral.len() as f64;

        let stability_score = compute_stability_score(
            movement_variability,
            lateral_stability,
            smoothness,
            symmetry,
        );

        let metrics = StabilityMetrics {
            stability_score,
            movement_variability,
            lateral_stability,
            vertical_stability,
            smoothness,
            symmetry,
        };

        if !all_finite(&metrics) {
            return Err(GaitError::InvalidInput(
                "stability metrics are not finite".to_string(),
            ));
        }

        Ok(metrics)
    }
}

/// Compute stability score
///
/// Formula:
/// ```text
/// penalty = mean(min(variability/2, 1), min(lateral/2, 1), min(smoothness, 1), min(symmetry, 1))
/// score   = clamp(100 * (1 - penalty), 0, 100), rounded to 2 decimals
/// ```
fn compute_stability_score(
    movement_variability: f64,
    lateral_stability: f64,
    smoothness: f64,
    symmetry: f64,
) -> f64 {
    let penalties = [
        (movement_variability / 2.0).min(1.0),
        (lateral_stability / 2.0).min(1.0),
        smoothness.min(1.0),
        symmetry.min(1.0),
    ];
    round2(clamp_score(100.0 * (1.0 - mean(&penalties))))
}

fn all_finite(metrics: &StabilityMetrics) -> bool {
    [
        metrics.stability_score,
        metrics.movement_variability,
        metrics.lateral_stability,
        metrics.vertical_stability,
        metrics.smoothness,
        metrics.symmetry,
    ]
    .iter()
    .all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn constant(n: usize, x: f64, y: f64, z: f64) -> Vec<SensorSample> {
        (0..n)
            .map(|i| SensorSample::new(i as i64 * 10, x, y, z))
            .collect()
    }

    #[test]
    fn test_constant_vector_is_fully_stable() {
        let metrics = StabilityAnalyzer::calculate_stability(&constant(200, 0.0, 0.0, 9.81));

        assert_eq!(metrics.movement_variability, 0.0);
        assert_eq!(metrics.lateral_stability, 0.0);
        assert_eq!(metrics.smoothness, 0.0);
        assert_eq!(metrics.symmetry, 0.0);
        assert_eq!(metrics.stability_score, 100.0);
    }

    #[test]
    fn test_constant_lateral_offset_only_costs_symmetry() {
        // symmetry = 0.4 -> penalty mean 0.1 -> score 90
        let metrics = StabilityAnalyzer::calculate_stability(&constant(50, 0.0, 0.4, 9.81));
        assert_eq!(metrics.movement_variability, 0.0);
        assert!((metrics.symmetry - 0.4).abs() < 1e-12);
        assert_eq!(metrics.stability_score, 90.0);
    }

    #[test]
    fn test_short_recording_yields_zero_metrics() {
        assert_eq!(
            StabilityAnalyzer::calculate_stability(&[]),
            StabilityMetrics::default()
        );
        assert_eq!(
            StabilityAnalyzer::calculate_stability(&constant(1, 0.0, 0.0, 9.81)),
            StabilityMetrics::default()
        );
        assert!(matches!(
            StabilityAnalyzer::try_calculate_stability(&constant(1, 0.0, 0.0, 9.81)),
            Err(GaitError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zero_magnitude_yields_zero_metrics() {
        let metrics = StabilityAnalyzer::calculate_stability(&constant(20, 0.0, 0.0, 0.0));
        assert_eq!(metrics, StabilityMetrics::default());
    }

    #[test]
    fn test_non_finite_readings_yield_zero_metrics() {
        let mut samples = constant(20, 0.0, 0.0, 9.81);
        samples[5].acc_z = f64::NAN;
        assert!(StabilityAnalyzer::try_calculate_stability(&samples).is_err());
    }

    #[test]
    fn test_hand_computed_metrics() {
        // Magnitudes 10, 12, 10, 12 with lateral 0, 0, 0, 0 (vertical carries it)
        let samples = vec![
            SensorSample::new(0, 0.0, 0.0, 10.0),
            SensorSample::new(10, 0.0, 0.0, 12.0),
            SensorSample::new(20, 0.0, 0.0, 10.0),
            SensorSample::new(30, 0.0, 0.0, 12.0),
        ];
        let metrics = StabilityAnalyzer::calculate_stability(&samples);

        // std = 1, mean = 11
        assert!((metrics.movement_variability - 1.0 / 11.0).abs() < 1e-12);
        assert!((metrics.vertical_stability - 1.0).abs() < 1e-12);
        assert!((metrics.smoothness - 2.0).abs() < 1e-12);
        // penalties: 0.04545, 0, 1, 0 -> mean 0.26136 -> 73.86
        assert_eq!(metrics.stability_score, 73.86);
    }

    #[test]
    fn test_noisy_signal_scores_lower() {
        let steady = constant(100, 0.0, 0.0, 9.81);
        let shaky: Vec<SensorSample> = (0..100)
            .map(|i| {
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                SensorSample::new(i as i64 * 10, 0.5 * sign, 1.5 * sign, 9.81 + 2.0 * sign)
            })
            .collect();

        let steady_score = StabilityAnalyzer::calculate_stability(&steady).stability_score;
        let shaky_score = StabilityAnalyzer::calculate_stability(&shaky).stability_score;

        assert!(shaky_score < steady_score);
        assert!((0.0..=100.0).contains(&shaky_score));
    }

    #[test]
    fn test_deterministic() {
        let samples: Vec<SensorSample> = (0..300)
            .map(|i| {
                let t = i as f64 / 100.0;
                SensorSample::new(
                    i * 10,
                    (3.1 * t).sin(),
                    0.3 * (1.7 * t).cos(),
                    9.81 + (6.0 * t).sin(),
                )
            })
            .collect();
        let first = StabilityAnalyzer::calculate_stability(&samples);
        let second = StabilityAnalyzer::calculate_stability(&samples);
        assert_eq!(first.stability_score.to_bits(), second.stability_score.to_bits());
        assert_eq!(first, second);
    }
}
