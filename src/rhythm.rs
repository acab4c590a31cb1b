//! Rhythm analysis
//!
//! Detects footstep peaks on the normalized vertical axis and derives stride
//! timing metrics from the intervals between them:
//! - Mean stride time and its variability
//! - Cadence
//! - Stride consistency

use crate::config::AnalysisConfig;
use crate::error::GaitError;
use crate::peaks::find_peaks;
use crate::preprocess::{Axis, SignalPreprocessor};
use crate::stats::{clamp_score, mean, mean_abs_diff, std_dev};
use crate::types::{RhythmMetrics, SensorSample};

/// Rhythm analyzer
pub struct RhythmAnalyzer;

impl RhythmAnalyzer {
    /// Compute rhythm metrics with default parameters, falling back to
    /// all-zero metrics on flat signals or fewer than 2 steps
    pub fn calculate_rhythm(samples: &[SensorSample], sampling_rate_hz: f64) -> RhythmMetrics {
        Self::try_calculate_rhythm(samples, sampling_rate_hz, &AnalysisConfig::default())
            .unwrap_or_default()
    }

    /// Compute rhythm metrics
    ///
    /// # Errors
    /// * `InvalidInput` - non-positive sampling rate, fewer than 2 samples or a flat vertical axis
    /// * `InsufficientPeaks` - fewer than 2 steps detected
    pub fn try_calculate_rhythm(
        samples: &[SensorSample],
        sampling_rate_hz: f64,
        config: &AnalysisConfig,
    ) -> Result<RhythmMetrics, GaitError> {
        if !sampling_rate_hz.is_finite() || sampling_rate_hz <= 0.0 {
            return Err(GaitError::InvalidInput(format!(
                "sampling rate must be positive, got {}",
                sampling_rate_hz
            )));
        }
        if samples.len() < 2 {
            return Err(GaitError::InvalidInput(format!(
                "rhythm needs at least 2 samples, got {}",
                samples.len()
            )));
        }

        let normalized = SignalPreprocessor::normalized_axis(samples, Axis::Z)?;
        let min_distance = (sampling_rate_hz * config.min_step_interval_sec).round() as usize;
        let peaks = find_peaks(&normalized, config.min_peak_height, min_distance);

        if peaks.len() < 2 {
            return Err(GaitError::InsufficientPeaks { found: peaks.len() });
        }

        let step_intervals: Vec<f64> = peaks
            .windows(2)
            .map(|w| (w[1] - w[0]) as f64 / sampling_rate_hz)
            .collect();

        let valid = reject_outliers(&step_intervals, config.outlier_std_factor);
        let mean_stride_time = mean(&valid);
        if valid.is_empty() || mean_stride_time <= 0.0 {
            return Err(GaitError::InsufficientPeaks { found: peaks.len() });
        }

        let stride_time_variability = std_dev(&valid) / mean_stride_time * 100.0;
        let rhythm_score = compute_rhythm_score(stride_time_variability, config.variability_scale);
        let cadence = 60.0 / mean_stride_time;
        let stride_consistency = mean_abs_diff(&valid);

        Ok(RhythmMetrics {
            rhythm_score,
            mean_stride_time,
            stride_time_variability,
            cadence,
            stride_consistency,
            step_count: peaks.len() as f64,
            valid_step_count: (valid.len() + 1) as f64,
        })
    }
}

/// Keep intervals within `mean ± factor·std` (inclusive)
fn reject_outliers(intervals: &[f64], factor: f64) -> Vec<f64> {
    let m = mean(intervals);
    let sd = std_dev(intervals);
    let lower = m - factor * sd;
    let upper = m + factor * sd;
    intervals
        .iter()
        .copied()
        .filter(|x| *x >= lower && *x <= upper)
        .collect()
}

/// Compute rhythm score using exponential decay
///
/// Formula: `100 * exp(-variability_pct / scale)`
/// A perfectly regular gait scores 100; 50% variability scores ~37.
fn compute_rhythm_score(stride_time_variability: f64, scale: f64) -> f64 {
    clamp_score(100.0 * (-stride_time_variability / scale).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::f64::consts::PI;

    /// Walking-like recording: vertical cosine at `step_hz` on top of gravity,
    /// so crests land on samples `k * rate / step_hz`
    fn walk(step_hz: f64, rate_hz: f64, seconds: f64) -> Vec<SensorSample> {
        let n = (rate_hz * seconds) as usize;
        (0..n)
            .map(|i| {
                let t = i as f64 / rate_hz;
                let z = 9.81 + 2.0 * (2.0 * PI * step_hz * t).cos();
                SensorSample::new((t * 1000.0).round() as i64, 0.0, 0.0, z)
            })
            .collect()
    }

    #[test]
    fn test_regular_two_hz_walk() {
        let metrics = RhythmAnalyzer::calculate_rhythm(&walk(2.0, 100.0, 10.0), 100.0);

        assert!((metrics.step_count - 20.0).abs() <= 1.0);
        assert!((metrics.cadence - 120.0).abs() < 1.0);
        assert!(metrics.rhythm_score > 90.0);
        assert!((metrics.mean_stride_time - 0.5).abs() < 1e-9);
        assert!(metrics.stride_time_variability < 1.0);
        assert!(metrics.stride_consistency < 1e-9);
        assert_eq!(metrics.valid_step_count, metrics.step_count);
    }

    #[test]
    fn test_flat_vertical_axis_yields_zero_metrics() {
        let samples: Vec<SensorSample> = (0..500)
            .map(|i| SensorSample::new(i * 10, 0.1, 0.2, 9.81))
            .collect();
        assert_eq!(
            RhythmAnalyzer::calculate_rhythm(&samples, 100.0),
            RhythmMetrics::default()
        );
        assert!(matches!(
            RhythmAnalyzer::try_calculate_rhythm(&samples, 100.0, &AnalysisConfig::default()),
            Err(GaitError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_single_step_yields_insufficient_peaks() {
        // One bump in an otherwise quiet vertical axis
        let samples: Vec<SensorSample> = (0..200)
            .map(|i| {
                let z = if i == 100 { 12.0 } else { 9.81 };
                SensorSample::new(i * 10, 0.0, 0.0, z)
            })
            .collect();

        let result =
            RhythmAnalyzer::try_calculate_rhythm(&samples, 100.0, &AnalysisConfig::default());
        assert!(matches!(result, Err(GaitError::InsufficientPeaks { found: 1 })));
        assert_eq!(
            RhythmAnalyzer::calculate_rhythm(&samples, 100.0),
            RhythmMetrics::default()
        );
    }

    #[test]
    fn test_too_few_samples_and_bad_rate() {
        let samples = walk(2.0, 100.0, 2.0);
        assert_eq!(
            RhythmAnalyzer::calculate_rhythm(&samples[..1], 100.0),
            RhythmMetrics::default()
        );
        assert_eq!(RhythmAnalyzer::calculate_rhythm(&samples, 0.0), RhythmMetrics::default());
        assert_eq!(
            RhythmAnalyzer::calculate_rhythm(&samples, f64::NAN),
            RhythmMetrics::default()
        );
    }

    #[test]
    fn test_outlier_interval_is_rejected() {
        let intervals = [0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 2.0];
        let valid = reject_outliers(&intervals, 2.0);
        assert_eq!(valid.len(), 9);
        assert!(valid.iter().all(|v| *v == 0.5));
    }

    #[test]
    fn test_irregular_steps_score_lower() {
        // 21 steps whose spacing alternates between 40 and 60 samples at 100 Hz
        let mut crest_positions = Vec::new();
        let mut pos = 20usize;
        let mut toggle = false;
        while pos < 1_030 {
            crest_positions.push(pos);
            pos += if toggle { 60 } else { 40 };
            toggle = !toggle;
        }
        let samples: Vec<SensorSample> = (0..1_100)
            .map(|i| {
                let nearest = crest_positions
                    .iter()
                    .map(|c| (*c as i64 - i as i64).abs())
                    .min()
                    .unwrap_or(100) as f64;
                let z = 9.81 + 3.0 * (-nearest * nearest / 40.0).exp();
                SensorSample::new(i as i64 * 10, 0.0, 0.0, z)
            })
            .collect();

        let irregular = RhythmAnalyzer::calculate_rhythm(&samples, 100.0);
        let regular = RhythmAnalyzer::calculate_rhythm(&walk(2.0, 100.0, 10.0), 100.0);

        // 20% variability -> 100 * exp(-0.4)
        assert!((irregular.stride_time_variability - 20.0).abs() < 1e-6);
        assert!((irregular.rhythm_score - 67.03).abs() < 0.01);
        assert!(irregular.rhythm_score < regular.rhythm_score);
        assert!((irregular.stride_consistency - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_rhythm_score_formula() {
        assert_eq!(compute_rhythm_score(0.0, 50.0), 100.0);
        assert!((compute_rhythm_score(50.0, 50.0) - 100.0 / std::f64::consts::E).abs() < 1e-12);
        // Left unrounded; only clamped
        assert_eq!(compute_rhythm_score(1.0, 50.0), 100.0 * (-0.02f64).exp());
        assert!(compute_rhythm_score(10_000.0, 50.0) < 1e-80);
    }

    #[test]
    fn test_deterministic() {
        let samples = walk(1.7, 100.0, 12.0);
        let first = RhythmAnalyzer::calculate_rhythm(&samples, 100.0);
        let second = RhythmAnalyzer::calculate_rhythm(&samples, 100.0);
        assert_eq!(first.rhythm_score.to_bits(), second.rhythm_score.to_bits());
        assert_eq!(first, second);
    }
}
