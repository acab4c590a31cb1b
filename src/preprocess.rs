//! Signal preprocessing
//!
//! This module turns raw samples into the series the analyzers consume:
//! - Acceleration magnitude per sample
//! - Per-axis series
//! - Z-score normalized axis for peak detection
//! - Sampling rate estimate from timestamps

use crate::error::GaitError;
use crate::stats::{mean, std_dev};
use crate::types::SensorSample;

/// Accelerometer axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Builds derived series from a borrowed sample slice
pub struct SignalPreprocessor;

impl SignalPreprocessor {
    /// Acceleration magnitude `sqrt(ax² + ay² + az²)` per sample
    pub fn magnitude(samples: &[SensorSample]) -> Vec<f64> {
        samples.iter().map(SensorSample::magnitude).collect()
    }

    /// Values of a single axis
    pub fn axis(samples: &[SensorSample], axis: Axis) -> Vec<f64> {
        samples
            .iter()
            .map(|s| match axis {
                Axis::X => s.acc_x,
                Axis::Y => s.acc_y,
                Axis::Z => s.acc_z,
            })
            .collect()
    }

    /// Z-score normalization of one axis: `(x - mean) / std`
    ///
    /// Fails on an empty slice or a flat (zero variance) axis; callers skip
    /// peak detection in that case.
    pub fn normalized_axis(samples: &[SensorSample], axis: Axis) -> Result<Vec<f64>, GaitError> {
        if samples.is_empty() {
            return Err(GaitError::InvalidInput("no samples to normalize".to_string()));
        }
        normalize(&Self::axis(samples, axis))
    }

    /// Estimate the sampling rate in Hz from the median positive timestamp step
    pub fn estimate_sampling_rate(samples: &[SensorSample]) -> Option<f64> {
        let mut deltas: Vec<i64> = samples
            .windows(2)
            .filter_map(|w| w[1].timestamp.checked_sub(w[0].timestamp))
            .filter(|d| *d > 0)
            .collect();
        if deltas.is_empty() {
            return None;
        }
        deltas.sort_unstable();
        let mid = deltas.len() / 2;
        let median_ms = if deltas.len() % 2 == 0 {
            (deltas[mid - 1] as f64 + deltas[mid] as f64) / 2.0
        } else {
            deltas[mid] as f64
        };
        Some(1000.0 / median_ms)
    }
}

/// Z-score normalize a series
pub fn normalize(values: &[f64]) -> Result<Vec<f64>, GaitError> {
    if values.is_empty() {
        return Err(GaitError::InvalidInput("no values to normalize".to_string()));
    }
    let m = mean(values);
    let sd = std_dev(values);
    if !sd.is_finite() || sd == 0.0 {
        return Err(GaitError::InvalidInput(
            "flat signal has zero standard deviation".to_string(),
        ));
    }
    Ok(values.iter().map(|x| (x - m) / sd).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<SensorSample> {
        vec![
            SensorSample::new(0, 3.0, 0.0, 4.0),
            SensorSample::new(10, 0.0, 1.0, 0.0),
            SensorSample::new(20, 1.0, 2.0, 2.0),
        ]
    }

    #[test]
    fn test_magnitude_series() {
        let mags = SignalPreprocessor::magnitude(&samples());
        assert_eq!(mags, vec![5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_axis_series() {
        assert_eq!(SignalPreprocessor::axis(&samples(), Axis::X), vec![3.0, 0.0, 1.0]);
        assert_eq!(SignalPreprocessor::axis(&samples(), Axis::Y), vec![0.0, 1.0, 2.0]);
        assert_eq!(SignalPreprocessor::axis(&samples(), Axis::Z), vec![4.0, 0.0, 2.0]);
    }

    #[test]
    fn test_normalized_axis_has_zero_mean_unit_std() {
        let normalized = SignalPreprocessor::normalized_axis(&samples(), Axis::Y).unwrap();
        assert!(mean(&normalized).abs() < 1e-12);
        assert!((std_dev(&normalized) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_rejects_empty_and_flat() {
        assert!(matches!(
            SignalPreprocessor::normalized_axis(&[], Axis::Z),
            Err(GaitError::InvalidInput(_))
        ));
        assert!(matches!(
            normalize(&[9.81, 9.81, 9.81]),
            Err(GaitError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_estimate_sampling_rate() {
        let samples: Vec<SensorSample> = (0..50)
            .map(|i| SensorSample::new(i * 10, 0.0, 0.0, 9.8))
            .collect();
        let rate = SignalPreprocessor::estimate_sampling_rate(&samples).unwrap();
        assert!((rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_sampling_rate_ignores_jitter_and_duplicates() {
        let stamps = [0, 20, 20, 40, 61, 80, 100];
        let samples: Vec<SensorSample> = stamps
            .iter()
            .map(|t| SensorSample::new(*t, 0.0, 0.0, 9.8))
            .collect();
        let rate = SignalPreprocessor::estimate_sampling_rate(&samples).unwrap();
        assert!((rate - 50.0).abs() < 1e-9);
        assert_eq!(SignalPreprocessor::estimate_sampling_rate(&samples[..1]), None);
    }

    #[test]
    fn test_estimate_sampling_rate_skips_overflowing_steps() {
        let samples = vec![
            SensorSample::new(i64::MIN, 0.0, 0.0, 9.8),
            SensorSample::new(i64::MAX, 0.0, 0.0, 9.8),
        ];
        assert_eq!(SignalPreprocessor::estimate_sampling_rate(&samples), None);

        let samples = vec![
            SensorSample::new(0, 0.0, 0.0, 9.8),
            SensorSample::new(i64::MAX - 1, 0.0, 0.0, 9.8),
            SensorSample::new(i64::MAX, 0.0, 0.0, 9.8),
        ];
        let rate = SignalPreprocessor::estimate_sampling_rate(&samples).unwrap();
        assert!(rate.is_finite() && rate > 0.0);
    }
}
