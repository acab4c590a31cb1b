//! Analysis configuration
//!
//! Tunable parameters for the analyzers. Defaults reproduce the reference
//! scoring; a JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::GaitError;

/// Sampling rate assumed when neither the caller, the session nor the
/// timestamps provide one
pub const DEFAULT_SAMPLING_RATE_HZ: f64 = 100.0;

/// Analyzer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Forced sampling rate in Hz; `None` defers to the session
    pub sampling_rate_hz: Option<f64>,
    /// Minimum normalized height of a step peak
    pub min_peak_height: f64,
    /// Minimum time between two steps, in seconds
    pub min_step_interval_sec: f64,
    /// Step intervals further than this many standard deviations from the mean are dropped
    pub outlier_std_factor: f64,
    /// Stride variability (%) at which the rhythm score decays to 1/e
    pub variability_scale: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: None,
            min_peak_height: 0.3,
            min_step_interval_sec: 0.3,
            outlier_std_factor: 2.0,
            variability_scale: 50.0,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, GaitError> {
        let config: AnalysisConfig = serde_json::from_str(json)
            .map_err(|e| GaitError::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    ///
    /// Unreadable, malformed or invalid files fall back to the defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded analysis configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Rejected configuration in {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Check every parameter is usable
    pub fn validate(&self) -> Result<(), GaitError> {
        if let Some(rate) = self.sampling_rate_hz {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(GaitError::ConfigError(format!(
                    "sampling_rate_hz must be positive, got {}",
                    rate
                )));
            }
        }
        let positive = [
            ("min_step_interval_sec", self.min_step_interval_sec),
            ("outlier_std_factor", self.outlier_std_factor),
            ("variability_scale", self.variability_scale),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GaitError::ConfigError(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !self.min_peak_height.is_finite() {
            return Err(GaitError::ConfigError(
                "min_peak_height must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
