//! Core data types for Gait Flux
//!
//! This module defines the recording types consumed by the engine and the
//! metric and score records it produces.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single inertial reading
///
/// Accelerations are in m/s². Gyroscope channels are carried through
/// serialization but not consumed by the analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Monotonic timestamp in milliseconds
    pub timestamp: i64,
    #[serde(alias = "accX")]
    pub acc_x: f64,
    #[serde(alias = "accY")]
    pub acc_y: f64,
    #[serde(alias = "accZ")]
    pub acc_z: f64,
    #[serde(default, alias = "gyroX", skip_serializing_if = "Option::is_none")]
    pub gyro_x: Option<f64>,
    #[serde(default, alias = "gyroY", skip_serializing_if = "Option::is_none")]
    pub gyro_y: Option<f64>,
    #[serde(default, alias = "gyroZ", skip_serializing_if = "Option::is_none")]
    pub gyro_z: Option<f64>,
}

impl SensorSample {
    /// Accelerometer-only sample
    pub fn new(timestamp: i64, acc_x: f64, acc_y: f64, acc_z: f64) -> Self {
        Self {
            timestamp,
            acc_x,
            acc_y,
            acc_z,
            gyro_x: None,
            gyro_y: None,
            gyro_z: None,
        }
    }

    /// Attach gyroscope readings (rad/s)
    pub fn with_gyro(mut self, gyro_x: f64, gyro_y: f64, gyro_z: f64) -> Self {
        self.gyro_x = Some(gyro_x);
        self.gyro_y = Some(gyro_y);
        self.gyro_z = Some(gyro_z);
        self
    }

    /// Euclidean norm of the acceleration vector
    pub fn magnitude(&self) -> f64 {
        (self.acc_x * self.acc_x + self.acc_y * self.acc_y + self.acc_z * self.acc_z).sqrt()
    }

    /// Whether every accelerometer channel is a finite number
    pub fn is_finite(&self) -> bool {
        self.acc_x.is_finite() && self.acc_y.is_finite() && self.acc_z.is_finite()
    }
}

/// Capture protocol the session was recorded under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingMode {
    #[default]
    Walking,
    Balance,
    Standing,
    #[serde(other)]
    Other,
}

impl RecordingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordingMode::Walking => "walking",
            RecordingMode::Balance => "balance",
            RecordingMode::Standing => "standing",
            RecordingMode::Other => "other",
        }
    }
}

fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// An ordered recording handed to the engine by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSession {
    #[serde(default = "new_session_id")]
    pub session_id: String,
    #[serde(default)]
    pub mode: RecordingMode,
    /// Owning user profile, passed through for the persistence layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    /// Capture rate reported by the recorder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_rate_hz: Option<f64>,
    pub samples: Vec<SensorSample>,
}

impl RecordingSession {
    /// Create a session with a fresh identifier
    pub fn new(mode: RecordingMode, samples: Vec<SensorSample>) -> Self {
        Self {
            session_id: new_session_id(),
            mode,
            profile_id: None,
            sampling_rate_hz: None,
            samples,
        }
    }

    /// Recording span in seconds from first to last timestamp
    pub fn duration_sec(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => {
                (last.timestamp as f64 - first.timestamp as f64) / 1000.0
            }
            _ => 0.0,
        }
    }
}

/// Postural stability metrics derived from the acceleration magnitude
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StabilityMetrics {
    /// Composite stability score (0-100, higher = steadier)
    pub stability_score: f64,
    /// Coefficient of variation of the acceleration magnitude
    pub movement_variability: f64,
    /// Standard deviation of the lateral (Y) axis
    pub lateral_stability: f64,
    /// Standard deviation of the vertical (Z) axis
    pub vertical_stability: f64,
    /// Mean absolute sample-to-sample change of the magnitude
    pub smoothness: f64,
    /// Mean absolute lateral acceleration
    pub symmetry: f64,
}

impl StabilityMetrics {
    /// Flat map for serialization into score cards
    pub fn to_details(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("stability_score".to_string(), self.stability_score),
            ("movement_variability".to_string(), self.movement_variability),
            ("lateral_stability".to_string(), self.lateral_stability),
            ("vertical_stability".to_string(), self.vertical_stability),
            ("smoothness".to_string(), self.smoothness),
            ("symmetry".to_string(), self.symmetry),
        ])
    }
}

/// Stride timing metrics derived from vertical-axis peaks
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RhythmMetrics {
    /// Composite rhythm score (0-100, higher = more regular)
    pub rhythm_score: f64,
    /// Mean interval between detected steps, in seconds
    pub mean_stride_time: f64,
    /// Coefficient of variation of step intervals, in percent
    pub stride_time_variability: f64,
    /// Steps per minute
    pub cadence: f64,
    /// Mean absolute change between consecutive valid intervals
    pub stride_consistency: f64,
    pub step_count: f64,
    pub valid_step_count: f64,
}

impl RhythmMetrics {
    /// Flat map for serialization into score cards
    pub fn to_details(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("rhythm_score".to_string(), self.rhythm_score),
            ("mean_stride_time".to_string(), self.mean_stride_time),
            ("stride_time_variability".to_string(), self.stride_time_variability),
            ("cadence".to_string(), self.cadence),
            ("stride_consistency".to_string(), self.stride_consistency),
            ("step_count".to_string(), self.step_count),
            ("valid_step_count".to_string(), self.valid_step_count),
        ])
    }
}

/// Packaged result of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitScore {
    pub stability_score: u8,
    pub rhythm_score: u8,
    pub overall_score: u8,
    pub analysis_timestamp: DateTime<Utc>,
    pub stability_details: BTreeMap<String, f64>,
    pub rhythm_details: BTreeMap<String, f64>,
    pub recording_mode: RecordingMode,
    pub session_id: String,
}

impl GaitScore {
    /// True when neither analyzer found usable signal
    pub fn is_insufficient(&self) -> bool {
        self.stability_score == 0 && self.rhythm_score == 0
    }
}
