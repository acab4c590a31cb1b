//! Pipeline orchestration
//!
//! This module provides the public API for gait analysis. It orchestrates the
//! full pipeline from a recording session (typed or JSON) to a `GaitScore`:
//! session parsing → sampling rate resolution → stability and rhythm
//! analysis → scoring → JSON encoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, DEFAULT_SAMPLING_RATE_HZ};
use crate::error::GaitError;
use crate::preprocess::SignalPreprocessor;
use crate::rhythm::RhythmAnalyzer;
use crate::scorer::{GaitScorer, ScoreMeta};
use crate::stability::StabilityAnalyzer;
use crate::types::{GaitScore, RecordingSession, RhythmMetrics, SensorSample, StabilityMetrics};

/// Parse a recording session JSON string
pub fn parse_session(json: &str) -> Result<RecordingSession, GaitError> {
    serde_json::from_str(json)
        .map_err(|e| GaitError::ParseError(e.to_string()))
}

/// Score a bare sample slice with the default configuration.
///
/// Uses the sampling rate estimated from the timestamps, or 100 Hz.
pub fn analyze_samples(samples: &[SensorSample], meta: ScoreMeta) -> GaitScore {
    let config = AnalysisConfig::default();
    let sampling_rate_hz = SignalPreprocessor::estimate_sampling_rate(samples)
        .unwrap_or(DEFAULT_SAMPLING_RATE_HZ);
    score_samples(samples, sampling_rate_hz, &config, meta)
}

/// Convert recording session JSON to GaitScore JSON (stateless, one-shot).
///
/// # Arguments
/// * `session_json` - Recording session JSON
///
/// # Returns
/// GaitScore JSON string
///
/// # Example
/// ```ignore
/// let score_json = session_to_gait_score(session_json)?;
/// ```
pub fn session_to_gait_score(session_json: String) -> Result<String, GaitError> {
    GaitAnalyzer::new().process(&session_json)
}

/// Configured analyzer.
///
/// Holds no per-session state; the same analyzer can score any number of
/// recordings and produces identical output for identical input.
#[derive(Debug, Clone, Default)]
pub struct GaitAnalyzer {
    config: AnalysisConfig,
}

impl GaitAnalyzer {
    /// Create an analyzer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with explicit parameters
    pub fn with_config(config: AnalysisConfig) -> Result<Self, GaitError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an analyzer that always assumes the given sampling rate
    pub fn with_sampling_rate(sampling_rate_hz: f64) -> Result<Self, GaitError> {
        Self::with_config(AnalysisConfig {
            sampling_rate_hz: Some(sampling_rate_hz),
            ..AnalysisConfig::default()
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Sampling rate used for a session
    ///
    /// Precedence: configured rate, session hint, timestamp estimate, 100 Hz.
    pub fn resolve_sampling_rate(&self, session: &RecordingSession) -> f64 {
        self.config
            .sampling_rate_hz
            .or(session.sampling_rate_hz.filter(|r| r.is_finite() && *r > 0.0))
            .or_else(|| SignalPreprocessor::estimate_sampling_rate(&session.samples))
            .unwrap_or(DEFAULT_SAMPLING_RATE_HZ)
    }

    /// Analyze a session, stamping the result with the current time
    pub fn analyze(&self, session: &RecordingSession) -> GaitScore {
        self.analyze_at(session, Utc::now())
    }

    /// Analyze a session with a caller-supplied analysis timestamp
    pub fn analyze_at(&self, session: &RecordingSession, analyzed_at: DateTime<Utc>) -> GaitScore {
        let sampling_rate_hz = self.resolve_sampling_rate(session);
        log::debug!(
            "Analyzing session {} ({} samples at {:.1} Hz)",
            session.session_id,
            session.samples.len(),
            sampling_rate_hz
        );

        let meta = ScoreMeta {
            session_id: session.session_id.clone(),
            recording_mode: session.mode,
            analysis_timestamp: analyzed_at,
        };
        score_samples(&session.samples, sampling_rate_hz, &self.config, meta)
    }

    /// Process a recording session JSON and return GaitScore JSON
    pub fn process(&self, session_json: &str) -> Result<String, GaitError> {
        self.process_at(session_json, Utc::now())
    }

    /// Process a recording session JSON with a caller-supplied analysis timestamp
    ///
    /// Identical input and timestamp give byte-identical output.
    pub fn process_at(
        &self,
        session_json: &str,
        analyzed_at: DateTime<Utc>,
    ) -> Result<String, GaitError> {
        let session = parse_session(session_json)?;
        let score = self.analyze_at(&session, analyzed_at);
        serde_json::to_string(&score).map_err(|e| GaitError::EncodingError(e.to_string()))
    }
}

fn score_samples(
    samples: &[SensorSample],
    sampling_rate_hz: f64,
    config: &AnalysisConfig,
    meta: ScoreMeta,
) -> GaitScore {
    let stability = match StabilityAnalyzer::try_calculate_stability(samples) {
        Ok(metrics) => metrics,
        Err(e) => {
            log::warn!("Stability fallback for session {}: {}", meta.session_id, e);
            StabilityMetrics::default()
        }
    };

    let rhythm = match RhythmAnalyzer::try_calculate_rhythm(samples, sampling_rate_hz, config) {
        Ok(metrics) => metrics,
        Err(e) => {
            log::warn!("Rhythm fallback for session {}: {}", meta.session_id, e);
            RhythmMetrics::default()
        }
    };

    log::debug!(
        "Session {}: stability {:.2}, rhythm {:.2}, {} steps",
        meta.session_id,
        stability.stability_score,
        rhythm.rhythm_score,
        rhythm.step_count
    );

    GaitScorer::score(&stability, &rhythm, meta)
}

/// Data quality summary for a recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub sample_count: usize,
    pub duration_sec: f64,
    /// Samples whose timestamp does not advance past the previous one
    pub non_monotonic_timestamps: usize,
    /// Samples with a NaN or infinite accelerometer channel
    pub non_finite_samples: usize,
    pub estimated_sampling_rate_hz: Option<f64>,
    pub issues: Vec<String>,
}

impl SessionReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Inspect a session for problems that force zero-fallback metrics
pub fn validate_session(session: &RecordingSession) -> SessionReport {
    let samples = &session.samples;
    let non_monotonic_timestamps = samples
        .windows(2)
        .filter(|w| w[1].timestamp <= w[0].timestamp)
        .count();
    let non_finite_samples = samples.iter().filter(|s| !s.is_finite()).count();
    let estimated_sampling_rate_hz = SignalPreprocessor::estimate_sampling_rate(samples);

    let mut issues = Vec::new();
    if samples.len() < 2 {
        issues.push(format!("too few samples: {}", samples.len()));
    }
    if non_monotonic_timestamps > 0 {
        issues.push(format!(
            "{} timestamps do not increase",
            non_monotonic_timestamps
        ));
    }
    if non_finite_samples > 0 {
        issues.push(format!("{} samples contain non-finite values", non_finite_samples));
    }
    if let Some(rate) = session.sampling_rate_hz {
        if !rate.is_finite() || rate <= 0.0 {
            issues.push(format!("invalid sampling rate hint: {}", rate));
        }
    }

    SessionReport {
        session_id: session.session_id.clone(),
        sample_count: samples.len(),
        duration_sec: session.duration_sec(),
        non_monotonic_timestamps,
        non_finite_samples,
        estimated_sampling_rate_hz,
        issues,
    }
}
