//! Composite gait scoring
//!
//! Combines stability and rhythm metrics into the packaged `GaitScore`.

use chrono::{DateTime, Utc};

use crate::types::{GaitScore, RecordingMode, RhythmMetrics, StabilityMetrics};

/// Caller-supplied identity of the scored recording
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMeta {
    pub session_id: String,
    pub recording_mode: RecordingMode,
    pub analysis_timestamp: DateTime<Utc>,
}

/// Gait scorer
pub struct GaitScorer;

impl GaitScorer {
    /// Package metrics into a `GaitScore`
    ///
    /// Component scores are truncated to integers and the overall score is
    /// their integer-division average, so 78 and 85 give 81.
    pub fn score(
        stability: &StabilityMetrics,
        rhythm: &RhythmMetrics,
        meta: ScoreMeta,
    ) -> GaitScore {
        let stability_score = to_int_score(stability.stability_score);
        let rhythm_score = to_int_score(rhythm.rhythm_score);

        GaitScore {
            stability_score,
            rhythm_score,
            overall_score: overall_score(stability_score, rhythm_score),
            analysis_timestamp: meta.analysis_timestamp,
            stability_details: stability.to_details(),
            rhythm_details: rhythm.to_details(),
            recording_mode: meta.recording_mode,
            session_id: meta.session_id,
        }
    }
}

/// Floor of the mean of two integer scores
pub fn overall_score(stability_score: u8, rhythm_score: u8) -> u8 {
    ((stability_score as u16 + rhythm_score as u16) / 2) as u8
}

/// Truncate toward zero into 0-100; NaN maps to 0
fn to_int_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.clamp(0.0, 100.0) as u8
}
