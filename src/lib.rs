//! Gait Flux - On-device engine for gait stability and rhythm scoring
//!
//! Flux turns a recording session's tri-axial accelerometer series into a
//! stability score, a rhythm score and a composite gait score through a pure,
//! deterministic pipeline: preprocessing → stability analysis and step peak
//! detection → rhythm analysis → scoring.
//!
//! ## Modules
//!
//! - **Analyzers**: `stability`, `rhythm` and their building blocks `preprocess`, `peaks`, `stats`
//! - **Scoring**: `scorer` packages both analyses into a `GaitScore`
//! - **Pipeline**: typed and JSON entry points with configurable parameters

pub mod config;
pub mod error;
pub mod peaks;
pub mod pipeline;
pub mod preprocess;
pub mod rhythm;
pub mod scorer;
pub mod stability;
pub mod stats;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::AnalysisConfig;
pub use error::GaitError;
pub use peaks::find_peaks;
pub use pipeline::{analyze_samples, session_to_gait_score, validate_session, GaitAnalyzer};
pub use rhythm::RhythmAnalyzer;
pub use scorer::{GaitScorer, ScoreMeta};
pub use stability::StabilityAnalyzer;
pub use types::{
    GaitScore, RecordingMode, RecordingSession, RhythmMetrics, SensorSample, StabilityMetrics,
};

/// Engine version embedded in CLI and FFI output
pub const GAIT_FLUX_VERSION: &str = env!("CARGO_PKG_VERSION");
