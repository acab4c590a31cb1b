//! Error types for Gait Flux

use thiserror::Error;

/// Errors that can occur during gait analysis
#[derive(Debug, Error)]
pub enum GaitError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient peaks for rhythm analysis: found {found}, need at least 2")]
    InsufficientPeaks { found: usize },

    #[error("Failed to parse recording session: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl GaitError {
    /// True for the conditions the analyzers recover from with all-zero metrics
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GaitError::InvalidInput(_) | GaitError::InsufficientPeaks { .. }
        )
    }

    /// Stable machine-readable code for CLI and host error reporting
    pub fn code(&self) -> &'static str {
        match self {
            GaitError::InvalidInput(_) => "INVALID_INPUT",
            GaitError::InsufficientPeaks { .. } => "INSUFFICIENT_PEAKS",
            GaitError::ParseError(_) => "PARSE_ERROR",
            GaitError::JsonError(_) => "JSON_ERROR",
            GaitError::EncodingError(_) => "ENCODING_ERROR",
            GaitError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}
