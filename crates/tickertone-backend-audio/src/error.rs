//! Error types for the synthesis backend.

use thiserror::Error;
use tickertone_spec::{BackendError, SpecError};

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur while mapping, rendering, or writing audio.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Empty, mismatched, or out-of-range input.
    #[error("invalid input '{name}': {message}")]
    InvalidInput {
        /// Name of the offending input.
        name: String,
        /// Error message.
        message: String,
    },

    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid duration.
    #[error("invalid duration: {duration} seconds")]
    InvalidDuration {
        /// The invalid duration.
        duration: f64,
    },

    /// Feature table or parameter error (missing column, bad cell, bad config).
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioError {
    /// Creates an invalid input error.
    pub fn invalid_input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns true for the missing-column precondition failure.
    pub fn is_missing_column(&self) -> bool {
        matches!(self, AudioError::Spec(SpecError::MissingColumn { .. }))
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::InvalidInput { .. } => "AUDIO_001",
            AudioError::InvalidSampleRate { .. } => "AUDIO_002",
            AudioError::InvalidDuration { .. } => "AUDIO_003",
            AudioError::Spec(inner) => inner.code(),
            AudioError::Io(_) => "AUDIO_004",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            AudioError::Spec(inner) => inner.category(),
            _ => "audio",
        }
    }
}
