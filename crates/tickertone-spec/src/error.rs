//! Error types for feature tables and render parameters.

use thiserror::Error;

/// Result type for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors raised while loading or validating inputs to the engine.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Input is empty, too short, or out of range.
    #[error("invalid input '{name}': {message}")]
    InvalidInput {
        /// Name of the offending input or field.
        name: String,
        /// Error message.
        message: String,
    },

    /// A required column is absent from a table header.
    #[error("missing required column '{column}'")]
    MissingColumn {
        /// The column that was expected.
        column: String,
    },

    /// A cell could not be parsed.
    #[error("parse error at line {line}, column '{column}': {message}")]
    Parse {
        /// 1-based line number in the source text.
        line: usize,
        /// Column header of the offending cell.
        column: String,
        /// Error message.
        message: String,
    },

    /// Parameter JSON could not be decoded.
    #[error("invalid parameter JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// Creates an invalid input error.
    pub fn invalid_input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}

/// Common reporting surface for errors produced by backends.
///
/// Backends implement this so the CLI can print stable codes without knowing
/// every concrete error type.
///
/// # Example
///
/// ```
/// use tickertone_spec::error::BackendError;
///
/// fn describe<E: BackendError>(err: &E) -> String {
///     format!("[{}] {}", err.code(), err.message())
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as "AUDIO_001".
    fn code(&self) -> &'static str;

    /// Human-readable message; defaults to the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category such as "audio" or "spec".
    fn category(&self) -> &'static str;
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::InvalidInput { .. } => "SPEC_001",
            SpecError::MissingColumn { .. } => "SPEC_002",
            SpecError::Parse { .. } => "SPEC_003",
            SpecError::Json(_) => "SPEC_004",
            SpecError::Io(_) => "SPEC_005",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}
