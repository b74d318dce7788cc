//! Custom error types for the audit engine.
//!
//! Errors are built with `thiserror` and serialize as `{code, message}` so a
//! caller (a CLI, a dashboard) can render or forward them without matching
//! on every variant.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for profiling and auditing.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Column dtype does not fit the requested profiler.
    #[error("Column '{column}' has type {dtype}, expected {expected}")]
    UnsupportedColumnType {
        column: String,
        dtype: String,
        expected: String,
    },

    /// Column values could not be coerced to timestamps.
    #[error("Failed to parse column '{column}' as dates: {reason}")]
    DateParseFailed { column: String, reason: String },

    /// An exclusion was requested without a reason.
    #[error("A reason is required to exclude rows from the report")]
    MissingExclusionReason,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AuditError>,
    },
}

impl AuditError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AuditError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::UnsupportedColumnType { .. } => "UNSUPPORTED_COLUMN_TYPE",
            Self::DateParseFailed { .. } => "DATE_PARSE_FAILED",
            Self::MissingExclusionReason => "MISSING_EXCLUSION_REASON",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

impl Serialize for AuditError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AuditError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AuditError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            AuditError::ColumnNotFound("id".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            AuditError::MissingExclusionReason.error_code(),
            "MISSING_EXCLUSION_REASON"
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = AuditError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_with_context_preserves_code() {
        let error = AuditError::ColumnNotFound("id".to_string()).with_context("While profiling");
        assert!(error.to_string().contains("While profiling"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }
}
