//! Configuration types for the audit engine.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic audit setup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default pattern matching identifier-like column names ("id", "user_id", "ID number").
pub const DEFAULT_ID_COLUMN_PATTERN: &str = r"(?i)(^|[\s_])id($|[\s_]|[a-zA-Z]*)";

/// Default name of the column holding exclusion reasons.
pub const DEFAULT_REASON_COLUMN: &str = "delete_reason_column";

/// Configuration for an audit run.
///
/// Use [`AuditConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use data_audit::config::AuditConfig;
///
/// let config = AuditConfig::builder()
///     .fence_multiplier(3.0)
///     .categorical_threshold(20)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Multiplier applied to the IQR when building the Tukey fence.
    /// Default: 1.5
    pub fence_multiplier: f64,

    /// Regex matched against column names to pick identifier columns.
    /// Default: [`DEFAULT_ID_COLUMN_PATTERN`]
    pub id_column_pattern: String,

    /// Text columns with at most this many distinct values are categorical.
    /// Default: 10
    pub categorical_threshold: usize,

    /// Number of columns per kind shown in the printed report.
    /// Default: 5
    pub report_column_limit: usize,

    /// Name of the column recording why a row is excluded.
    /// Default: "delete_reason_column"
    pub reason_column: String,

    /// Directory for the audit working copy and summary files.
    /// Default: "audit_files"
    pub audit_dir: PathBuf,

    /// Number of non-missing values inspected when guessing whether a
    /// string column holds dates.
    /// Default: 100
    pub date_sample_size: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            fence_multiplier: 1.5,
            id_column_pattern: DEFAULT_ID_COLUMN_PATTERN.to_string(),
            categorical_threshold: 10,
            report_column_limit: 5,
            reason_column: DEFAULT_REASON_COLUMN.to_string(),
            audit_dir: PathBuf::from("audit_files"),
            date_sample_size: 100,
        }
    }
}

impl AuditConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.fence_multiplier.is_finite() || self.fence_multiplier <= 0.0 {
            return Err(ConfigValidationError::InvalidFenceMultiplier(
                self.fence_multiplier,
            ));
        }

        if let Err(e) = Regex::new(&self.id_column_pattern) {
            return Err(ConfigValidationError::InvalidPattern {
                pattern: self.id_column_pattern.clone(),
                reason: e.to_string(),
            });
        }

        if self.categorical_threshold == 0 {
            return Err(ConfigValidationError::InvalidCategoricalThreshold(
                self.categorical_threshold,
            ));
        }

        if self.reason_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyReasonColumn);
        }

        if self.date_sample_size == 0 {
            return Err(ConfigValidationError::InvalidDateSampleSize(
                self.date_sample_size,
            ));
        }

        Ok(())
    }

    /// Compiled identifier column pattern.
    ///
    /// Falls back to the default pattern if the configured one does not
    /// compile, which only happens for configs that skipped [`validate`](Self::validate).
    pub(crate) fn id_regex(&self) -> Regex {
        Regex::new(&self.id_column_pattern).unwrap_or_else(|_| {
            Regex::new(DEFAULT_ID_COLUMN_PATTERN).expect("Invalid regex: default ID pattern")
        })
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid fence multiplier: {0} (must be a positive number)")]
    InvalidFenceMultiplier(f64),

    #[error("Invalid identifier pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid categorical threshold: {0} (must be at least 1)")]
    InvalidCategoricalThreshold(usize),

    #[error("Reason column name must not be empty")]
    EmptyReasonColumn,

    #[error("Invalid date sample size: {0} (must be at least 1)")]
    InvalidDateSampleSize(usize),
}

impl From<ConfigValidationError> for crate::error::AuditError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::AuditError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AuditConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AuditConfigBuilder {
    fence_multiplier: Option<f64>,
    id_column_pattern: Option<String>,
    categorical_threshold: Option<usize>,
    report_column_limit: Option<usize>,
    reason_column: Option<String>,
    audit_dir: Option<PathBuf>,
    date_sample_size: Option<usize>,
}

impl AuditConfigBuilder {
    /// Set the IQR multiplier of the outlier fence.
    pub fn fence_multiplier(mut self, multiplier: f64) -> Self {
        self.fence_multiplier = Some(multiplier);
        self
    }

    /// Set the regex used to recognise identifier columns by name.
    pub fn id_column_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.id_column_pattern = Some(pattern.into());
        self
    }

    /// Set the distinct-value cutoff between categorical and free text.
    pub fn categorical_threshold(mut self, threshold: usize) -> Self {
        self.categorical_threshold = Some(threshold);
        self
    }

    /// Set how many columns per kind the printed report shows.
    pub fn report_column_limit(mut self, limit: usize) -> Self {
        self.report_column_limit = Some(limit);
        self
    }

    /// Set the name of the exclusion reason column.
    pub fn reason_column(mut self, name: impl Into<String>) -> Self {
        self.reason_column = Some(name.into());
        self
    }

    /// Set the directory for the working copy and summaries.
    pub fn audit_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_dir = Some(path.into());
        self
    }

    /// Set the sample size used for date detection on string columns.
    pub fn date_sample_size(mut self, size: usize) -> Self {
        self.date_sample_size = Some(size);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AuditConfig` or an error if validation fails.
    pub fn build(self) -> Result<AuditConfig, ConfigValidationError> {
        let defaults = AuditConfig::default();
        let config = AuditConfig {
            fence_multiplier: self.fence_multiplier.unwrap_or(defaults.fence_multiplier),
            id_column_pattern: self
                .id_column_pattern
                .unwrap_or(defaults.id_column_pattern),
            categorical_threshold: self
                .categorical_threshold
                .unwrap_or(defaults.categorical_threshold),
            report_column_limit: self
                .report_column_limit
                .unwrap_or(defaults.report_column_limit),
            reason_column: self.reason_column.unwrap_or(defaults.reason_column),
            audit_dir: self.audit_dir.unwrap_or(defaults.audit_dir),
            date_sample_size: self.date_sample_size.unwrap_or(defaults.date_sample_size),
        };

        config.validate()?;
        Ok(config)
    }
}
