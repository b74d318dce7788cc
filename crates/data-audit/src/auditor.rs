//! Dataset audit driver.
//!
//! Drops excluded rows, classifies the remaining columns and runs the
//! matching profiler and formatter on each one. A column that cannot be
//! profiled is recorded as skipped; the rest of the audit carries on.

use crate::classifier::classify_columns;
use crate::config::AuditConfig;
use crate::error::Result;
use crate::exclusion::ExclusionMarks;
use crate::overview::DatasetOverview;
use crate::profiler::profile_column;
use crate::reporting::{AuditReport, format_profile};
use crate::types::{ColumnKind, ColumnReport, SkippedColumn};
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs a full audit over a dataset.
#[derive(Debug, Clone)]
pub struct Auditor {
    config: AuditConfig,
    marks: ExclusionMarks,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Self {
        let marks = ExclusionMarks::new(config.reason_column.clone());
        Self { config, marks }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Exclusion marks bound to the configured reason column.
    pub fn marks(&self) -> &ExclusionMarks {
        &self.marks
    }

    /// Audit every active row of `df`.
    ///
    /// Fails only on an invalid configuration or a frame-level error; column
    /// failures end up in [`AuditReport::skipped_columns`]. Outlier rows are
    /// reported as row indices of `df`, excluded rows included.
    pub fn audit(&self, df: &DataFrame) -> Result<AuditReport> {
        let start = Instant::now();
        self.config.validate()?;

        let excluded_rows = self.marks.excluded_row_count(df)?;
        let active = self.marks.active_rows(df)?;
        let source_rows = self.marks.active_row_positions(df)?;
        info!(
            "Auditing {} rows x {} columns ({} rows excluded)",
            active.height(),
            active.width(),
            excluded_rows
        );

        let overview = DatasetOverview::compute(&active, excluded_rows);
        let classification = classify_columns(&active, &self.config);
        if classification.is_empty() {
            warn!("Dataset has no columns left to profile");
        }
        let mut report = AuditReport::new(overview, classification.clone());

        for kind in ColumnKind::ALL {
            for column in classification.columns_of(kind, &active) {
                match self.audit_column(&active, &column, kind) {
                    Ok(mut column_report) => {
                        column_report.anomalies.map_rows(&source_rows);
                        report.push(column_report);
                    }
                    Err(e) => {
                        warn!(
                            "Error during parsing {} column as {}, it will be skipped: {}",
                            column,
                            kind.display_name(),
                            e
                        );
                        report.skipped_columns.push(SkippedColumn {
                            column,
                            kind,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        info!(
            "Audit finished in {:?}: {} columns profiled, {} skipped",
            start.elapsed(),
            report.profiled_count(),
            report.skipped_columns.len()
        );
        Ok(report)
    }

    /// Profile and format a single column as `kind`.
    ///
    /// Outlier rows are positions in `df`.
    pub fn audit_column(
        &self,
        df: &DataFrame,
        column: &str,
        kind: ColumnKind,
    ) -> Result<ColumnReport> {
        debug!("Profiling '{}' as {}", column, kind.display_name());
        let (profile, anomalies) = profile_column(df, column, kind, self.config.fence_multiplier)?;
        let summary = format_profile(&profile, column);
        Ok(ColumnReport {
            column: column.to_string(),
            profile,
            anomalies,
            summary,
        })
    }
}

impl Default for Auditor {
    fn default() -> Self {
        Self::new(AuditConfig::default())
    }
}

impl From<AuditConfig> for Auditor {
    fn from(config: AuditConfig) -> Self {
        Self::new(config)
    }
}

/// Audit `df` with the default configuration.
pub fn audit(df: &DataFrame) -> Result<AuditReport> {
    Auditor::default().audit(df)
}
