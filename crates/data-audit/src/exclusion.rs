//! Exclusion marks.
//!
//! Rows are never deleted from the audited file. Instead a message is written
//! to a dedicated reason column; rows with a non-empty reason are left out of
//! the report.

use crate::config::DEFAULT_REASON_COLUMN;
use crate::error::{AuditError, Result, ResultExt};
use crate::profiler::coerce_date_series;
use crate::utils::{column_series, float_values, is_numeric_dtype, string_values};
use chrono::{NaiveDate, NaiveTime};
use polars::prelude::*;
use tracing::{debug, info};

/// Reads and writes exclusion marks in one reason column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionMarks {
    reason_column: String,
}

impl Default for ExclusionMarks {
    fn default() -> Self {
        Self::new(DEFAULT_REASON_COLUMN)
    }
}

impl ExclusionMarks {
    pub fn new(reason_column: impl Into<String>) -> Self {
        Self {
            reason_column: reason_column.into(),
        }
    }

    pub fn reason_column(&self) -> &str {
        &self.reason_column
    }

    /// Add an all-empty reason column when the frame has none.
    pub fn ensure_reason_column(&self, df: &mut DataFrame) -> Result<()> {
        if df.column(&self.reason_column).is_err() {
            let empty = vec![""; df.height()];
            df.with_column(Series::new(self.reason_column.as_str().into(), empty))
                .context("Failed to add reason column")?;
            debug!("Added reason column '{}'", self.reason_column);
        }
        Ok(())
    }

    /// Per-row flag: `true` when the row carries a non-empty reason.
    fn excluded_mask(&self, df: &DataFrame) -> Result<Vec<bool>> {
        match df.column(&self.reason_column) {
            Ok(col) => Ok(string_values(col.as_materialized_series())?
                .into_iter()
                .map(|reason| reason.is_some_and(|r| !r.is_empty()))
                .collect()),
            Err(_) => Ok(vec![false; df.height()]),
        }
    }

    /// Number of rows carrying a non-empty reason.
    pub fn excluded_row_count(&self, df: &DataFrame) -> Result<usize> {
        Ok(self.excluded_mask(df)?.into_iter().filter(|&e| e).count())
    }

    /// Positions in `df` of the rows without a reason, ascending.
    pub fn active_row_positions(&self, df: &DataFrame) -> Result<Vec<usize>> {
        Ok(self
            .excluded_mask(df)?
            .into_iter()
            .enumerate()
            .filter_map(|(row, excluded)| (!excluded).then_some(row))
            .collect())
    }

    /// Rows without a reason, with the reason column dropped.
    ///
    /// The result is renumbered from zero; [`Self::active_row_positions`]
    /// gives the matching rows of `df`.
    pub fn active_rows(&self, df: &DataFrame) -> Result<DataFrame> {
        if df.column(&self.reason_column).is_err() {
            return Ok(df.clone());
        }
        let keep: Vec<bool> = self.excluded_mask(df)?.into_iter().map(|e| !e).collect();
        let mask = BooleanChunked::from_slice("active".into(), &keep);
        let active = df
            .filter(&mask)
            .context("Failed to filter excluded rows")?
            .drop(&self.reason_column)?;
        Ok(active)
    }

    /// Mark rows whose value in `column` lies in `[min, max]`.
    ///
    /// Missing values are never marked. Returns the number of rows marked.
    pub fn mark_numeric_range(
        &self,
        df: &mut DataFrame,
        column: &str,
        min: f64,
        max: f64,
        reason: &str,
    ) -> Result<usize> {
        require_reason(reason)?;
        let series = column_series(df, column)?;
        if !is_numeric_dtype(series.dtype()) {
            return Err(AuditError::UnsupportedColumnType {
                column: column.to_string(),
                dtype: format!("{:?}", series.dtype()),
                expected: "numeric".to_string(),
            });
        }

        let condition: Vec<bool> = float_values(series)?
            .into_iter()
            .map(|v| v.is_some_and(|v| min <= v && v <= max))
            .collect();
        let message = format!(
            "Rows in column {} with values in range '{:?}, {:?}' have been marked for excluding with reason: {}",
            column, min, max, reason
        );
        self.apply(df, &condition, &message)
    }

    /// Mark rows whose date in `column` lies between the optional bounds.
    ///
    /// Bounds are inclusive and taken at midnight. Without any bound every
    /// row is marked; with a bound, rows with a missing date are not.
    pub fn mark_date_range(
        &self,
        df: &mut DataFrame,
        column: &str,
        after: Option<NaiveDate>,
        before: Option<NaiveDate>,
        reason: &str,
    ) -> Result<usize> {
        require_reason(reason)?;
        let millis = coerce_date_series(column_series(df, column)?)?;
        let bound = |d: NaiveDate| d.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        let lower = after.map(bound);
        let upper = before.map(bound);

        let condition: Vec<bool> = millis
            .iter()
            .map(|ms| match (lower, upper, ms) {
                (None, None, _) => true,
                (_, _, None) => false,
                (lower, upper, Some(ms)) => {
                    lower.is_none_or(|l| *ms >= l) && upper.is_none_or(|u| *ms <= u)
                }
            })
            .collect();
        let message = format!(
            "Rows in column {} with condition 'between {} and {}' have been marked for excluding with reason: {}",
            column,
            display_bound(after),
            display_bound(before),
            reason
        );
        self.apply(df, &condition, &message)
    }

    /// Mark rows whose value in `column`, in string form, is one of `values`.
    pub fn mark_values(
        &self,
        df: &mut DataFrame,
        column: &str,
        values: &[String],
        reason: &str,
    ) -> Result<usize> {
        require_reason(reason)?;
        let condition: Vec<bool> = string_values(column_series(df, column)?)?
            .into_iter()
            .map(|v| v.is_some_and(|v| values.contains(&v)))
            .collect();
        let listed = values
            .iter()
            .map(|v| format!("'{}'", v))
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!(
            "Rows with values [{}] in column {} have been marked for deletion with reason: {}",
            listed, column, reason
        );
        self.apply(df, &condition, &message)
    }

    /// Write `message` into the reason column of every row in `condition`.
    fn apply(&self, df: &mut DataFrame, condition: &[bool], message: &str) -> Result<usize> {
        self.ensure_reason_column(df)?;
        let current = string_values(column_series(df, &self.reason_column)?)?;
        let updated: Vec<Option<String>> = current
            .into_iter()
            .zip(condition)
            .map(|(existing, &marked)| {
                if marked {
                    Some(message.to_string())
                } else {
                    existing
                }
            })
            .collect();

        df.with_column(Series::new(self.reason_column.as_str().into(), updated))
            .context("Failed to update reason column")?;

        let marked = condition.iter().filter(|&&m| m).count();
        info!("{} rows were marked for exclusion: {}", marked, message);
        Ok(marked)
    }
}

fn require_reason(reason: &str) -> Result<()> {
    if reason.trim().is_empty() {
        return Err(AuditError::MissingExclusionReason);
    }
    Ok(())
}

fn display_bound(bound: Option<NaiveDate>) -> String {
    bound
        .map(|d| d.to_string())
        .unwrap_or_else(|| "None".to_string())
}
