//! Dataset-level statistics shown before the per-column sections.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Missing-value count for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Shape and missing-value overview of the active rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    /// Rows carrying an exclusion reason, not part of `rows`.
    pub excluded_rows: usize,
    pub columns_with_missing: usize,
    /// Per-column missing counts, ascending.
    pub missing_by_column: Vec<ColumnMissing>,
}

impl DatasetOverview {
    /// Compute the overview of `df`, which must already exclude marked rows.
    pub fn compute(df: &DataFrame, excluded_rows: usize) -> Self {
        let mut missing_by_column: Vec<ColumnMissing> = df
            .get_columns()
            .iter()
            .map(|col| ColumnMissing {
                column: col.name().to_string(),
                missing: missing_count(col.as_materialized_series()),
            })
            .collect();
        // stable: equal counts keep frame order
        missing_by_column.sort_by_key(|c| c.missing);

        let columns_with_missing = missing_by_column.iter().filter(|c| c.missing > 0).count();

        Self {
            rows: df.height(),
            columns: df.width(),
            excluded_rows,
            columns_with_missing,
            missing_by_column,
        }
    }

    /// Plain-text rendering used by the CLI report.
    pub fn render(&self) -> String {
        let mut output = format!(
            "Dataset contains {} rows and {} columns.",
            self.rows, self.columns
        );
        output.push_str(&format!(
            "\nIn the dataset {} rows are excluded from analysis.",
            self.excluded_rows
        ));
        output.push_str(&format!("\n{} columns have missing values.", self.columns_with_missing));
        for entry in self.missing_by_column.iter().filter(|c| c.missing > 0) {
            output.push_str(&format!("\n\t* {}: {}", entry.column, entry.missing));
        }
        output
    }
}

/// Null count, with `NaN` also counted as missing for float columns.
fn missing_count(series: &Series) -> usize {
    let nulls = series.null_count();
    let nans = match series.dtype() {
        DataType::Float32 | DataType::Float64 => series
            .is_nan()
            .map(|mask| mask.sum().unwrap_or(0) as usize)
            .unwrap_or(0),
        _ => 0,
    };
    nulls + nans
}
