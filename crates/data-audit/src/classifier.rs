//! Column classification by semantic kind.
//!
//! Decides which profiler each column goes to. Identifier detection is
//! name-based; dates, numerics and text are dtype-based, with string columns
//! promoted to date candidates when their sampled values look like dates.

use crate::config::AuditConfig;
use crate::types::ColumnKind;
use crate::utils::{DtypeCategory, collect_sample_values, series_dtype_category};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Value shapes accepted as date candidates.
///
/// Every shape here has a matching layout in
/// [`parse_datetime_str`](crate::profiler::parse_datetime_str).
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}(-\d{1,2}-\d{1,2}|/\d{1,2}/\d{1,2})$")
            .expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}(-\d{1,2}-|/\d{1,2}/)\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}$").expect("Invalid regex: DD.MM.YYYY"),
        Regex::new(r"^\d{4}(-\d{2}-\d{2}|/\d{2}/\d{2}) \d{2}:\d{2}(:\d{2}(\.\d+)?)?$")
            .expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})?$")
            .expect("Invalid regex: ISO"),
    ]
});

/// Column names grouped by the profiler that will handle them.
///
/// The groups are disjoint and each keeps the frame's column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub identifier: Vec<String>,
    pub date: Vec<String>,
    pub numeric: Vec<String>,
    /// Text columns with at most `categorical_threshold` distinct values.
    pub categorical: Vec<String>,
    /// Remaining text columns.
    pub free_text: Vec<String>,
}

impl ColumnClassification {
    /// Every text column (categorical and free text) in frame order.
    pub fn text(&self, df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .filter(|name| self.categorical.contains(name) || self.free_text.contains(name))
            .collect()
    }

    /// Columns of `kind` in frame order.
    pub fn columns_of(&self, kind: ColumnKind, df: &DataFrame) -> Vec<String> {
        match kind {
            ColumnKind::Identifier => self.identifier.clone(),
            ColumnKind::Date => self.date.clone(),
            ColumnKind::Numeric => self.numeric.clone(),
            ColumnKind::Text => self.text(df),
        }
    }

    /// Kind assigned to `column`, if it was classified.
    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        let has = |names: &[String]| names.iter().any(|n| n == column);
        if has(&self.identifier) {
            Some(ColumnKind::Identifier)
        } else if has(&self.date) {
            Some(ColumnKind::Date)
        } else if has(&self.numeric) {
            Some(ColumnKind::Numeric)
        } else if has(&self.categorical) || has(&self.free_text) {
            Some(ColumnKind::Text)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.identifier.len()
            + self.date.len()
            + self.numeric.len()
            + self.categorical.len()
            + self.free_text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether `name` looks like an identifier column name.
pub fn is_identifier_name(name: &str, pattern: &Regex) -> bool {
    pattern.is_match(name)
}

/// Whether every sampled value of a string column has a date shape.
///
/// Columns without non-missing values are never date candidates.
pub fn looks_like_dates(series: &Series, sample_size: usize) -> bool {
    if series_dtype_category(series) != DtypeCategory::String {
        return false;
    }
    let samples = collect_sample_values(series, sample_size);
    let mut checked = 0;
    for value in samples.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !DATE_PATTERNS.iter().any(|p| p.is_match(value)) {
            return false;
        }
        checked += 1;
    }
    checked > 0
}

/// Assign every column of `df` to exactly one kind.
///
/// Precedence: identifier name, then date, then numeric dtype, then text.
pub fn classify_columns(df: &DataFrame, config: &AuditConfig) -> ColumnClassification {
    let id_pattern = config.id_regex();
    let mut classification = ColumnClassification::default();

    for column in df.get_columns() {
        let name = column.name().to_string();
        let series = column.as_materialized_series();

        if is_identifier_name(&name, &id_pattern) {
            classification.identifier.push(name);
            continue;
        }

        match series_dtype_category(series) {
            DtypeCategory::Datetime => classification.date.push(name),
            DtypeCategory::Numeric => classification.numeric.push(name),
            DtypeCategory::String if looks_like_dates(series, config.date_sample_size) => {
                classification.date.push(name)
            }
            _ => {
                let distinct = series.n_unique().unwrap_or(usize::MAX);
                let non_null_distinct = if series.null_count() > 0 {
                    distinct.saturating_sub(1)
                } else {
                    distinct
                };
                if non_null_distinct <= config.categorical_threshold {
                    classification.categorical.push(name);
                } else {
                    classification.free_text.push(name);
                }
            }
        }
    }

    debug!(
        "Classified {} columns: {} identifier, {} date, {} numeric, {} categorical, {} free text",
        classification.len(),
        classification.identifier.len(),
        classification.date.len(),
        classification.numeric.len(),
        classification.categorical.len(),
        classification.free_text.len()
    );

    classification
}
