//! Date column profiling: temporal central tendency and IQR outliers.

use crate::error::{AuditError, Result};
use crate::types::{DateProfile, OutlierRow};
use crate::utils::column_series;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::debug;

use super::statistics::{TukeyFence, mode_smallest, quantile_linear};

const MILLIS_PER_DAY: i64 = 86_400_000;

// Accepted layouts for string columns, tried in order.
const DATETIME_FORMATS: [&str; 9] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];
// Month-first wins; day-first only when the month-first reading is invalid.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y",
];

/// Profile a date column with the default 1.5 fence multiplier.
pub fn prepare_date_column(
    df: &DataFrame,
    column: &str,
) -> Result<(DateProfile, Vec<OutlierRow<NaiveDateTime>>)> {
    prepare_date_column_with(df, column, 1.5)
}

/// Profile a date column with a custom fence multiplier.
///
/// String columns are coerced first; if any value fails to parse the whole
/// column is rejected with [`AuditError::DateParseFailed`].
pub fn prepare_date_column_with(
    df: &DataFrame,
    column: &str,
    fence_multiplier: f64,
) -> Result<(DateProfile, Vec<OutlierRow<NaiveDateTime>>)> {
    let series = column_series(df, column)?;
    let millis = coerce_date_series(series)?;

    let present: Vec<i64> = millis.iter().flatten().copied().collect();
    let missing_values = millis.len() - present.len();

    let mut sorted = present.clone();
    sorted.sort_unstable();
    let sorted_f64: Vec<f64> = sorted.iter().map(|&ms| ms as f64).collect();

    let mean_ms = if present.is_empty() {
        None
    } else {
        let sum: i128 = present.iter().map(|&ms| ms as i128).sum();
        Some((sum as f64 / present.len() as f64).round() as i64)
    };
    let median_ms = if present.is_empty() {
        None
    } else {
        Some(quantile_linear(&sorted_f64, 0.5).round() as i64)
    };

    let fence = TukeyFence::from_values(&sorted_f64, fence_multiplier);
    let outliers: Vec<OutlierRow<NaiveDateTime>> = millis
        .iter()
        .enumerate()
        .filter_map(|(row, ms)| ms.map(|ms| (row, ms)))
        .filter(|(_, ms)| fence.is_outlier(*ms as f64))
        .filter_map(|(row, ms)| millis_to_datetime(ms).map(|value| OutlierRow { row, value }))
        .collect();

    debug!(
        "Date column '{}': {} missing, {} outliers",
        column,
        missing_values,
        outliers.len()
    );

    let profile = DateProfile {
        missing_values,
        min_date: sorted.first().copied().and_then(millis_to_datetime),
        max_date: sorted.last().copied().and_then(millis_to_datetime),
        mean_date: mean_ms.and_then(millis_to_datetime),
        median_date: median_ms.and_then(millis_to_datetime),
        mode_date: mode_smallest(&present).and_then(millis_to_datetime),
        outliers_count: outliers.len(),
    };

    Ok((profile, outliers))
}

/// Coerce a column to epoch milliseconds, keeping missing entries as `None`.
///
/// Accepts `Date`, `Datetime` (any unit, timezone ignored) and string
/// columns. Blank strings count as missing.
pub fn coerce_date_series(series: &Series) -> Result<Vec<Option<i64>>> {
    match series.dtype() {
        DataType::Date => physical_i64(series, |days| days * MILLIS_PER_DAY),
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            physical_i64(series, move |v| match unit {
                TimeUnit::Nanoseconds => v.div_euclid(1_000_000),
                TimeUnit::Microseconds => v.div_euclid(1_000),
                TimeUnit::Milliseconds => v,
            })
        }
        DataType::String => {
            let ca = series.str()?;
            let mut out = Vec::with_capacity(ca.len());
            for value in ca.into_iter() {
                match value.map(str::trim) {
                    None | Some("") => out.push(None),
                    Some(text) => {
                        let parsed = parse_datetime_str(text).ok_or_else(|| {
                            AuditError::DateParseFailed {
                                column: series.name().to_string(),
                                reason: format!("unrecognised date value '{}'", text),
                            }
                        })?;
                        out.push(Some(parsed.and_utc().timestamp_millis()));
                    }
                }
            }
            Ok(out)
        }
        other => Err(AuditError::DateParseFailed {
            column: series.name().to_string(),
            reason: format!("type {:?} cannot hold dates", other),
        }),
    }
}

fn physical_i64(series: &Series, to_millis: impl Fn(i64) -> i64) -> Result<Vec<Option<i64>>> {
    let physical = series.to_physical_repr().cast(&DataType::Int64)?;
    Ok(physical
        .i64()?
        .into_iter()
        .map(|v| v.map(&to_millis))
        .collect())
}

/// Parse a single date or datetime string in one of the accepted layouts.
pub fn parse_datetime_str(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn millis_to_datetime(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}
