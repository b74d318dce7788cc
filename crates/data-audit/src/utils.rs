//! Shared utilities for the audit engine.
//!
//! Column lookup, dtype classification and the value extraction helpers the
//! profilers build on.

use crate::error::{AuditError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for profiling purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType holds calendar dates or timestamps.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

/// Get the dtype category of a Series.
pub fn series_dtype_category(series: &Series) -> DtypeCategory {
    get_dtype_category(series.dtype())
}

// =============================================================================
// Column Access
// =============================================================================

/// Look up a column by name, failing with [`AuditError::ColumnNotFound`].
pub fn column_series<'a>(df: &'a DataFrame, column: &str) -> Result<&'a Series> {
    df.column(column)
        .map(|col| col.as_materialized_series())
        .map_err(|_| AuditError::ColumnNotFound(column.to_string()))
}

/// Every value rendered as its string form; missing entries stay `None`.
pub fn string_values(series: &Series) -> Result<Vec<Option<String>>> {
    let cast = series.cast(&DataType::String)?;
    let values = cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Every value as `f64`; nulls and `NaN` are both reported as missing.
pub fn float_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let cast = series.cast(&DataType::Float64)?;
    let values = cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Collect up to `max_samples` non-null values as strings.
pub fn collect_sample_values(series: &Series, max_samples: usize) -> Vec<String> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Vec::new();
    }

    let sample_size = std::cmp::min(max_samples, non_null.len());
    let mut samples = Vec::with_capacity(sample_size);

    for i in 0..sample_size {
        if let Ok(val) = non_null.get(i) {
            match val {
                AnyValue::String(s) => samples.push(s.to_string()),
                AnyValue::StringOwned(s) => samples.push(s.to_string()),
                other => samples.push(format!("{}", other)),
            }
        }
    }

    samples
}

// =============================================================================
// String Shape Utilities
// =============================================================================

/// String form given to missing identifier values before shape checks.
pub const MISSING_VALUE_STRING: &str = "nan";

/// True iff `s` is non-empty and every character is numeric.
pub fn is_numeric_str(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_numeric)
}

/// True iff `s` is non-empty and every character is alphanumeric.
pub fn is_alphanumeric_str(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphanumeric)
}

// =============================================================================
// Tests
// =============================================================================
