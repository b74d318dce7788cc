//! Identifier column profiling: missing values, duplicates and value shape.

use crate::error::Result;
use crate::types::{DuplicatedValue, IdentifierProfile};
use crate::utils::{
    MISSING_VALUE_STRING, column_series, is_alphanumeric_str, is_numeric_str, string_values,
};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

use super::statistics::value_counts;

/// Profile a column believed to hold identifiers.
///
/// Shape checks run on each value's string form, with missing entries
/// rendered as `"nan"`. Duplicates only consider non-missing values and are
/// returned most frequent first.
pub fn prepare_identifier_column(
    df: &DataFrame,
    column: &str,
) -> Result<(IdentifierProfile, Vec<DuplicatedValue>)> {
    let series = column_series(df, column)?;
    let values = string_values(series)?;

    let missing_values = values.iter().filter(|v| v.is_none()).count();

    let duplicated: Vec<DuplicatedValue> = value_counts(values.iter().flatten().cloned())
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(value, count)| DuplicatedValue { value, count })
        .collect();

    let mut lengths = BTreeMap::new();
    let mut is_numeric = true;
    let mut is_alphanumeric = true;
    for value in &values {
        let text = value.as_deref().unwrap_or(MISSING_VALUE_STRING);
        *lengths.entry(text.chars().count()).or_insert(0) += 1;
        is_numeric &= is_numeric_str(text);
        is_alphanumeric &= is_alphanumeric_str(text);
    }

    debug!(
        "Identifier column '{}': {} missing, {} duplicated values",
        column,
        missing_values,
        duplicated.len()
    );

    let profile = IdentifierProfile {
        missing_values,
        duplicated_values_count: duplicated.len(),
        lengths,
        is_numeric,
        is_alphanumeric,
    };

    Ok((profile, duplicated))
}
