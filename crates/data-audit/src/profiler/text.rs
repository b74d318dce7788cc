//! Text and categorical column profiling.

use crate::error::Result;
use crate::types::{MostPopular, TextProfile};
use crate::utils::{column_series, string_values};
use polars::prelude::*;
use tracing::debug;

use super::statistics::value_counts;

/// Profile a text or categorical column.
///
/// The most popular value is the most frequent one; among equally frequent
/// values the one appearing first wins. It is `None` when every value is
/// missing.
pub fn prepare_text_column(df: &DataFrame, column: &str) -> Result<TextProfile> {
    let series = column_series(df, column)?;
    let values = string_values(series)?;

    let missing_values = values.iter().filter(|v| v.is_none()).count();
    let counts = value_counts(values.into_iter().flatten());

    let most_popular = counts.first().map(|(value, occurrences)| MostPopular {
        value: value.clone(),
        occurrences: *occurrences,
    });

    debug!(
        "Text column '{}': {} missing, {} unique",
        column,
        missing_values,
        counts.len()
    );

    Ok(TextProfile {
        missing_values,
        unique_values: counts.len(),
        most_popular,
    })
}
