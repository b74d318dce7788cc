//! Human-readable renderings of column profiles.
//!
//! Output is markdown-flavoured: a bold column header followed by a bullet
//! list in a fixed order (missing values, kind-specific statistics, then
//! duplicate/outlier counts).

use crate::types::{ColumnProfile, DateProfile, IdentifierProfile, NumericProfile, TextProfile};
use chrono::NaiveDateTime;

/// Rendering of a missing timestamp.
pub const MISSING_TIMESTAMP: &str = "NaT";

fn header(column: &str) -> String {
    format!("\nResults for **{}**:", column)
}

fn timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|v| v.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| MISSING_TIMESTAMP.to_string())
}

pub fn identifier_column_summary(profile: &IdentifierProfile, column: &str) -> String {
    let mut output = header(column);
    output.push_str(&format!("\n* Number of the missing values: {}", profile.missing_values));

    output.push_str("\n* Length of the ID and number of occurences:");
    for (length, count) in &profile.lengths {
        output.push_str(&format!("\n\t* Length {}: {}", length, count));
    }

    output.push_str(&format!("\n* It has only numeric values: {}", profile.is_numeric));
    output.push_str(&format!("\n* It has only alpha-numeric values: {}", profile.is_alphanumeric));
    output.push_str(&format!("\n* Number of duplicated IDs: {}", profile.duplicated_values_count));

    output
}

pub fn date_column_summary(profile: &DateProfile, column: &str) -> String {
    let mut output = header(column);
    output.push_str(&format!(
        "\n* Dates are from {} to {}",
        timestamp(profile.min_date),
        timestamp(profile.max_date)
    ));
    output.push_str(&format!("\n* Number of the missing values: {}", profile.missing_values));
    output.push_str("\n* Statistics: ");
    output.push_str(&format!("\n\t* mean: {}", timestamp(profile.mean_date)));
    output.push_str(&format!("\n\t* median: {}", timestamp(profile.median_date)));
    output.push_str(&format!("\n\t* mode: {}", timestamp(profile.mode_date)));
    output.push_str(&format!("\n* Number of potential outliers: {}", profile.outliers_count));

    output
}

/// Float statistics are fixed to two decimals.
pub fn numeric_column_summary(profile: &NumericProfile, column: &str) -> String {
    let mut output = header(column);
    output.push_str(&format!("\n* Number of the missing values: {}", profile.missing_values));

    output.push_str("\n* Statistics: ");
    output.push_str(&format!("\n\t* min: {:.2}", profile.min_value));
    output.push_str(&format!("\n\t* max: {:.2}", profile.max_value));
    output.push_str(&format!("\n\t* mean: {:.2}", profile.mean_value));
    output.push_str(&format!("\n\t* median: {:.2}", profile.median_value));
    output.push_str(&format!("\n\t* std: {:.2}", profile.std_dev));

    output.push_str(&format!("\n* Number of potential outliers: {}", profile.outliers_count));
    output
}

pub fn text_column_summary(profile: &TextProfile, column: &str) -> String {
    let mut output = header(column);
    output.push_str(&format!("\n* Number of the missing values: {}", profile.missing_values));
    output.push_str(&format!("\n* Number of unique values: {}", profile.unique_values));
    if let Some(most_popular) = &profile.most_popular {
        output.push_str(&format!("\n* Most popular value: {}", most_popular.value));
        output.push_str(&format!(
            "\n* Number of occurrence of the most popular value: {}",
            most_popular.occurrences
        ));
    }

    output
}

/// Render any profile with the formatter matching its kind.
pub fn format_profile(profile: &ColumnProfile, column: &str) -> String {
    match profile {
        ColumnProfile::Identifier(p) => identifier_column_summary(p, column),
        ColumnProfile::Date(p) => date_column_summary(p, column),
        ColumnProfile::Numeric(p) => numeric_column_summary(p, column),
        ColumnProfile::Text(p) => text_column_summary(p, column),
    }
}
