//! Column profiling module.
//!
//! One profiler per semantic column kind:
//! - Identifiers: missing values, duplicates, value length and shape
//! - Dates: temporal statistics and IQR outliers
//! - Numerics: descriptive statistics and IQR outliers
//! - Text: cardinality and most popular value
//!
//! Every profiler is a pure function of the frame and a column name.

mod date;
mod identifier;
mod numeric;
pub mod statistics;
mod text;

use crate::error::Result;
use crate::types::{Anomalies, ColumnKind, ColumnProfile};
use polars::prelude::*;

pub use date::{coerce_date_series, parse_datetime_str, prepare_date_column, prepare_date_column_with};
pub use identifier::prepare_identifier_column;
pub use numeric::{prepare_numeric_column, prepare_numeric_column_with};
pub use statistics::TukeyFence;
pub use text::prepare_text_column;

/// Profile `column` as `kind`, returning the tagged profile and its anomalies.
pub fn profile_column(
    df: &DataFrame,
    column: &str,
    kind: ColumnKind,
    fence_multiplier: f64,
) -> Result<(ColumnProfile, Anomalies)> {
    Ok(match kind {
        ColumnKind::Identifier => {
            let (profile, duplicated) = prepare_identifier_column(df, column)?;
            (
                ColumnProfile::Identifier(profile),
                Anomalies::Duplicates(duplicated),
            )
        }
        ColumnKind::Date => {
            let (profile, outliers) = prepare_date_column_with(df, column, fence_multiplier)?;
            (ColumnProfile::Date(profile), Anomalies::DateOutliers(outliers))
        }
        ColumnKind::Numeric => {
            let (profile, outliers) = prepare_numeric_column_with(df, column, fence_multiplier)?;
            (
                ColumnProfile::Numeric(profile),
                Anomalies::NumericOutliers(outliers),
            )
        }
        ColumnKind::Text => (
            ColumnProfile::Text(prepare_text_column(df, column)?),
            Anomalies::None,
        ),
    })
}
