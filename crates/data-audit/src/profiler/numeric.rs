//! Numeric column profiling: descriptive statistics and IQR outliers.

use crate::error::{AuditError, Result};
use crate::types::{NumericProfile, OutlierRow};
use crate::utils::{column_series, float_values, is_numeric_dtype};
use polars::prelude::*;
use tracing::debug;

use super::statistics::{TukeyFence, max, mean, median, min, sample_std};

/// Profile a numeric column with the default 1.5 fence multiplier.
pub fn prepare_numeric_column(
    df: &DataFrame,
    column: &str,
) -> Result<(NumericProfile, Vec<OutlierRow<f64>>)> {
    prepare_numeric_column_with(df, column, 1.5)
}

/// Profile a numeric column with a custom fence multiplier.
///
/// Outliers keep their row index and come back in row order.
pub fn prepare_numeric_column_with(
    df: &DataFrame,
    column: &str,
    fence_multiplier: f64,
) -> Result<(NumericProfile, Vec<OutlierRow<f64>>)> {
    let series = column_series(df, column)?;
    if !is_numeric_dtype(series.dtype()) {
        return Err(AuditError::UnsupportedColumnType {
            column: column.to_string(),
            dtype: format!("{:?}", series.dtype()),
            expected: "numeric".to_string(),
        });
    }

    let values = float_values(series)?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let missing_values = values.len() - present.len();

    let fence = TukeyFence::from_values(&present, fence_multiplier);
    let outliers: Vec<OutlierRow<f64>> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.map(|value| OutlierRow { row, value }))
        .filter(|o| fence.is_outlier(o.value))
        .collect();

    debug!(
        "Numeric column '{}': fence [{:.4}, {:.4}], {} outliers",
        column,
        fence.lower,
        fence.upper,
        outliers.len()
    );

    let profile = NumericProfile {
        min_value: min(&present),
        max_value: max(&present),
        mean_value: mean(&present),
        median_value: median(&present),
        std_dev: sample_std(&present),
        missing_values,
        outliers_count: outliers.len(),
    };

    Ok((profile, outliers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_scenario() {
        let df = df!["value" => [1i64, 2, 3, 4, 100]].unwrap();
        let (profile, outliers) = prepare_numeric_column(&df, "value").unwrap();

        assert_eq!(profile.outliers_count, 1);
        assert_eq!(outliers, vec![OutlierRow { row: 4, value: 100.0 }]);
        assert_eq!(profile.min_value, 1.0);
        assert_eq!(profile.max_value, 100.0);
        assert_eq!(profile.mean_value, 22.0);
        assert_eq!(profile.median_value, 3.0);
        assert_eq!(profile.missing_values, 0);
    }

    #[test]
    fn test_std_dev_is_sample_std() {
        let df = df!["value" => [1.0f64, 2.0, 3.0, 4.0, 5.0]].unwrap();
        let (profile, outliers) = prepare_numeric_column(&df, "value").unwrap();
        assert!((profile.std_dev - 2.5f64.sqrt()).abs() < 1e-12);
        assert!(outliers.is_empty());
    }

    #[test]
    fn test_missing_values_and_row_association() {
        let df = df![
            "value" => [Some(10.0f64), None, Some(11.0), Some(12.0), Some(f64::NAN), Some(13.0), Some(-50.0)]
        ]
        .unwrap();
        let (profile, outliers) = prepare_numeric_column(&df, "value").unwrap();

        assert_eq!(profile.missing_values, 2);
        assert_eq!(outliers, vec![OutlierRow { row: 6, value: -50.0 }]);
        assert_eq!(profile.min_value, -50.0);
    }

    #[test]
    fn test_single_value_std_is_nan() {
        let df = df!["value" => [42.0f64]].unwrap();
        let (profile, outliers) = prepare_numeric_column(&df, "value").unwrap();
        assert!(profile.std_dev.is_nan());
        assert_eq!(profile.min_value, 42.0);
        assert_eq!(profile.median_value, 42.0);
        assert!(outliers.is_empty());
    }

    #[test]
    fn test_all_missing_column_is_degenerate_not_error() {
        let df = df!["value" => [None::<f64>, None]].unwrap();
        let (profile, outliers) = prepare_numeric_column(&df, "value").unwrap();
        assert_eq!(profile.missing_values, 2);
        assert!(profile.min_value.is_nan());
        assert!(profile.mean_value.is_nan());
        assert!(profile.std_dev.is_nan());
        assert_eq!(profile.outliers_count, 0);
        assert!(outliers.is_empty());
    }

    #[test]
    fn test_custom_fence_multiplier() {
        let df = df!["value" => [1.0f64, 2.0, 3.0, 4.0, 8.0]].unwrap();
        // Q1 = 2, Q3 = 4: fence 1.5 -> [-1, 7], fence 3.0 -> [-4, 10]
        let (narrow, _) = prepare_numeric_column_with(&df, "value", 1.5).unwrap();
        let (wide, _) = prepare_numeric_column_with(&df, "value", 3.0).unwrap();
        assert_eq!(narrow.outliers_count, 1);
        assert_eq!(wide.outliers_count, 0);
    }

    #[test]
    fn test_ordering_invariants() {
        let df = df!["value" => [7.0f64, -3.5, 12.25, 0.0, 99.0, 3.0]].unwrap();
        let (p, _) = prepare_numeric_column(&df, "value").unwrap();
        assert!(p.min_value <= p.median_value && p.median_value <= p.max_value);
        assert!(p.min_value <= p.mean_value && p.mean_value <= p.max_value);
    }

    #[test]
    fn test_idempotent() {
        let df = df!["value" => [Some(1.0f64), None, Some(50.0), Some(2.0), Some(3.0)]].unwrap();
        let first = prepare_numeric_column(&df, "value").unwrap();
        let second = prepare_numeric_column(&df, "value").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_string_column() {
        let df = df!["name" => ["a", "b"]].unwrap();
        let err = prepare_numeric_column(&df, "name").unwrap_err();
        assert!(matches!(err, AuditError::UnsupportedColumnType { .. }));
    }
}
