use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;
use std::collections::BTreeMap;

/// Semantic kind a column is profiled as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Identifier,
    Date,
    Numeric,
    Text,
}

impl ColumnKind {
    /// Every kind, in report section order.
    pub const ALL: [ColumnKind; 4] = [
        ColumnKind::Identifier,
        ColumnKind::Date,
        ColumnKind::Numeric,
        ColumnKind::Text,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ColumnKind::Identifier => "ID",
            ColumnKind::Date => "date",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierProfile {
    pub missing_values: usize,
    /// Distinct values occurring more than once.
    pub duplicated_values_count: usize,
    /// String length -> number of values with that length.
    pub lengths: BTreeMap<usize, usize>,
    pub is_numeric: bool,
    pub is_alphanumeric: bool,
}

/// Date statistics. `None` stands for "no value" (pandas' `NaT`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateProfile {
    pub missing_values: usize,
    pub min_date: Option<NaiveDateTime>,
    pub max_date: Option<NaiveDateTime>,
    pub mean_date: Option<NaiveDateTime>,
    pub median_date: Option<NaiveDateTime>,
    pub mode_date: Option<NaiveDateTime>,
    pub outliers_count: usize,
}

/// Numeric statistics. Degenerate statistics are `NaN`, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericProfile {
    pub min_value: f64,
    pub max_value: f64,
    pub mean_value: f64,
    pub median_value: f64,
    /// Sample standard deviation (N - 1).
    pub std_dev: f64,
    pub missing_values: usize,
    pub outliers_count: usize,
}

// NaN == NaN here so that repeated profiling compares equal.
impl PartialEq for NumericProfile {
    fn eq(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            (a.is_nan() && b.is_nan()) || a == b
        }
        same(self.min_value, other.min_value)
            && same(self.max_value, other.max_value)
            && same(self.mean_value, other.mean_value)
            && same(self.median_value, other.median_value)
            && same(self.std_dev, other.std_dev)
            && self.missing_values == other.missing_values
            && self.outliers_count == other.outliers_count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostPopular {
    pub value: String,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextProfile {
    pub missing_values: usize,
    pub unique_values: usize,
    /// Absent when every value is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_popular: Option<MostPopular>,
}

/// Profile of one column, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnProfile {
    Identifier(IdentifierProfile),
    Date(DateProfile),
    Numeric(NumericProfile),
    Text(TextProfile),
}

impl ColumnProfile {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnProfile::Identifier(_) => ColumnKind::Identifier,
            ColumnProfile::Date(_) => ColumnKind::Date,
            ColumnProfile::Numeric(_) => ColumnKind::Numeric,
            ColumnProfile::Text(_) => ColumnKind::Text,
        }
    }

    pub fn missing_values(&self) -> usize {
        match self {
            ColumnProfile::Identifier(p) => p.missing_values,
            ColumnProfile::Date(p) => p.missing_values,
            ColumnProfile::Numeric(p) => p.missing_values,
            ColumnProfile::Text(p) => p.missing_values,
        }
    }
}

/// A value occurring more than once in an identifier column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatedValue {
    pub value: String,
    pub count: usize,
}

/// A value outside the Tukey fence, with the index of the row holding it.
///
/// Profilers report positions in the frame they were given; the auditor maps
/// them back to rows of the unfiltered dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierRow<T> {
    pub row: usize,
    pub value: T,
}

/// Anomalous subset returned alongside a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Anomalies {
    Duplicates(Vec<DuplicatedValue>),
    DateOutliers(Vec<OutlierRow<NaiveDateTime>>),
    NumericOutliers(Vec<OutlierRow<f64>>),
    None,
}

impl Anomalies {
    pub fn len(&self) -> usize {
        match self {
            Anomalies::Duplicates(v) => v.len(),
            Anomalies::DateOutliers(v) => v.len(),
            Anomalies::NumericOutliers(v) => v.len(),
            Anomalies::None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace outlier row positions with `source_rows[position]`.
    ///
    /// Positions past the end of `source_rows` are kept as they are.
    pub fn map_rows(&mut self, source_rows: &[usize]) {
        fn remap<T>(rows: &mut [OutlierRow<T>], source_rows: &[usize]) {
            for outlier in rows {
                if let Some(&source) = source_rows.get(outlier.row) {
                    outlier.row = source;
                }
            }
        }
        match self {
            Anomalies::DateOutliers(rows) => remap(rows, source_rows),
            Anomalies::NumericOutliers(rows) => remap(rows, source_rows),
            Anomalies::Duplicates(_) | Anomalies::None => {}
        }
    }
}

/// Everything computed for a single column during an audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub column: String,
    pub profile: ColumnProfile,
    pub anomalies: Anomalies,
    /// Human-readable summary produced by the matching formatter.
    pub summary: String,
}

/// A column the auditor could not profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedColumn {
    pub column: String,
    pub kind: ColumnKind,
    pub reason: String,
}

assert_impl_all!(ColumnProfile: Send, Sync);
assert_impl_all!(Anomalies: Send, Sync);
assert_impl_all!(ColumnReport: Send, Sync);
