use crate::classifier::ColumnClassification;
use crate::overview::DatasetOverview;
use crate::types::{Anomalies, ColumnKind, ColumnReport, SkippedColumn};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Full result of auditing one dataset.
///
/// Serialized as-is for `--json` and the summary file; [`render`](Self::render)
/// produces the plain-text report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub overview: DatasetOverview,
    pub classification: ColumnClassification,
    pub identifier_columns: Vec<ColumnReport>,
    pub date_columns: Vec<ColumnReport>,
    pub numeric_columns: Vec<ColumnReport>,
    pub text_columns: Vec<ColumnReport>,
    /// Columns that could not be profiled, with the reason.
    pub skipped_columns: Vec<SkippedColumn>,
}

impl AuditReport {
    pub fn new(overview: DatasetOverview, classification: ColumnClassification) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            overview,
            classification,
            identifier_columns: Vec::new(),
            date_columns: Vec::new(),
            numeric_columns: Vec::new(),
            text_columns: Vec::new(),
            skipped_columns: Vec::new(),
        }
    }

    pub fn section(&self, kind: ColumnKind) -> &[ColumnReport] {
        match kind {
            ColumnKind::Identifier => &self.identifier_columns,
            ColumnKind::Date => &self.date_columns,
            ColumnKind::Numeric => &self.numeric_columns,
            ColumnKind::Text => &self.text_columns,
        }
    }

    /// File the column report under the section matching its profile.
    pub fn push(&mut self, report: ColumnReport) {
        match report.profile.kind() {
            ColumnKind::Identifier => self.identifier_columns.push(report),
            ColumnKind::Date => self.date_columns.push(report),
            ColumnKind::Numeric => self.numeric_columns.push(report),
            ColumnKind::Text => self.text_columns.push(report),
        }
    }

    /// Look up the report of a single column.
    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        ColumnKind::ALL
            .iter()
            .flat_map(|kind| self.section(*kind))
            .find(|r| r.column == name)
    }

    pub fn profiled_count(&self) -> usize {
        ColumnKind::ALL.iter().map(|k| self.section(*k).len()).sum()
    }

    /// Plain-text report.
    ///
    /// Every column is profiled, but only the first `column_limit` columns of
    /// each section are printed. A limit of 0 prints them all.
    pub fn render(&self, column_limit: usize) -> String {
        let mut output = String::from("1. Dataset overall statistics\n");
        output.push_str(&self.overview.render());

        for (index, kind) in ColumnKind::ALL.iter().enumerate() {
            let section = self.section(*kind);
            output.push_str(&format!(
                "\n\n{}. Columns with {} values\n",
                index + 2,
                kind.display_name()
            ));
            if section.is_empty() {
                output.push_str(&format!("No {} columns available.", kind.display_name()));
                continue;
            }

            let shown = if column_limit == 0 {
                section.len()
            } else {
                column_limit.min(section.len())
            };
            for report in &section[..shown] {
                output.push_str(&report.summary);
                output.push_str(&render_anomalies(&report.anomalies));
                output.push('\n');
            }
            if shown < section.len() {
                output.push_str(&format!(
                    "\n({} more {} columns not shown)",
                    section.len() - shown,
                    kind.display_name()
                ));
            }
        }

        if !self.skipped_columns.is_empty() {
            output.push_str("\n\nSkipped columns\n");
            for skipped in &self.skipped_columns {
                output.push_str(&format!(
                    "\n* Error during parsing {} column as {}: {}",
                    skipped.column,
                    skipped.kind.display_name(),
                    skipped.reason
                ));
            }
        }

        output
    }

    /// Plain-text report limited to the named columns, in the given order.
    pub fn render_columns(&self, names: &[String]) -> String {
        let mut output = String::from("1. Dataset overall statistics\n");
        output.push_str(&self.overview.render());
        output.push_str("\n\n2. Selected columns\n");

        for name in names {
            if let Some(report) = self.column(name) {
                output.push_str(&report.summary);
                output.push_str(&render_anomalies(&report.anomalies));
                output.push('\n');
                continue;
            }
            match self.classification.kind_of(name) {
                Some(kind) => output.push_str(&format!(
                    "\nColumn **{}** could not be parsed as {} column.\n",
                    name,
                    kind.display_name()
                )),
                None => output.push_str(&format!("\nColumn **{}** is not in the dataset.\n", name)),
            }
        }
        output
    }
}

/// Tabular listing of duplicates or outliers, empty when there are none.
fn render_anomalies(anomalies: &Anomalies) -> String {
    let mut output = String::new();
    match anomalies {
        Anomalies::Duplicates(values) if !values.is_empty() => {
            output.push_str("\n\n| value | count |\n|---|---|");
            for d in values {
                output.push_str(&format!("\n| {} | {} |", d.value, d.count));
            }
        }
        Anomalies::DateOutliers(rows) if !rows.is_empty() => {
            output.push_str("\n\n| row | value |\n|---|---|");
            for o in rows {
                output.push_str(&format!("\n| {} | {} |", o.row, o.value));
            }
        }
        Anomalies::NumericOutliers(rows) if !rows.is_empty() => {
            output.push_str("\n\n| row | value |\n|---|---|");
            for o in rows {
                output.push_str(&format!("\n| {} | {} |", o.row, o.value));
            }
        }
        _ => {}
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnProfile, DuplicatedValue, OutlierRow, TextProfile};
    use polars::prelude::*;

    fn text_report(name: &str) -> ColumnReport {
        let profile = ColumnProfile::Text(TextProfile {
            missing_values: 0,
            unique_values: 1,
            most_popular: None,
        });
        ColumnReport {
            column: name.to_string(),
            summary: format!("\nResults for **{}**:", name),
            profile,
            anomalies: Anomalies::None,
        }
    }

    fn empty_report() -> AuditReport {
        let df = df!["a" => [1i64]].unwrap();
        AuditReport::new(
            DatasetOverview::compute(&df, 0),
            ColumnClassification::default(),
        )
    }

    #[test]
    fn test_push_and_lookup() {
        let mut report = empty_report();
        report.push(text_report("colour"));
        assert_eq!(report.text_columns.len(), 1);
        assert_eq!(report.profiled_count(), 1);
        assert!(report.column("colour").is_some());
        assert!(report.column("other").is_none());
    }

    #[test]
    fn test_render_respects_column_limit() {
        let mut report = empty_report();
        for name in ["a", "b", "c"] {
            report.push(text_report(name));
        }

        let limited = report.render(2);
        assert!(limited.contains("**a**"));
        assert!(limited.contains("**b**"));
        assert!(!limited.contains("**c**"));
        assert!(limited.contains("(1 more text columns not shown)"));

        let all = report.render(0);
        assert!(all.contains("**c**"));
        assert!(all.contains("No ID columns available."));
    }

    #[test]
    fn test_render_lists_skipped_columns() {
        let mut report = empty_report();
        report.skipped_columns.push(SkippedColumn {
            column: "when".to_string(),
            kind: ColumnKind::Date,
            reason: "bad value".to_string(),
        });
        assert!(
            report
                .render(5)
                .contains("* Error during parsing when column as date: bad value")
        );
    }

    #[test]
    fn test_render_selected_columns() {
        let mut report = empty_report();
        report.push(text_report("colour"));
        report.push(text_report("size"));
        report.classification.date.push("when".to_string());

        let names = ["size", "when", "nope"].map(String::from);
        let text = report.render_columns(&names);
        assert!(text.starts_with("1. Dataset overall statistics\n"));
        assert!(text.contains("**size**"));
        assert!(!text.contains("**colour**"));
        assert!(text.contains("Column **when** could not be parsed as date column."));
        assert!(text.contains("Column **nope** is not in the dataset."));
    }

    #[test]
    fn test_render_anomalies() {
        let duplicates = Anomalies::Duplicates(vec![DuplicatedValue {
            value: "A1".to_string(),
            count: 2,
        }]);
        assert!(render_anomalies(&duplicates).contains("| A1 | 2 |"));

        let outliers = Anomalies::NumericOutliers(vec![OutlierRow { row: 4, value: 100.0 }]);
        assert!(render_anomalies(&outliers).contains("| 4 | 100 |"));

        assert!(render_anomalies(&Anomalies::NumericOutliers(Vec::new())).is_empty());
    }

    #[test]
    fn test_report_serializes() {
        let mut report = empty_report();
        report.push(text_report("colour"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["text_columns"][0]["column"], "colour");
        assert_eq!(json["text_columns"][0]["profile"]["kind"], "text");
        assert_eq!(json["overview"]["rows"], 1);
    }
}
