//! Integration tests for the audit engine.
//!
//! These tests run full audits over the CSV fixtures and check profiles,
//! anomalies, exclusion marks and the files written to the audit directory.

use chrono::NaiveDate;
use data_audit::{
    Anomalies, AuditConfig, AuditError, AuditWorkspace, Auditor, ColumnKind, ColumnProfile,
    ExclusionMarks, audit, format_profile, prepare_identifier_column, prepare_numeric_column,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    let path = fixtures_path().join(filename);
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "data-audit-it-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create scratch directory");
    dir
}

fn day(s: &str) -> chrono::NaiveDateTime {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

// ============================================================================
// Full Audit Tests
// ============================================================================

#[test]
fn test_full_audit_of_orders() {
    let df = load_csv("orders.csv");
    let report = audit(&df).expect("Audit should succeed");

    assert_eq!(report.overview.rows, 10);
    assert_eq!(report.overview.columns, 4);
    assert_eq!(report.overview.excluded_rows, 0);
    assert_eq!(report.overview.columns_with_missing, 2);

    assert_eq!(report.classification.identifier, vec!["order_id"]);
    assert_eq!(report.classification.date, vec!["order_date"]);
    assert_eq!(report.classification.numeric, vec!["amount"]);
    assert_eq!(report.classification.categorical, vec!["status"]);
    assert!(report.skipped_columns.is_empty());
}

#[test]
fn test_identifier_column_of_orders() {
    let report = audit(&load_csv("orders.csv")).unwrap();
    let id = report.column("order_id").unwrap();

    let ColumnProfile::Identifier(profile) = &id.profile else {
        panic!("order_id should be profiled as an identifier");
    };
    assert_eq!(profile.missing_values, 0);
    assert_eq!(profile.duplicated_values_count, 1);
    assert_eq!(profile.lengths.get(&5), Some(&10));
    assert!(!profile.is_numeric);
    assert!(profile.is_alphanumeric);

    match &id.anomalies {
        Anomalies::Duplicates(values) => {
            assert_eq!(values.len(), 1);
            assert_eq!(values[0].value, "A1002");
            assert_eq!(values[0].count, 2);
        }
        other => panic!("unexpected anomalies: {:?}", other),
    }
}

#[test]
fn test_numeric_column_of_orders() {
    let report = audit(&load_csv("orders.csv")).unwrap();
    let amount = report.column("amount").unwrap();

    let ColumnProfile::Numeric(profile) = &amount.profile else {
        panic!("amount should be profiled as numeric");
    };
    assert_eq!(profile.missing_values, 1);
    assert_eq!(profile.min_value, 10.0);
    assert_eq!(profile.max_value, 9999.0);
    assert_eq!(profile.median_value, 12.0);
    assert_eq!(profile.outliers_count, 1);

    match &amount.anomalies {
        Anomalies::NumericOutliers(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].row, 6);
            assert_eq!(rows[0].value, 9999.0);
        }
        other => panic!("unexpected anomalies: {:?}", other),
    }
}

#[test]
fn test_date_column_of_orders() {
    let report = audit(&load_csv("orders.csv")).unwrap();
    let date = report.column("order_date").unwrap();

    let ColumnProfile::Date(profile) = &date.profile else {
        panic!("order_date should be profiled as a date");
    };
    assert_eq!(profile.missing_values, 1);
    assert_eq!(profile.min_date, Some(day("2024-01-01")));
    assert_eq!(profile.max_date, Some(day("2031-01-01")));
    assert_eq!(profile.median_date, Some(day("2024-01-06")));
    assert_eq!(profile.outliers_count, 1);

    match &date.anomalies {
        Anomalies::DateOutliers(rows) => assert_eq!(rows[0].row, 9),
        other => panic!("unexpected anomalies: {:?}", other),
    }
    assert!(date.summary.contains("* Dates are from 2024-01-01 00:00:00 to 2031-01-01 00:00:00"));
}

#[test]
fn test_text_column_of_orders() {
    let report = audit(&load_csv("orders.csv")).unwrap();
    let status = report.column("status").unwrap();

    let expected = "\nResults for **status**:\
                    \n* Number of the missing values: 0\
                    \n* Number of unique values: 3\
                    \n* Most popular value: paid\
                    \n* Number of occurrence of the most popular value: 6";
    assert_eq!(status.summary, expected);
    assert_eq!(format_profile(&status.profile, "status"), expected);
}

#[test]
fn test_profilers_agree_with_auditor() {
    let df = load_csv("orders.csv");
    let report = audit(&df).unwrap();

    let (numeric, _) = prepare_numeric_column(&df, "amount").unwrap();
    assert_eq!(
        report.column("amount").unwrap().profile,
        ColumnProfile::Numeric(numeric)
    );

    let (identifier, _) = prepare_identifier_column(&df, "order_id").unwrap();
    assert_eq!(
        report.column("order_id").unwrap().profile,
        ColumnProfile::Identifier(identifier)
    );
}

// ============================================================================
// Exclusion Tests
// ============================================================================

#[test]
fn test_marked_rows_are_excluded() {
    let df = load_csv("orders_marked.csv");
    let report = audit(&df).unwrap();

    assert_eq!(report.overview.rows, 9);
    assert_eq!(report.overview.columns, 4);
    assert_eq!(report.overview.excluded_rows, 1);

    let amount = report.column("amount").unwrap();
    assert_eq!(amount.anomalies.len(), 0);
    assert!(report.column("delete_reason_column").is_none());
}

#[test]
fn test_marking_then_auditing() {
    let auditor = Auditor::default();
    let mut df = load_csv("orders.csv");
    auditor.marks().ensure_reason_column(&mut df).unwrap();

    let marked = auditor
        .marks()
        .mark_date_range(
            &mut df,
            "order_date",
            Some(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
            None,
            "date in the future",
        )
        .unwrap();
    assert_eq!(marked, 1);

    let report = auditor.audit(&df).unwrap();
    assert_eq!(report.overview.excluded_rows, 1);
    assert_eq!(
        report.column("order_date").unwrap().anomalies,
        Anomalies::DateOutliers(Vec::new())
    );
}

#[test]
fn test_outlier_rows_keep_file_positions_after_marking() {
    let auditor = Auditor::default();
    let mut df = load_csv("orders.csv");
    auditor
        .marks()
        .mark_values(&mut df, "order_id", &["A1001".to_string()], "duplicate import")
        .unwrap();

    let report = auditor.audit(&df).unwrap();
    assert_eq!(report.overview.excluded_rows, 1);

    match &report.column("amount").unwrap().anomalies {
        Anomalies::NumericOutliers(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].row, 6);
            assert_eq!(rows[0].value, 9999.0);
        }
        other => panic!("unexpected anomalies: {:?}", other),
    }
    match &report.column("order_date").unwrap().anomalies {
        Anomalies::DateOutliers(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].row, 9);
            assert_eq!(rows[0].value, day("2031-01-01"));
        }
        other => panic!("unexpected anomalies: {:?}", other),
    }
    assert!(report.render(5).contains("| 6 | 9999 |"));
}

#[test]
fn test_marking_without_reason_is_rejected() {
    let marks = ExclusionMarks::default();
    let mut df = load_csv("orders.csv");
    let err = marks
        .mark_values(&mut df, "status", &["cancelled".to_string()], "")
        .unwrap_err();
    assert!(matches!(err, AuditError::MissingExclusionReason));
    assert_eq!(marks.excluded_row_count(&df).unwrap(), 0);
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_wide_fence_finds_fewer_outliers() {
    let df = load_csv("orders.csv");
    let config = AuditConfig::builder()
        .fence_multiplier(10_000.0)
        .build()
        .unwrap();
    let report = Auditor::new(config).audit(&df).unwrap();

    assert_eq!(report.column("amount").unwrap().anomalies.len(), 0);
}

#[test]
fn test_custom_identifier_pattern() {
    let df = load_csv("orders.csv");
    let config = AuditConfig::builder()
        .id_column_pattern("^status$")
        .build()
        .unwrap();
    let report = Auditor::new(config).audit(&df).unwrap();

    assert_eq!(report.classification.identifier, vec!["status"]);
    assert_eq!(
        report.column("order_id").unwrap().profile.kind(),
        ColumnKind::Text
    );
}

// ============================================================================
// Workspace Tests
// ============================================================================

#[test]
fn test_workspace_round_trip() {
    let dir = scratch_dir("workspace");
    let workspace = AuditWorkspace::new(dir.join("audit_files"));
    let source = fixtures_path().join("orders_semicolon.csv");

    let (copy, existed) = workspace.copy_source(&source).unwrap();
    assert!(!existed);
    assert!(copy.ends_with("orders_semicolon_audit.csv"));

    let auditor = Auditor::default();
    let mut df = workspace.load_csv(&copy, b';').unwrap();
    assert_eq!(df.shape(), (10, 4));

    auditor
        .marks()
        .mark_numeric_range(&mut df, "amount", 1000.0, 10_000.0, "test order")
        .unwrap();
    workspace.save_csv(&mut df, &copy, b';').unwrap();

    // marks survive a reload of the copy
    let reloaded = workspace.load_csv(&copy, b';').unwrap();
    assert_eq!(auditor.marks().excluded_row_count(&reloaded).unwrap(), 1);

    let (_, existed) = workspace.copy_source(&source).unwrap();
    assert!(existed);

    let report = auditor.audit(&reloaded).unwrap();
    let summary = workspace.write_summary(&report, "orders_semicolon").unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(json["overview"]["excluded_rows"], 1);
    assert_eq!(json["numeric_columns"][0]["column"], "amount");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_rendered_report_sections() {
    let report = audit(&load_csv("orders.csv")).unwrap();
    let text = report.render(5);

    assert!(text.starts_with("1. Dataset overall statistics\nDataset contains 10 rows and 4 columns."));
    assert!(text.contains("2. Columns with ID values"));
    assert!(text.contains("3. Columns with date values"));
    assert!(text.contains("4. Columns with numeric values"));
    assert!(text.contains("5. Columns with text values"));
    assert!(text.contains("| A1002 | 2 |"));
    assert!(text.contains("| 6 | 9999 |"));
}
