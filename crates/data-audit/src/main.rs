use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser};
use data_audit::workspace::file_stem;
use data_audit::{AuditConfig, AuditReport, AuditWorkspace, Auditor};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data quality audit for CSV files",
    long_about = "Profiles every column of a CSV file by kind (ID, date, numeric, text) \
                  and reports missing values, duplicated IDs and outliers.\n\n\
                  The input file is never modified: the audit runs on a copy in the audit \
                  directory, and excluded rows are marked in that copy.\n\n\
                  EXAMPLES:\n  \
                  # Audit a comma-separated file\n  \
                  data-audit -i sales.csv\n\n  \
                  # Semicolon separator, JSON output\n  \
                  data-audit -i sales.csv --separator ';' --json\n\n  \
                  # Exclude test orders from the report\n  \
                  data-audit -i sales.csv --exclude-column amount --min 9000 --max 10000 \
                  --reason 'test orders'"
)]
struct Args {
    /// Path to the CSV file to audit
    #[arg(short, long)]
    input: PathBuf,

    /// Field separator: ',', ';', '|' or '\t'
    #[arg(long, default_value = ",", value_parser = parse_separator)]
    separator: u8,

    /// Directory for the audit copy and summary files
    #[arg(long, default_value = "audit_files")]
    audit_dir: PathBuf,

    /// Number of columns printed per section (0 prints all)
    #[arg(long, default_value = "5")]
    column_limit: usize,

    /// Print only these columns (comma-separated), in this order
    #[arg(long, value_delimiter = ',', conflicts_with = "column_limit")]
    columns: Vec<String>,

    /// IQR multiplier for the outlier fence
    #[arg(long, default_value = "1.5")]
    fence_multiplier: f64,

    /// Maximum distinct values for a text column to count as categorical
    #[arg(long, default_value = "10")]
    categorical_threshold: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the report)
    #[arg(short, long)]
    quiet: bool,

    /// Output the report as JSON to stdout instead of text
    ///
    /// Disables all logs; only the JSON report is written.
    #[arg(long)]
    json: bool,

    /// Write the JSON summary to the audit directory
    ///
    /// The summary will be saved as <input_name>_summary.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    #[command(flatten)]
    exclusion: ExclusionArgs,
}

/// Mark rows of the audit copy as excluded before auditing.
#[derive(ClapArgs, Debug)]
struct ExclusionArgs {
    /// Column whose values select the rows to exclude
    #[arg(long, requires = "reason")]
    exclude_column: Option<String>,

    /// Reason recorded for the excluded rows
    #[arg(long, requires = "exclude_column")]
    reason: Option<String>,

    /// Lower bound of the excluded numeric range (inclusive)
    #[arg(long, allow_hyphen_values = true, requires = "exclude_column")]
    min: Option<f64>,

    /// Upper bound of the excluded numeric range (inclusive)
    #[arg(long, allow_hyphen_values = true, requires = "exclude_column")]
    max: Option<f64>,

    /// Exclude dates on or after this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, requires = "exclude_column", conflicts_with_all = ["min", "max"])]
    after: Option<NaiveDate>,

    /// Exclude dates on or before this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, requires = "exclude_column", conflicts_with_all = ["min", "max"])]
    before: Option<NaiveDate>,

    /// Exclude rows holding one of these values (comma-separated)
    #[arg(long, value_delimiter = ',', requires = "exclude_column", conflicts_with_all = ["min", "max", "after", "before"])]
    values: Vec<String>,
}

fn parse_separator(raw: &str) -> Result<u8, String> {
    match raw {
        "," | ";" | "|" => Ok(raw.as_bytes()[0]),
        "\\t" | "\t" | "tab" => Ok(b'\t'),
        other => Err(format!(
            "unsupported separator '{}', expected one of: ',' ';' '|' '\\t'",
            other
        )),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("'{}': {}", raw, e))
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout
/// only carries the JSON report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let config = AuditConfig::builder()
        .audit_dir(args.audit_dir.clone())
        .fence_multiplier(args.fence_multiplier)
        .categorical_threshold(args.categorical_threshold)
        .report_column_limit(args.column_limit)
        .build()
        .context("Invalid audit configuration")?;

    let workspace = AuditWorkspace::new(config.audit_dir.clone());
    let (copy_path, already_existed) = workspace.copy_source(&args.input)?;
    if already_existed {
        warn!(
            "An audit copy already exists, delete it to start a new audit: {}",
            copy_path.display()
        );
    }

    let mut df = workspace.load_csv(&copy_path, args.separator)?;
    let auditor = Auditor::new(config);
    auditor.marks().ensure_reason_column(&mut df)?;

    if let Some(column) = &args.exclusion.exclude_column {
        let marked = apply_exclusion(&auditor, &mut df, column, &args.exclusion)?;
        workspace.save_csv(&mut df, &copy_path, args.separator)?;
        info!(
            "{} rows were excluded from the report, reason was saved into {}",
            marked,
            copy_path.display()
        );
    }

    let report = auditor.audit(&df)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(
            &args.input,
            &report,
            &args.columns,
            auditor.config().report_column_limit,
        );
    }

    if args.emit_report {
        let stem = file_stem(&args.input)?;
        let path = workspace.write_summary(&report, &stem)?;
        if !args.json {
            println!("\nSummary written to {}", path.display());
        }
    }

    Ok(())
}

/// Apply the exclusion selected on the command line; returns rows marked.
fn apply_exclusion(
    auditor: &Auditor,
    df: &mut DataFrame,
    column: &str,
    exclusion: &ExclusionArgs,
) -> Result<usize> {
    let reason = exclusion.reason.as_deref().unwrap_or_default();
    let marks = auditor.marks();

    let marked = if !exclusion.values.is_empty() {
        marks.mark_values(df, column, &exclusion.values, reason)?
    } else if exclusion.min.is_some() || exclusion.max.is_some() {
        let min = exclusion.min.unwrap_or(f64::NEG_INFINITY);
        let max = exclusion.max.unwrap_or(f64::INFINITY);
        if min > max {
            bail!("--min ({}) must not be greater than --max ({})", min, max);
        }
        marks.mark_numeric_range(df, column, min, max, reason)?
    } else if exclusion.after.is_some() || exclusion.before.is_some() {
        marks.mark_date_range(df, column, exclusion.after, exclusion.before, reason)?
    } else {
        bail!("--exclude-column needs --min/--max, --after/--before or --values");
    };

    Ok(marked)
}

fn print_report(input: &Path, report: &AuditReport, columns: &[String], column_limit: usize) {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    println!("Report for the file {}", name);
    println!("{}", "=".repeat(60));
    if columns.is_empty() {
        println!("{}", report.render(column_limit));
    } else {
        println!("{}", report.render_columns(columns));
    }
}
