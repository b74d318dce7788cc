//! Report rendering.
//!
//! - [`formatters`]: one human-readable summary per column profile
//! - [`AuditReport`]: the dataset-level report, serialized for `--json` and
//!   the summary file, or rendered as plain text
//!
//! # Example
//!
//! ```rust,ignore
//! use data_audit::{AuditConfig, Auditor};
//!
//! let report = Auditor::new(AuditConfig::default()).audit(&df)?;
//! println!("{}", report.render(5));
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod formatters;
mod report;

pub use formatters::{
    date_column_summary, format_profile, identifier_column_summary, numeric_column_summary,
    text_column_summary,
};
pub use report::AuditReport;
