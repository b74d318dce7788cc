//! Data Audit Library
//!
//! Column profiling and anomaly detection for tabular data-quality audits,
//! built on Polars.
//!
//! # Overview
//!
//! Each column of a dataset is profiled according to its semantic kind:
//!
//! - **Identifiers**: missing values, duplicated IDs, value lengths and shape
//! - **Dates**: range, mean/median/mode and IQR outliers
//! - **Numerics**: descriptive statistics and IQR outliers
//! - **Text**: cardinality and most popular value
//!
//! Every profile has a matching formatter producing a markdown-flavoured
//! summary. Rows can be excluded from an audit by writing a reason into a
//! dedicated column, without deleting anything from the file.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_audit::{AuditConfig, AuditWorkspace, Auditor};
//! use std::path::Path;
//!
//! let workspace = AuditWorkspace::new("audit_files");
//! let (copy, _) = workspace.copy_source(Path::new("sales.csv"))?;
//! let df = workspace.load_csv(&copy, b',')?;
//!
//! let config = AuditConfig::builder()
//!     .fence_multiplier(1.5)
//!     .categorical_threshold(10)
//!     .build()?;
//!
//! let report = Auditor::new(config).audit(&df)?;
//! println!("{}", report.render(5));
//! workspace.write_summary(&report, "sales")?;
//! ```
//!
//! # Single Columns
//!
//! The profilers can be called directly:
//!
//! ```rust,ignore
//! use data_audit::profiler::{prepare_numeric_column, prepare_identifier_column};
//! use data_audit::reporting::numeric_column_summary;
//!
//! let (profile, outliers) = prepare_numeric_column(&df, "amount")?;
//! println!("{}", numeric_column_summary(&profile, "amount"));
//!
//! let (id_profile, duplicated) = prepare_identifier_column(&df, "customer_id")?;
//! ```

pub mod auditor;
pub mod classifier;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod overview;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;
pub mod workspace;

// Re-exports for convenient access
pub use auditor::{Auditor, audit};
pub use classifier::{ColumnClassification, classify_columns};
pub use config::{AuditConfig, AuditConfigBuilder, ConfigValidationError};
pub use error::{AuditError, Result as AuditResult, ResultExt};
pub use exclusion::ExclusionMarks;
pub use overview::{ColumnMissing, DatasetOverview};
pub use profiler::{
    prepare_date_column, prepare_identifier_column, prepare_numeric_column, prepare_text_column,
    profile_column,
};
pub use reporting::{AuditReport, format_profile};
pub use types::{
    Anomalies, ColumnKind, ColumnProfile, ColumnReport, DateProfile, DuplicatedValue,
    IdentifierProfile, MostPopular, NumericProfile, OutlierRow, SkippedColumn, TextProfile,
};
pub use utils::{DtypeCategory, get_dtype_category, is_datetime_dtype, is_numeric_dtype};
pub use workspace::AuditWorkspace;
