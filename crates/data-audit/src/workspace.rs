//! Audit working directory.
//!
//! The source file is never written to. Audits run against a copy named
//! `<stem>_audit.<ext>` inside the audit directory; exclusion marks are saved
//! back into that copy and the JSON summary is written next to it.

use crate::error::{AuditError, Result, ResultExt};
use crate::reporting::AuditReport;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Audit directory holding working copies and summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditWorkspace {
    audit_dir: PathBuf,
}

impl AuditWorkspace {
    pub fn new(audit_dir: impl Into<PathBuf>) -> Self {
        Self {
            audit_dir: audit_dir.into(),
        }
    }

    pub fn audit_dir(&self) -> &Path {
        &self.audit_dir
    }

    /// Path of the working copy for `source`.
    pub fn copy_path(&self, source: &Path) -> Result<PathBuf> {
        let stem = file_stem(source)?;
        let name = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}_audit.{}", stem, ext),
            None => format!("{}_audit", stem),
        };
        Ok(self.audit_dir.join(name))
    }

    /// Copy `source` into the audit directory unless a copy already exists.
    ///
    /// Returns the copy's path and whether it was already there. An existing
    /// copy is left untouched so earlier exclusion marks survive.
    pub fn copy_source(&self, source: &Path) -> Result<(PathBuf, bool)> {
        let copy_path = self.copy_path(source)?;
        fs::create_dir_all(&self.audit_dir)?;

        let already_existed = copy_path.exists();
        if already_existed {
            info!("Reusing existing audit copy: {}", copy_path.display());
        } else {
            fs::copy(source, &copy_path).map_err(|e| {
                AuditError::Io(e).with_context(format!("Failed to copy {}", source.display()))
            })?;
            info!("Audit copy created: {}", copy_path.display());
        }

        Ok((copy_path, already_existed))
    }

    /// Load a CSV file with a header row.
    pub fn load_csv(&self, path: &Path, separator: u8) -> Result<DataFrame> {
        debug!("Loading {} (separator {:?})", path.display(), separator as char);
        let df = CsvReadOptions::default()
            .with_infer_schema_length(Some(100))
            .with_has_header(true)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(separator)
                    .with_quote_char(Some(b'"')),
            )
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .context(format!("Failed to open {}", path.display()))?
            .finish()
            .context(format!("Failed to parse {}", path.display()))?;
        info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(df)
    }

    /// Write `df` back to `path` as CSV with a header row.
    pub fn save_csv(&self, df: &mut DataFrame, path: &Path, separator: u8) -> Result<()> {
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(separator)
            .with_quote_char(b'"')
            .finish(df)
            .context(format!("Failed to write {}", path.display()))?;
        info!("Dataset saved: {}", path.display());
        Ok(())
    }

    /// Write the report as pretty JSON to `<audit_dir>/<stem>_summary.json`.
    pub fn write_summary(&self, report: &AuditReport, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.audit_dir)?;

        let summary_path = self.audit_dir.join(format!("{}_summary.json", stem));
        let mut file = File::create(&summary_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Summary saved: {}", summary_path.display());
        Ok(summary_path)
    }
}

impl Default for AuditWorkspace {
    fn default() -> Self {
        Self::new("audit_files")
    }
}

/// File name without extension, as UTF-8.
pub fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            AuditError::InvalidConfig(format!("'{}' has no usable file name", path.display()))
        })
}
