// src/export/logic.rs

use crate::core::ledger::Ledger;
use crate::core::report::{Report, create_report};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::ReportExport;
use crate::ui::messages::{info, warning};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// High-level report export.
pub struct ExportLogic;

impl ExportLogic {
    /// Build the report for `source` and write it to `file`.
    ///
    /// Returns `false` when there was nothing to export.
    pub fn export(
        ledger: &Ledger,
        format: ExportFormat,
        file: &str,
        source: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        force: bool,
    ) -> AppResult<bool> {
        let path = Path::new(file);

        if path.file_name().is_none() {
            return Err(AppError::Export(format!("not a file path: {file}")));
        }

        let report = create_report(ledger, source, start, end)?;

        if report.is_empty() {
            warning(format!(
                "No entries for '{}' between {} and {}.",
                report.source, report.start, report.end
            ));
            return Ok(false);
        }

        write_report(&report, format, path, force)?;
        Ok(true)
    }

    /// Write one file per source that has entries in the range, into `dir`.
    ///
    /// Files are named `<source>_<start>_to_<end>.<ext>`. Returns the paths
    /// written, in source order.
    pub fn export_all(
        ledger: &Ledger,
        format: ExportFormat,
        dir: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        force: bool,
    ) -> AppResult<Vec<PathBuf>> {
        let dir = Path::new(dir);
        let mut written = Vec::new();

        for source in ledger.sources()? {
            let report = create_report(ledger, &source.name, start, end)?;
            if report.is_empty() {
                log::debug!("no entries for '{}', skipped", source.name);
                continue;
            }

            if written.is_empty() {
                fs::create_dir_all(dir)?;
            }

            let path = dir.join(report_file_name(&report, format));
            write_report(&report, format, &path, force)?;
            written.push(path);
        }

        if written.is_empty() {
            warning("No entries for any source in this range.");
        } else {
            info(format!("{} file(s) written to {}", written.len(), dir.display()));
        }

        Ok(written)
    }
}

fn write_report(report: &Report, format: ExportFormat, path: &Path, force: bool) -> AppResult<()> {
    ensure_writable(path, force)?;

    let doc = ReportExport::from(report);
    match format {
        ExportFormat::Csv => export_csv(&doc, path),
        ExportFormat::Json => export_json(&doc, path),
    }
}

/// `Trader Joe's` over January → `Trader_Joe's_2024-01-01_to_2024-01-31.csv`
fn report_file_name(report: &Report, format: ExportFormat) -> String {
    let source: String = report
        .source
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let ext = match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Json => "json",
    };
    format!("{source}_{}_to_{}.{ext}", report.start, report.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report(source: &str) -> Report {
        Report {
            source: source.into(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            category_totals: Vec::new(),
            overall_total: 0.0,
            rows: Vec::new(),
        }
    }

    #[test]
    fn file_name_carries_source_and_range() {
        assert_eq!(
            report_file_name(&empty_report("Trader Joe's"), ExportFormat::Csv),
            "Trader_Joe's_2024-01-01_to_2024-01-31.csv"
        );
        assert_eq!(
            report_file_name(&empty_report("A/B Market"), ExportFormat::Json),
            "A_B_Market_2024-01-01_to_2024-01-31.json"
        );
    }
}
