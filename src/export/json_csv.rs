// src/export/json_csv.rs

use crate::errors::AppResult;
use crate::export::model::ROW_HEADER;
use crate::export::{ReportExport, notify_export_success};
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export the whole report as pretty-printed JSON.
pub(crate) fn export_json(report: &ReportExport, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(report)?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Export the report as CSV in two blocks separated by an empty line:
///
/// ```text
/// Summary by Category
/// type,total_lb
/// Produce,12.50
/// Total,12.50
///
/// id,timestamp,weight_lb,source,type,action
/// 1,2024-01-15T10:02:11,12.5,Safeway,Produce,record
/// ```
pub(crate) fn export_csv(report: &ReportExport, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(["Summary by Category"])?;
    wtr.write_record(["type", "total_lb"])?;
    for t in &report.category_totals {
        wtr.write_record([t.category.as_str(), format!("{:.2}", t.total_lb).as_str()])?;
    }
    wtr.write_record(["Total", format!("{:.2}", report.overall_total).as_str()])?;

    // an empty csv record would be written as `""`
    wtr.flush()?;
    wtr.get_ref().write_all(b"\n")?;

    wtr.write_record(ROW_HEADER)?;
    for item in &report.rows {
        wtr.serialize(item)?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
