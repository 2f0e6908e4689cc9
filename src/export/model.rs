// src/export/model.rs

use crate::core::report::{CategoryTotal, Report};
use crate::models::action::Action;
use crate::models::entry::LogEntry;
use serde::Serialize;

/// Flat row for CSV / JSON export. Field order is the CSV column order.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RowExport {
    pub id: i64,
    pub timestamp: String,
    pub weight_lb: f64,
    pub source: String,
    #[serde(rename = "type")]
    pub category: String,
    pub action: Action,
}

/// Header line of the CSV row table.
pub(crate) const ROW_HEADER: [&str; 6] = ["id", "timestamp", "weight_lb", "source", "type", "action"];

impl From<&LogEntry> for RowExport {
    fn from(e: &LogEntry) -> Self {
        Self {
            id: e.id,
            timestamp: e.timestamp_str(),
            weight_lb: round2(e.weight_lb),
            source: e.source.clone(),
            category: e.category.clone(),
            action: e.action,
        }
    }
}

/// JSON document for a whole report.
#[derive(Serialize, Clone, Debug)]
pub struct ReportExport {
    pub source: String,
    pub start: String,
    pub end: String,
    pub category_totals: Vec<CategoryTotal>,
    pub overall_total: f64,
    pub rows: Vec<RowExport>,
}

impl From<&Report> for ReportExport {
    fn from(r: &Report) -> Self {
        Self {
            source: r.source.clone(),
            start: r.start.to_string(),
            end: r.end.to_string(),
            category_totals: r
                .category_totals
                .iter()
                .map(|t| CategoryTotal {
                    category: t.category.clone(),
                    total_lb: round2(t.total_lb),
                })
                .collect(),
            overall_total: round2(r.overall_total),
            rows: r.rows.iter().map(RowExport::from).collect(),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
