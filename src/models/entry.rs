use super::action::Action;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Storage format of `logs.timestamp`: local time, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One ledger row, with the source and category names joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub weight_lb: f64,
    pub source_id: i64,
    pub category_id: i64,
    pub action: Action,
    /// For `delete` rows, the id of the record row being cancelled.
    pub cancels: Option<i64>,
    pub source: String,
    pub category: String,
}

impl LogEntry {
    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_lb / super::reading::LB_PER_KG
    }
}
