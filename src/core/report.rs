//! Per-source weight reports, recomputed from the ledger on every call.

use crate::core::ledger::Ledger;
use crate::errors::{AppError, AppResult};
use crate::models::catalog::Category;
use crate::models::entry::LogEntry;
use crate::utils::date;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_lb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub source: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Only categories with at least one row, in category sort order.
    pub category_totals: Vec<CategoryTotal>,
    pub overall_total: f64,
    /// Included rows, oldest first.
    pub rows: Vec<LogEntry>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_for(&self, category: &str) -> Option<f64> {
        self.category_totals
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.total_lb)
    }
}

/// Build the report for `source` over `[start, end]` (whole days, local time).
///
/// `start` defaults to today and `end` to `start`. An unknown source yields an
/// empty report rather than an error.
pub fn create_report(
    ledger: &Ledger,
    source: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> AppResult<Report> {
    let source = source.trim();
    let start = start.unwrap_or_else(date::today);
    let end = end.unwrap_or(start);

    if end < start {
        return Err(AppError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let mut report = Report {
        source: source.to_string(),
        start,
        end,
        category_totals: Vec::new(),
        overall_total: 0.0,
        rows: Vec::new(),
    };

    let Some(source_id) = ledger.source_id(source)? else {
        log::debug!("report requested for unknown source '{source}'");
        return Ok(report);
    };

    let midnight = NaiveTime::default();
    let from = start.and_time(midnight);
    let until = end
        .succ_opt()
        .map_or(NaiveDateTime::MAX, |next| next.and_time(midnight));

    let rows = ledger.active_for_source(source_id, from, until)?;
    let (category_totals, overall_total) = summarize(&rows, &ledger.categories()?);

    report.category_totals = category_totals;
    report.overall_total = overall_total;
    report.rows = rows;
    Ok(report)
}

/// Sum `rows` per category, ordered as `categories` is (by sort order).
pub fn summarize(rows: &[LogEntry], categories: &[Category]) -> (Vec<CategoryTotal>, f64) {
    let totals = categories
        .iter()
        .filter_map(|cat| {
            let mut matched = rows.iter().filter(|r| r.category_id == cat.id).peekable();
            matched.peek()?;
            Some(CategoryTotal {
                category: cat.name.clone(),
                total_lb: matched.map(|r| r.weight_lb).sum(),
            })
        })
        .collect();

    let overall = rows.iter().map(|r| r.weight_lb).sum();
    (totals, overall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::Action;

    fn cat(id: i64, name: &str, sort_order: i64) -> Category {
        Category {
            id,
            name: name.into(),
            sort_order,
        }
    }

    fn row(id: i64, category_id: i64, weight_lb: f64) -> LogEntry {
        LogEntry {
            id,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(9, 0, id as u32)
                .unwrap(),
            weight_lb,
            source_id: 1,
            category_id,
            action: Action::Record,
            cancels: None,
            source: "Safeway".into(),
            category: String::new(),
        }
    }

    #[test]
    fn totals_follow_category_order_and_skip_empty() {
        let categories = [cat(3, "Produce", 0), cat(1, "Dry", 1), cat(2, "Dairy", 2)];
        let rows = [row(1, 2, 4.0), row(2, 3, 1.5), row(3, 2, 2.5)];

        let (totals, overall) = summarize(&rows, &categories);

        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Produce".into(),
                    total_lb: 1.5
                },
                CategoryTotal {
                    category: "Dairy".into(),
                    total_lb: 6.5
                },
            ]
        );
        assert_eq!(overall, 8.0);
    }

    #[test]
    fn no_rows_gives_empty_totals() {
        let (totals, overall) = summarize(&[], &[cat(1, "Produce", 0)]);
        assert!(totals.is_empty());
        assert_eq!(overall, 0.0);
    }
}
