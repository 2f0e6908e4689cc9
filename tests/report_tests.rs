use chrono::{Local, NaiveDate};
use rusqlite::{Connection, params};
use scalelog::core::ledger::Ledger;
use scalelog::core::report::create_report;
use scalelog::errors::AppError;

mod common;
use common::setup_test_db;

fn seeded() -> Ledger {
    let ledger = Ledger::open_in_memory().unwrap();
    let safeway = ledger.require_source("Safeway").unwrap();
    let wegmans = ledger.require_source("Wegmans").unwrap();
    let produce = ledger.require_category("Produce").unwrap();
    let dry = ledger.require_category("Dry").unwrap();

    ledger.append(4.0, safeway, dry).unwrap();
    ledger.append(10.0, safeway, produce).unwrap();
    ledger.append(2.5, safeway, produce).unwrap();
    ledger.append(6.0, wegmans, produce).unwrap();
    ledger
}

/// First and last day the ledger's rows were stamped on. Rows are stamped
/// with the wall clock, so this stays right across midnight.
fn stamped_range(ledger: &Ledger) -> (NaiveDate, NaiveDate) {
    let days: Vec<NaiveDate> = ledger
        .list_active(true)
        .unwrap()
        .iter()
        .map(|e| e.timestamp.date())
        .collect();
    (*days.iter().min().unwrap(), *days.iter().max().unwrap())
}

#[test]
fn report_defaults_to_today() {
    let ledger = seeded();

    let before = Local::now().date_naive();
    let report = create_report(&ledger, "Nobody", None, None).unwrap();
    let after = Local::now().date_naive();

    assert!(report.start == before || report.start == after);
    assert_eq!(report.end, report.start);
}

#[test]
fn totals_follow_category_order() {
    let ledger = seeded();

    let (first, last) = stamped_range(&ledger);
    let report = create_report(&ledger, "Safeway", Some(first), Some(last)).unwrap();

    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.overall_total, 16.5);

    // category sort order: Produce before Dry
    let names: Vec<&str> = report
        .category_totals
        .iter()
        .map(|t| t.category.as_str())
        .collect();
    assert_eq!(names, ["Produce", "Dry"]);
    assert_eq!(report.total_for("Produce"), Some(12.5));
    assert_eq!(report.total_for("Dairy"), None);

    assert!(report.rows.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn cancelled_rows_are_excluded() {
    let ledger = seeded();
    let safeway = ledger.require_source("Safeway").unwrap();
    let dairy = ledger.require_category("Dairy").unwrap();

    ledger.append(3.0, safeway, dairy).unwrap();
    ledger.mark_last_deleted().unwrap();

    let (first, last) = stamped_range(&ledger);
    let report = create_report(&ledger, "Safeway", Some(first), Some(last)).unwrap();
    assert_eq!(report.total_for("Dairy"), None);
    assert_eq!(report.overall_total, 16.5);
    assert!(report.rows.iter().all(|r| r.category != "Dairy"));
}

#[test]
fn unknown_source_gives_empty_report() {
    let ledger = seeded();
    let report = create_report(&ledger, "Nobody", None, None).unwrap();

    assert!(report.is_empty());
    assert!(report.category_totals.is_empty());
    assert_eq!(report.overall_total, 0.0);
}

#[test]
fn range_outside_entries_is_empty() {
    let ledger = seeded();
    let (first, last) = stamped_range(&ledger);
    let after = last.succ_opt().unwrap();

    let report = create_report(&ledger, "Safeway", Some(after), None).unwrap();
    assert!(report.is_empty());

    let before = first.pred_opt().unwrap();
    let report = create_report(&ledger, "Safeway", Some(before), Some(after)).unwrap();
    assert_eq!(report.rows.len(), 3);
}

#[test]
fn reversed_range_is_rejected() {
    let ledger = seeded();
    let today = Local::now().date_naive();

    assert!(matches!(
        create_report(&ledger, "Safeway", Some(today), today.pred_opt()),
        Err(AppError::InvalidDateRange { .. })
    ));
}

#[test]
fn source_name_is_trimmed() {
    let ledger = seeded();
    let (first, last) = stamped_range(&ledger);

    let report = create_report(&ledger, "  Safeway ", Some(first), Some(last)).unwrap();
    assert_eq!(report.source, "Safeway");
    assert_eq!(report.rows.len(), 3);
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn date_range_includes_whole_end_day() {
    let db_path = setup_test_db("report_range_edges");
    let ledger = Ledger::open(&db_path).unwrap();
    let src = ledger.require_source("Safeway").unwrap();
    let produce = ledger.require_category("Produce").unwrap();

    // fixed timestamps go in through a second connection
    let conn = Connection::open(&db_path).unwrap();
    let insert = |ts: &str, lb: f64, action: &str, cancels: Option<i64>| -> i64 {
        conn.execute(
            "INSERT INTO logs (timestamp, weight_lb, source_id, type_id, action, cancels)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![ts, lb, src, produce, action, cancels],
        )
        .unwrap();
        conn.last_insert_rowid()
    };

    insert("2023-12-31T23:59:59", 8.0, "record", None);
    insert("2024-01-01T00:00:00", 1.0, "record", None);
    insert("2024-01-15T12:00:00", 16.0, "record", None);
    let cancelled = insert("2024-01-20T09:30:00", 5.0, "record", None);
    insert("2024-01-20T09:31:00", 5.0, "delete", Some(cancelled));
    // older builds stored fractional seconds
    insert("2024-01-31T23:59:59.9", 2.0, "record", None);
    insert("2024-02-01T00:00:00", 4.0, "record", None);

    // newest active record is the February one
    assert_eq!(ledger.mark_last_deleted().unwrap().weight_lb, 4.0);

    let january = create_report(&ledger, "Safeway", Some(date(2024, 1, 1)), Some(date(2024, 1, 31)))
        .unwrap();
    let weights: Vec<f64> = january.rows.iter().map(|r| r.weight_lb).collect();
    assert_eq!(weights, [1.0, 16.0, 2.0]);
    assert_eq!(january.overall_total, 19.0);
    assert_eq!(january.total_for("Produce"), Some(19.0));

    let new_year = create_report(&ledger, "Safeway", Some(date(2023, 12, 31)), None).unwrap();
    assert_eq!(new_year.overall_total, 8.0);

    let february = create_report(&ledger, "Safeway", Some(date(2024, 2, 1)), None).unwrap();
    assert!(february.is_empty());

    drop(conn);
    drop(ledger);
    std::fs::remove_file(&db_path).ok();
}
