use crossbeam_channel::unbounded;
use scalelog::core::ledger::Ledger;
use scalelog::core::session::Session;
use scalelog::device::ReaderError;
use scalelog::errors::AppError;
use scalelog::models::reading::WeightReading;
use std::sync::Arc;

fn session() -> (Session, Arc<Ledger>) {
    let ledger = Arc::new(Ledger::open_in_memory().unwrap());
    (Session::new(Arc::clone(&ledger), 0.11), ledger)
}

#[test]
fn record_without_reading_is_below_minimum() {
    let (mut session, ledger) = session();
    let src = ledger.require_source("Safeway").unwrap();
    let cat = ledger.require_category("Produce").unwrap();

    assert!(matches!(
        session.record(cat, src),
        Err(AppError::BelowMinimumWeight { weight, .. }) if weight == 0.0
    ));
    assert_eq!(ledger.row_count().unwrap(), 0);
}

#[test]
fn light_reading_is_not_recorded() {
    let (mut session, ledger) = session();
    let src = ledger.require_source("Safeway").unwrap();
    let cat = ledger.require_category("Produce").unwrap();

    let (tx, rx) = unbounded();
    session.attach(rx);
    tx.send(Ok(WeightReading::from_pounds(0.05))).unwrap();
    assert!(session.poll().is_empty());

    assert!(matches!(
        session.record(cat, src),
        Err(AppError::BelowMinimumWeight { .. })
    ));
    assert_eq!(ledger.row_count().unwrap(), 0);
}

#[test]
fn identical_records_are_flagged_but_kept() {
    let (mut session, ledger) = session();
    let src = ledger.require_source("Safeway").unwrap();
    let cat = ledger.require_category("Produce").unwrap();

    let (tx, rx) = unbounded();
    session.attach(rx);
    tx.send(Ok(WeightReading::from_pounds(5.0))).unwrap();
    session.poll();

    let first = session.record(cat, src).unwrap();
    let second = session.record(cat, src).unwrap();
    assert!(!first.duplicate);
    assert!(second.duplicate);
    assert_eq!(ledger.list_active(false).unwrap().len(), 2);

    // different type breaks the run
    let dry = ledger.require_category("Dry").unwrap();
    assert!(!session.record(dry, src).unwrap().duplicate);
}

#[test]
fn poll_keeps_newest_reading_and_returns_errors() {
    let (mut session, _ledger) = session();
    let (tx, rx) = unbounded();
    session.attach(rx);

    tx.send(Ok(WeightReading::from_pounds(1.0))).unwrap();
    tx.send(Err(ReaderError::Io("timeout".into()))).unwrap();
    tx.send(Ok(WeightReading::from_pounds(2.0))).unwrap();

    let errors = session.poll();
    assert_eq!(errors, vec![ReaderError::Io("timeout".into())]);
    assert_eq!(session.latest_reading().map(|r| r.pounds), Some(2.0));
    assert!(session.is_attached());

    // nothing new: latest reading is kept
    assert!(session.poll().is_empty());
    assert_eq!(session.latest_reading().map(|r| r.pounds), Some(2.0));
}

#[test]
fn closed_channel_detaches() {
    let (mut session, _ledger) = session();
    let (tx, rx) = unbounded();
    session.attach(rx);

    tx.send(Ok(WeightReading::from_pounds(3.0))).unwrap();
    drop(tx);

    session.poll();
    assert!(!session.is_attached());
    assert_eq!(session.latest_reading().map(|r| r.pounds), Some(3.0));
}

#[test]
fn undo_and_redo_go_through_the_ledger() {
    let (mut session, ledger) = session();
    let src = ledger.require_source("Wegmans").unwrap();
    let cat = ledger.require_category("Meat").unwrap();

    let (tx, rx) = unbounded();
    session.attach(rx);
    tx.send(Ok(WeightReading::from_kilograms(2.0))).unwrap();
    session.poll();

    session.record(cat, src).unwrap();
    session.undo_last().unwrap();
    assert!(session.list_entries(false).unwrap().is_empty());

    session.redo_last().unwrap();
    assert_eq!(session.list_entries(false).unwrap().len(), 1);

    let report = session.report("Wegmans", None, None).unwrap();
    assert!((report.overall_total - 4.40924).abs() < 1e-6);
}
