//! Foreground side of the scale pipeline.
//!
//! The session keeps only ephemeral state: the newest reading drained from
//! the reader channel and the key of the last successful record (for
//! duplicate warnings). Everything durable goes through the [`Ledger`].

use crate::core::ledger::Ledger;
use crate::core::report::{Report, create_report};
use crate::device::{ReaderError, ReaderEvent};
use crate::errors::{AppError, AppResult};
use crate::models::entry::LogEntry;
use crate::models::reading::WeightReading;
use chrono::NaiveDate;
use crossbeam_channel::{Receiver, TryRecvError};
use std::sync::Arc;

/// Outcome of a successful [`Session::record`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub entry: LogEntry,
    /// Same weight, type and source as the previous record. Advisory only.
    pub duplicate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RecordKey {
    centi_lb: i64,
    category_id: i64,
    source_id: i64,
}

pub struct Session {
    ledger: Arc<Ledger>,
    readings: Option<Receiver<ReaderEvent>>,
    latest: Option<WeightReading>,
    last_recorded: Option<RecordKey>,
    min_weight_lb: f64,
}

impl Session {
    pub fn new(ledger: Arc<Ledger>, min_weight_lb: f64) -> Self {
        Self {
            ledger,
            readings: None,
            latest: None,
            last_recorded: None,
            min_weight_lb,
        }
    }

    /// Start consuming a reader channel. Replaces any previous one.
    pub fn attach(&mut self, readings: Receiver<ReaderEvent>) {
        self.readings = Some(readings);
    }

    pub fn is_attached(&self) -> bool {
        self.readings.is_some()
    }

    /// Drain every pending event without blocking, keep the newest reading
    /// and return the reader errors seen. A closed channel detaches it.
    pub fn poll(&mut self) -> Vec<ReaderError> {
        let mut errors = Vec::new();
        let Some(rx) = &self.readings else {
            return errors;
        };

        let mut closed = false;
        loop {
            match rx.try_recv() {
                Ok(Ok(reading)) => self.latest = Some(reading),
                Ok(Err(e)) => errors.push(e),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    closed = true;
                    break;
                }
            }
        }

        if closed {
            log::info!("scale reader channel closed");
            self.readings = None;
        }
        errors
    }

    pub fn latest_reading(&self) -> Option<WeightReading> {
        self.latest
    }

    pub fn min_weight_lb(&self) -> f64 {
        self.min_weight_lb
    }

    /// Record the latest reading under `category_id` / `source_id`.
    pub fn record(&mut self, category_id: i64, source_id: i64) -> AppResult<Recorded> {
        let pounds = self.latest.map_or(0.0, |r| r.pounds);
        if pounds < self.min_weight_lb {
            return Err(AppError::BelowMinimumWeight {
                weight: pounds,
                minimum: self.min_weight_lb,
            });
        }

        let entry = self.ledger.append(pounds, source_id, category_id)?;

        let key = RecordKey {
            centi_lb: (pounds * 100.0).round() as i64,
            category_id,
            source_id,
        };
        let duplicate = self.last_recorded == Some(key);
        self.last_recorded = Some(key);

        if duplicate {
            log::warn!("row {} repeats the previous record", entry.id);
        }
        Ok(Recorded { entry, duplicate })
    }

    pub fn undo_last(&self) -> AppResult<LogEntry> {
        self.ledger.mark_last_deleted()
    }

    pub fn redo_last(&self) -> AppResult<LogEntry> {
        self.ledger.undelete_last()
    }

    pub fn list_entries(&self, include_deleted: bool) -> AppResult<Vec<LogEntry>> {
        self.ledger.list_active(include_deleted)
    }

    pub fn report(
        &self,
        source: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Report> {
        create_report(&self.ledger, source, start, end)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}
