//! Append-only weighing ledger.
//!
//! Rows are only ever appended. A soft delete appends a `delete` row that
//! mirrors and points at the record it cancels; the single permitted physical
//! removal is `undelete_last`, which drops the newest `delete` row.
//!
//! Every operation holds the connection mutex for its whole duration and
//! mutations run inside one SQLite transaction, so writers are serialized and
//! readers never see half of a mutation.

use crate::db::catalog;
use crate::db::initialize::init_db;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::action::Action;
use crate::models::catalog::{Category, Source};
use crate::models::entry::{LogEntry, TIMESTAMP_FORMAT};
use chrono::{Local, NaiveDateTime};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct Ledger {
    pool: Mutex<DbPool>,
}

impl Ledger {
    /// Open (creating if needed) the ledger database at `path` and migrate it.
    pub fn open(path: &str) -> AppResult<Self> {
        Self::from_pool(DbPool::new(path)?)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::in_memory()?)
    }

    pub fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self {
            pool: Mutex::new(pool),
        })
    }

    fn lock(&self) -> MutexGuard<'_, DbPool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a `record` row stamped with the current local time.
    pub fn append(&self, weight_lb: f64, source_id: i64, category_id: i64) -> AppResult<LogEntry> {
        if !(weight_lb.is_finite() && weight_lb > 0.0) {
            return Err(AppError::InvalidWeight(weight_lb));
        }

        let mut pool = self.lock();
        let tx = pool.conn.transaction()?;

        if !catalog::source_exists(&tx, source_id)? {
            return Err(AppError::UnknownReference {
                kind: "source",
                value: source_id.to_string(),
            });
        }
        if !catalog::category_exists(&tx, category_id)? {
            return Err(AppError::UnknownReference {
                kind: "type",
                value: category_id.to_string(),
            });
        }

        let ts = now_timestamp();
        let id = queries::insert_entry(
            &tx,
            &ts,
            weight_lb,
            source_id,
            category_id,
            Action::Record,
            None,
        )?;
        let entry = queries::load_entry(&tx, id)?;

        audit(
            &tx,
            "record",
            &format!("#{id}"),
            &format!(
                "{:.2} lb {} from {}",
                entry.weight_lb, entry.category, entry.source
            ),
        )?;
        tx.commit()?;

        log::debug!("appended ledger row {id}");
        Ok(entry)
    }

    /// Cancel the newest active record by appending a mirroring `delete` row.
    pub fn mark_last_deleted(&self) -> AppResult<LogEntry> {
        let mut pool = self.lock();
        let tx = pool.conn.transaction()?;

        let record_id = queries::last_active_record(&tx)?.ok_or(AppError::NoOp("delete"))?;
        let record = queries::load_entry(&tx, record_id)?;

        let id = queries::insert_entry(
            &tx,
            &now_timestamp(),
            record.weight_lb,
            record.source_id,
            record.category_id,
            Action::Delete,
            Some(record_id),
        )?;
        let entry = queries::load_entry(&tx, id)?;

        audit(
            &tx,
            "delete",
            &format!("#{record_id}"),
            &format!(
                "Cancelled {:.2} lb {} from {}",
                record.weight_lb, record.category, record.source
            ),
        )?;
        tx.commit()?;

        log::debug!("ledger row {record_id} cancelled by row {id}");
        Ok(entry)
    }

    /// Remove the newest `delete` row, reactivating the record it cancelled.
    /// Returns the removed row.
    pub fn undelete_last(&self) -> AppResult<LogEntry> {
        let mut pool = self.lock();
        let tx = pool.conn.transaction()?;

        let delete_id = queries::last_delete(&tx)?.ok_or(AppError::NoOp("undelete"))?;
        let removed = queries::load_entry(&tx, delete_id)?;
        queries::remove_delete_row(&tx, delete_id)?;

        let target = removed
            .cancels
            .map(|id| format!("#{id}"))
            .unwrap_or_default();
        audit(
            &tx,
            "undelete",
            &target,
            &format!(
                "Restored {:.2} lb {} from {}",
                removed.weight_lb, removed.category, removed.source
            ),
        )?;
        tx.commit()?;

        log::debug!("removed delete row {delete_id}");
        Ok(removed)
    }

    /// Rows newest first. `false` shows only active records; `true` shows
    /// every row, deletes included.
    pub fn list_active(&self, include_deleted: bool) -> AppResult<Vec<LogEntry>> {
        let pool = self.lock();
        Ok(queries::load_entries(&pool.conn, include_deleted)?)
    }

    /// Active records of `source_id` with `from <= timestamp < until`, oldest first.
    pub fn active_for_source(
        &self,
        source_id: i64,
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> AppResult<Vec<LogEntry>> {
        let pool = self.lock();
        Ok(queries::load_active_for_source(
            &pool.conn,
            source_id,
            &from.format(TIMESTAMP_FORMAT).to_string(),
            &until.format(TIMESTAMP_FORMAT).to_string(),
        )?)
    }

    pub fn row_count(&self) -> AppResult<i64> {
        let pool = self.lock();
        Ok(queries::count_rows(&pool.conn)?)
    }

    // ---------------------------
    // Catalog
    // ---------------------------

    pub fn sources(&self) -> AppResult<Vec<Source>> {
        Ok(catalog::load_sources(&self.lock().conn)?)
    }

    pub fn categories(&self) -> AppResult<Vec<Category>> {
        Ok(catalog::load_categories(&self.lock().conn)?)
    }

    pub fn source_id(&self, name: &str) -> AppResult<Option<i64>> {
        Ok(catalog::source_id_by_name(&self.lock().conn, name.trim())?)
    }

    pub fn category_id(&self, name: &str) -> AppResult<Option<i64>> {
        Ok(catalog::category_id_by_name(&self.lock().conn, name.trim())?)
    }

    pub fn require_source(&self, name: &str) -> AppResult<i64> {
        self.source_id(name)?.ok_or_else(|| AppError::UnknownReference {
            kind: "source",
            value: name.to_string(),
        })
    }

    pub fn require_category(&self, name: &str) -> AppResult<i64> {
        self.category_id(name)?.ok_or_else(|| AppError::UnknownReference {
            kind: "type",
            value: name.to_string(),
        })
    }

    pub fn add_source(&self, name: &str) -> AppResult<Source> {
        let name = valid_name("source", name)?;

        let mut pool = self.lock();
        let tx = pool.conn.transaction()?;
        if catalog::source_id_by_name(&tx, name)?.is_some() {
            return Err(AppError::DuplicateName {
                kind: "source",
                name: name.to_string(),
            });
        }
        let id = catalog::insert_source(&tx, name)?;
        audit(&tx, "add_source", name, "Source added")?;
        tx.commit()?;

        Ok(Source {
            id,
            name: name.to_string(),
        })
    }

    /// Add a category. Without `sort_order` it is placed after the last one.
    pub fn add_category(&self, name: &str, sort_order: Option<i64>) -> AppResult<Category> {
        let name = valid_name("type", name)?;

        let mut pool = self.lock();
        let tx = pool.conn.transaction()?;
        if catalog::category_id_by_name(&tx, name)?.is_some() {
            return Err(AppError::DuplicateName {
                kind: "type",
                name: name.to_string(),
            });
        }
        let sort_order = match sort_order {
            Some(s) => s,
            None => catalog::next_sort_order(&tx)?,
        };
        let id = catalog::insert_category(&tx, name, sort_order)?;
        audit(&tx, "add_type", name, &format!("Type added (order {sort_order})"))?;
        tx.commit()?;

        Ok(Category {
            id,
            name: name.to_string(),
            sort_order,
        })
    }
}

fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn valid_name<'a>(kind: &'static str, name: &'a str) -> AppResult<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(trimmed)
}
