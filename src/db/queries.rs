use crate::errors::AppError;
use crate::models::action::Action;
use crate::models::entry::LogEntry;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

/// Ledger rows with source and category names joined in.
const SELECT_ENTRIES: &str = "
    SELECT l.id AS id, l.timestamp AS timestamp, l.weight_lb AS weight_lb,
           l.source_id AS source_id, l.type_id AS type_id, l.action AS action,
           l.cancels AS cancels, s.name AS source, t.name AS category
    FROM logs l
    JOIN sources s ON s.id = l.source_id
    JOIN types t ON t.id = l.type_id";

/// A record row with no delete row pointing at it.
const ACTIVE_RECORD: &str = "l.action = 'record'
    AND NOT EXISTS (SELECT 1 FROM logs d WHERE d.action = 'delete' AND d.cancels = l.id)";

/// Accepts both second-precision timestamps and the fractional ones written
/// by older versions.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<LogEntry> {
    let ts_str: String = row.get("timestamp")?;
    let timestamp = NaiveDateTime::parse_from_str(&ts_str, PARSE_FORMAT)
        .map_err(|_| conversion_error(1, AppError::InvalidDate(ts_str.clone())))?;

    let action_str: String = row.get("action")?;
    let action = Action::from_db_str(&action_str)
        .ok_or_else(|| conversion_error(5, AppError::InvalidAction(action_str.clone())))?;

    Ok(LogEntry {
        id: row.get("id")?,
        timestamp,
        weight_lb: row.get("weight_lb")?,
        source_id: row.get("source_id")?,
        category_id: row.get("type_id")?,
        action,
        cancels: row.get("cancels")?,
        source: row.get("source")?,
        category: row.get("category")?,
    })
}

pub fn insert_entry(
    conn: &Connection,
    timestamp: &str,
    weight_lb: f64,
    source_id: i64,
    type_id: i64,
    action: Action,
    cancels: Option<i64>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO logs (timestamp, weight_lb, source_id, type_id, action, cancels)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            timestamp,
            weight_lb,
            source_id,
            type_id,
            action.to_db_str(),
            cancels
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_entry(conn: &Connection, id: i64) -> Result<LogEntry> {
    let sql = format!("{SELECT_ENTRIES} WHERE l.id = ?1");
    conn.query_row(&sql, [id], map_row)
}

/// Newest record row that has not been cancelled yet.
pub fn last_active_record(conn: &Connection) -> Result<Option<i64>> {
    let sql = format!(
        "SELECT l.id FROM logs l WHERE {ACTIVE_RECORD}
         ORDER BY l.timestamp DESC, l.id DESC LIMIT 1"
    );
    conn.query_row(&sql, [], |row| row.get(0)).optional()
}

pub fn last_delete(conn: &Connection) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM logs WHERE action = 'delete'
         ORDER BY timestamp DESC, id DESC LIMIT 1",
        [],
        |row| row.get(0),
    )
    .optional()
}

/// Physically remove a delete row. Record rows are never passed here.
pub fn remove_delete_row(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM logs WHERE id = ?1 AND action = 'delete'",
        [id],
    )
}

/// Rows newest first. Without `include_deleted` only active records are returned.
pub fn load_entries(conn: &Connection, include_deleted: bool) -> Result<Vec<LogEntry>> {
    let filter = if include_deleted {
        String::new()
    } else {
        format!(" WHERE {ACTIVE_RECORD}")
    };
    let sql = format!("{SELECT_ENTRIES}{filter} ORDER BY l.timestamp DESC, l.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Active records of one source with `from <= timestamp < until`, oldest first.
pub fn load_active_for_source(
    conn: &Connection,
    source_id: i64,
    from: &str,
    until: &str,
) -> Result<Vec<LogEntry>> {
    let sql = format!(
        "{SELECT_ENTRIES}
         WHERE {ACTIVE_RECORD}
           AND l.source_id = ?1
           AND l.timestamp >= ?2
           AND l.timestamp < ?3
         ORDER BY l.timestamp ASC, l.id ASC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![source_id, from, until], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_rows(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))
}
