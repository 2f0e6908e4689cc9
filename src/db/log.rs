use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};

/// Append one line to the internal `log` table.
///
/// `conn` may be a transaction, in which case the line commits or rolls back
/// with the change it describes.
pub fn audit(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    conn.prepare_cached("INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)")?
        .execute(params![Local::now().to_rfc3339(), operation, target, message])?;
    Ok(())
}
