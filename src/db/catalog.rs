//! Sources and categories ("types" in the schema). Both are append-only
//! vocabularies: rows are inserted once and never removed.

use crate::models::catalog::{Category, DEFAULT_CATEGORIES, DEFAULT_SOURCES, Source};
use rusqlite::{Connection, OptionalExtension, Result, params};

pub fn seed_defaults(conn: &Connection) -> Result<()> {
    let mut src = conn.prepare_cached("INSERT OR IGNORE INTO sources (name) VALUES (?1)")?;
    for name in DEFAULT_SOURCES {
        src.execute([name])?;
    }

    let mut ty =
        conn.prepare_cached("INSERT OR IGNORE INTO types (name, sort_order) VALUES (?1, ?2)")?;
    for (i, name) in DEFAULT_CATEGORIES.iter().enumerate() {
        ty.execute(params![name, i as i64])?;
    }
    Ok(())
}

/// All sources, alphabetically.
pub fn load_sources(conn: &Connection) -> Result<Vec<Source>> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM sources ORDER BY name ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Source {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// All categories, by sort order.
pub fn load_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, sort_order FROM types ORDER BY sort_order ASC, id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            sort_order: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn source_id_by_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    conn.query_row("SELECT id FROM sources WHERE name = ?1", [name], |row| {
        row.get(0)
    })
    .optional()
}

pub fn category_id_by_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    conn.query_row("SELECT id FROM types WHERE name = ?1", [name], |row| {
        row.get(0)
    })
    .optional()
}

pub fn source_exists(conn: &Connection, id: i64) -> Result<bool> {
    conn.query_row("SELECT EXISTS(SELECT 1 FROM sources WHERE id = ?1)", [id], |row| {
        row.get(0)
    })
}

pub fn category_exists(conn: &Connection, id: i64) -> Result<bool> {
    conn.query_row("SELECT EXISTS(SELECT 1 FROM types WHERE id = ?1)", [id], |row| {
        row.get(0)
    })
}

pub fn insert_source(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute("INSERT INTO sources (name) VALUES (?1)", [name])?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_category(conn: &Connection, name: &str, sort_order: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO types (name, sort_order) VALUES (?1, ?2)",
        params![name, sort_order],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn next_sort_order(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM types",
        [],
        |row| row.get(0),
    )
}
