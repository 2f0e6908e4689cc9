//! Schema migrations.
//!
//! Each migration is recorded in the `log` table as a `migration_applied`
//! row, so it runs at most once per database. The catalog seed runs on every
//! start and relies on `INSERT OR IGNORE`.

use crate::db::catalog::seed_defaults;
use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension, Result, params};

type MigrationFn = fn(&Connection) -> Result<()>;

const MIGRATIONS: [(&str, &str, MigrationFn); 3] = [
    (
        "20240610_0001_create_ledger",
        "Created sources, types and logs tables",
        create_ledger_tables,
    ),
    (
        "20240915_0002_add_cancels_link",
        "Linked delete rows to the record they cancel",
        add_cancels_column,
    ),
    (
        "20240915_0003_logs_indexes",
        "Added timestamp and source indexes on logs",
        create_logs_indexes,
    ),
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// `IF NOT EXISTS` keeps databases created by the first scale logger usable.
fn create_ledger_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sources (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        );

        CREATE TABLE IF NOT EXISTS types (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT UNIQUE NOT NULL,
            sort_order INTEGER DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS logs (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            weight_lb REAL NOT NULL,
            source_id INTEGER NOT NULL,
            type_id   INTEGER NOT NULL,
            action    TEXT NOT NULL CHECK(action IN ('record', 'delete')) DEFAULT 'record',
            FOREIGN KEY(source_id) REFERENCES sources(id),
            FOREIGN KEY(type_id) REFERENCES types(id)
        );
        "#,
    )?;
    Ok(())
}

fn logs_has_column(conn: &Connection, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('logs')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn add_cancels_column(conn: &Connection) -> Result<()> {
    if !logs_has_column(conn, "cancels")? {
        conn.execute_batch(
            "ALTER TABLE logs ADD COLUMN cancels INTEGER REFERENCES logs(id);",
        )?;
    }

    let linked = backfill_cancels(conn)?;
    if linked > 0 {
        log::info!("linked {linked} legacy delete rows to their records");
    }
    Ok(())
}

/// Older databases stored delete rows without a link. Pair each one, oldest
/// first, with the newest earlier record of the same weight, source and type
/// that is still uncancelled.
fn backfill_cancels(conn: &Connection) -> Result<usize> {
    let deletes: Vec<(i64, String, f64, i64, i64)> = {
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, weight_lb, source_id, type_id
             FROM logs
             WHERE action = 'delete' AND cancels IS NULL
             ORDER BY timestamp ASC, id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            })?
            .collect::<Result<Vec<_>>>()?;
        rows
    };

    let mut linked = 0;
    for (delete_id, ts, weight, source_id, type_id) in deletes {
        let target: Option<i64> = conn
            .query_row(
                "SELECT r.id FROM logs r
                 WHERE r.action = 'record'
                   AND r.timestamp <= ?1
                   AND r.weight_lb = ?2
                   AND r.source_id = ?3
                   AND r.type_id = ?4
                   AND NOT EXISTS (SELECT 1 FROM logs d WHERE d.cancels = r.id)
                 ORDER BY r.timestamp DESC, r.id DESC
                 LIMIT 1",
                params![ts, weight, source_id, type_id],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(record_id) = target {
            conn.execute(
                "UPDATE logs SET cancels = ?1 WHERE id = ?2",
                params![record_id, delete_id],
            )?;
            linked += 1;
        } else {
            log::warn!("legacy delete row {delete_id} matches no record; left unlinked");
        }
    }

    Ok(linked)
}

fn create_logs_indexes(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON logs(timestamp, id);
        CREATE INDEX IF NOT EXISTS idx_logs_source_timestamp ON logs(source_id, timestamp);
        CREATE INDEX IF NOT EXISTS idx_logs_cancels ON logs(cancels);
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Public entry point: run all pending migrations, then seed the catalog.
///
/// Invoked by `db::initialize::init_db()`.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for (version, message, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        conn.execute_batch("BEGIN;")?;
        let outcome = apply(conn).and_then(|_| {
            conn.execute(
                "INSERT INTO log (date, operation, target, message)
                 VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
                params![version, message],
            )
        });

        match outcome {
            Ok(_) => {
                conn.execute_batch("COMMIT;")?;
                log::info!("migration applied: {version}");
            }
            Err(e) => {
                conn.execute_batch("ROLLBACK;")?;
                return Err(crate::errors::AppError::Migration(format!("{version}: {e}")));
            }
        }
    }

    seed_defaults(conn)?;
    Ok(())
}

/// Names of the migrations recorded as applied, oldest first.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>>>()?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_run_once() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        let applied = applied_migrations(&conn).unwrap();
        assert_eq!(applied.len(), MIGRATIONS.len());
        assert!(logs_has_column(&conn, "cancels").unwrap());
    }

    #[test]
    fn legacy_delete_rows_are_linked() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_log_table(&conn).unwrap();
        create_ledger_tables(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO sources (name) VALUES ('Safeway');
            INSERT INTO types (name, sort_order) VALUES ('Produce', 0);
            INSERT INTO logs (timestamp, weight_lb, source_id, type_id, action) VALUES
                ('2024-05-01T10:00:00.123456', 5.0, 1, 1, 'record'),
                ('2024-05-01T10:05:00.000001', 5.0, 1, 1, 'record'),
                ('2024-05-01T10:06:00.500000', 5.0, 1, 1, 'delete'),
                ('2024-05-01T10:07:00.500000', 9.0, 1, 1, 'delete');
            "#,
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();

        let links: Vec<(i64, Option<i64>)> = conn
            .prepare("SELECT id, cancels FROM logs WHERE action = 'delete' ORDER BY id")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(links, vec![(3, Some(2)), (4, None)]);
    }
}
