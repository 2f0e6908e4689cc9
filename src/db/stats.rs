use crate::db::migrate::applied_migrations;
use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RED, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) LEDGER ROWS
    //
    let (records, deletes): (i64, i64) = pool.conn.query_row(
        "SELECT
            COALESCE(SUM(action = 'record'), 0),
            COALESCE(SUM(action = 'delete'), 0)
         FROM logs",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    println!(
        "{}• Ledger rows:{} {}{}{} recorded, {}{}{} deleted",
        CYAN,
        RESET,
        GREEN,
        records,
        RESET,
        RED,
        deletes,
        RESET
    );

    //
    // 3) DATE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT timestamp FROM logs ORDER BY timestamp ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT timestamp FROM logs ORDER BY timestamp DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt_first = first.unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) CATALOG
    //
    let sources: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM sources", [], |row| row.get(0))?;
    let types: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM types", [], |row| row.get(0))?;
    println!("{}• Sources:{} {}", CYAN, RESET, sources);
    println!("{}• Types:{} {}", CYAN, RESET, types);

    //
    // 5) MIGRATIONS
    //
    println!("{}• Migrations:{}", CYAN, RESET);
    for m in applied_migrations(&pool.conn)? {
        println!("    {}", m);
    }

    println!();
    Ok(())
}
