use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{applied_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success};
use std::fs;

/// `db --migrate | --info | --check | --vacuum`, run in that order.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    if !(*migrate || *check || *vacuum || *show_info) {
        info("Nothing to do: pass --migrate, --info, --check or --vacuum.");
        return Ok(());
    }

    let pool = DbPool::new(&cfg.database)?;

    if *migrate {
        let before = applied_migrations(&pool.conn).unwrap_or_default();
        run_pending_migrations(&pool.conn)?;
        let after = applied_migrations(&pool.conn)?;

        let new: Vec<&String> = after.iter().filter(|m| !before.contains(m)).collect();
        if new.is_empty() {
            success("Schema is up to date.");
        } else {
            for name in new {
                success(format!("Applied migration {name}"));
            }
        }
    }

    if *show_info {
        stats::print_db_info(&pool, &cfg.database)?;
    }

    if *check {
        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        if integrity == "ok" {
            success("Integrity check passed.");
        } else {
            error(format!("Integrity check failed: {integrity}"));
        }
    }

    if *vacuum {
        let size = |path: &str| fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let before = size(&cfg.database);
        pool.conn.execute_batch("VACUUM;")?;
        success(format!(
            "Vacuum completed ({} → {} bytes).",
            before,
            size(&cfg.database)
        ));
    }

    Ok(())
}
