use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::AuditLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Audit { print: true }) {
        let pool = DbPool::new(&cfg.database)?;
        AuditLogic::print_log(&pool)?;
    }

    Ok(())
}
