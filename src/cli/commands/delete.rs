use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::format_lb;

/// `delete-last` and `undelete-last`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let ledger = Ledger::open(&cfg.database)?;

    let result = match cmd {
        Commands::DeleteLast => ledger.mark_last_deleted().map(|row| {
            success(format!(
                "Deleted #{}: {} {} from {}",
                row.cancels.unwrap_or(row.id),
                format_lb(row.weight_lb),
                row.category,
                row.source
            ));
        }),
        Commands::UndeleteLast => ledger.undelete_last().map(|row| {
            success(format!(
                "Restored #{}: {} {} from {}",
                row.cancels.unwrap_or(row.id),
                format_lb(row.weight_lb),
                row.category,
                row.source
            ));
        }),
        _ => Ok(()),
    };

    match result {
        // nothing to act on is not a failure
        Err(AppError::NoOp(what)) => {
            warning(format!("Nothing to {what}."));
            Ok(())
        }
        other => other,
    }
}
