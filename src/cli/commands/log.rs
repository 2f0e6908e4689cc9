use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::{format_kg, format_lb};

/// Record a weight typed in by hand.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log {
        weight,
        category,
        source,
    } = cmd
    {
        let ledger = Ledger::open(&cfg.database)?;
        let source_id = ledger.require_source(source)?;
        let category_id = ledger.require_category(category)?;

        let entry = ledger.append(*weight, source_id, category_id)?;

        success(format!(
            "#{} {} ({}) {} from {} at {}",
            entry.id,
            format_lb(entry.weight_lb),
            format_kg(entry.weight_kg()),
            entry.category,
            entry.source,
            entry.timestamp_str()
        ));
    }

    Ok(())
}
