use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

/// `list-sources`, `add-source`, `list-types`, `add-type`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let ledger = Ledger::open(&cfg.database)?;

    match cmd {
        Commands::ListSources => {
            let sources = ledger.sources()?;
            if sources.is_empty() {
                info("No sources defined.");
                return Ok(());
            }
            let mut table = Table::new(vec![Column::right("Id", 4), Column::left("Source", 20)]);
            for s in sources {
                table.add_row(vec![s.id.to_string(), s.name]);
            }
            print!("{}", table.render());
        }
        Commands::AddSource { name } => {
            let source = ledger.add_source(name)?;
            success(format!("Source '{}' added (id {}).", source.name, source.id));
        }
        Commands::ListTypes => {
            let categories = ledger.categories()?;
            if categories.is_empty() {
                info("No types defined.");
                return Ok(());
            }
            let mut table = Table::new(vec![
                Column::right("Id", 4),
                Column::left("Type", 16),
                Column::right("Order", 5),
            ]);
            for c in categories {
                table.add_row(vec![c.id.to_string(), c.name, c.sort_order.to_string()]);
            }
            print!("{}", table.render());
        }
        Commands::AddType { name, sort_order } => {
            let category = ledger.add_category(name, *sort_order)?;
            success(format!(
                "Type '{}' added (id {}, order {}).",
                category.name, category.id, category.sort_order
            ));
        }
        _ => {}
    }

    Ok(())
}
