use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{RESET, color_for_action};
use crate::utils::table::{Column, Table};
use std::collections::HashSet;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { all } = cmd {
        let ledger = Ledger::open(&cfg.database)?;
        let entries = ledger.list_active(*all)?;

        if entries.is_empty() {
            info("No entries.");
            return Ok(());
        }

        let cancelled: HashSet<i64> = entries.iter().filter_map(|e| e.cancels).collect();

        let mut table = Table::new(vec![
            Column::right("Id", 5),
            Column::left("Timestamp", 19),
            Column::right("Weight lb", 9),
            Column::left("Type", 12),
            Column::left("Source", 16),
            Column::left("Action", 6),
        ]);
        for e in &entries {
            table.add_row(vec![
                e.id.to_string(),
                e.timestamp_str(),
                format!("{:.2}", e.weight_lb),
                e.category.clone(),
                e.source.clone(),
                e.action.to_db_str().to_string(),
            ]);
        }

        // colour whole lines; the table itself stays plain text
        let rendered = table.render();
        let mut lines = rendered.lines();
        for line in lines.by_ref().take(2) {
            println!("{line}");
        }
        for (line, e) in lines.zip(&entries) {
            let color = color_for_action(e.action.is_delete(), cancelled.contains(&e.id));
            println!("{color}{line}{RESET}");
        }
    }

    Ok(())
}
