use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::core::report::create_report;
use crate::errors::AppResult;
use crate::models::reading::LB_PER_KG;
use crate::ui::messages::{header, info};
use crate::utils::date::parse_optional;
use crate::utils::formatting::{bold, pad_left};
use crate::utils::table::{Column, Table};
use crate::utils::{format_kg, format_lb};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report { source, start, end } = cmd {
        let start = parse_optional(start.as_deref())?;
        let end = parse_optional(end.as_deref())?;

        let ledger = Ledger::open(&cfg.database)?;
        let report = create_report(&ledger, source, start, end)?;

        header(format!("{}: {} to {}", report.source, report.start, report.end));

        if report.is_empty() {
            info("No entries in this range.");
            return Ok(());
        }

        let width = report
            .category_totals
            .iter()
            .map(|t| t.category.len())
            .max()
            .unwrap_or(0)
            .max(5);

        for t in &report.category_totals {
            println!(
                "{}  {}",
                pad_left(&t.category, width),
                pad_left(&format_lb(t.total_lb), 12)
            );
        }
        println!(
            "{}  {}  ({})\n",
            bold(&pad_left("Total", width)),
            bold(&pad_left(&format_lb(report.overall_total), 12)),
            format_kg(report.overall_total / LB_PER_KG)
        );

        let mut table = Table::new(vec![
            Column::left("Timestamp", 19),
            Column::right("Weight lb", 9),
            Column::left("Type", 12),
        ]);
        for row in &report.rows {
            table.add_row(vec![
                row.timestamp_str(),
                format!("{:.2}", row.weight_lb),
                row.category.clone(),
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
