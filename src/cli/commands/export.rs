use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;
use crate::utils::date::parse_optional;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        source,
        all_sources,
        start,
        end,
        format,
        file,
        dir,
        force,
    } = cmd
    {
        let start = parse_optional(start.as_deref())?;
        let end = parse_optional(end.as_deref())?;

        let ledger = Ledger::open(&cfg.database)?;

        if *all_sources {
            let dir = dir.as_deref().unwrap_or(".");
            ExportLogic::export_all(&ledger, *format, dir, start, end, *force)?;
            return Ok(());
        }

        let (Some(source), Some(file)) = (source, file) else {
            return Err(AppError::Export(
                "--source and --file are required without --all-sources".into(),
            ));
        };
        ExportLogic::export(&ledger, *format, file, source, start, end, *force)?;
    }

    Ok(())
}
