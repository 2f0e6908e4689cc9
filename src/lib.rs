//! scalelog library root.
//! Exposes the CLI parser, the high-level run() function, and the scale,
//! ledger, report and session modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod device;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use env_logger::Env;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Weigh { .. } => cli::commands::weigh::handle(&cli.command, cfg),
        Commands::DeleteLast | Commands::UndeleteLast => {
            cli::commands::delete::handle(&cli.command, cfg)
        }
        Commands::Report { .. } => cli::commands::report::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::ListSources
        | Commands::AddSource { .. }
        | Commands::ListTypes
        | Commands::AddType { .. } => cli::commands::catalog::handle(&cli.command, cfg),
        Commands::Show { .. } => cli::commands::show::handle(&cli.command, cfg),
        Commands::Audit { .. } => cli::commands::audit::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // RUST_LOG controls diagnostics; warnings and up by default
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("warn")).try_init();

    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(custom_db)
            .to_string_lossy()
            .to_string();
    }

    cfg.validate()?;
    log::debug!("using database {}", cfg.database);

    dispatch(&cli, &cfg)
}
