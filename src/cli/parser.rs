use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for scalelog
/// CLI application to log donation weighings with SQLite
#[derive(Parser)]
#[command(
    name = "scalelog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Log donation weighings from a USB scale and report per-source totals using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Record a weight entered by hand (pounds)
    Log {
        /// Weight in pounds
        #[arg(long, short = 'w')]
        weight: f64,

        /// Donation type (e.g. Produce, Dry)
        #[arg(long = "type", short = 't')]
        category: String,

        /// Donation source
        #[arg(long, short = 's')]
        source: String,
    },

    /// Read the scale and record the current weight
    Weigh {
        /// Donation type (e.g. Produce, Dry)
        #[arg(long = "type", short = 't')]
        category: String,

        /// Donation source
        #[arg(long, short = 's')]
        source: String,

        /// Seconds to wait for a usable reading (default from config)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Mark the most recent active record as deleted
    DeleteLast,

    /// Undo the most recent delete
    UndeleteLast,

    /// Show per-type totals for one source over a date range
    Report {
        /// Donation source
        #[arg(long, short = 's')]
        source: String,

        /// First day (YYYY-MM-DD), default today
        #[arg(long)]
        start: Option<String>,

        /// Last day (YYYY-MM-DD), default the start day
        #[arg(long)]
        end: Option<String>,
    },

    /// Export a report to CSV or JSON
    Export {
        /// Donation source
        #[arg(long, short = 's', required_unless_present = "all_sources")]
        source: Option<String>,

        /// Export every source with entries in the range, one file each
        #[arg(long = "all-sources", conflicts_with_all = ["source", "file"], requires = "dir")]
        all_sources: bool,

        /// First day (YYYY-MM-DD), default today
        #[arg(long)]
        start: Option<String>,

        /// Last day (YYYY-MM-DD), default the start day
        #[arg(long)]
        end: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Destination file
        #[arg(long, required_unless_present = "all_sources")]
        file: Option<String>,

        /// Destination directory for --all-sources
        #[arg(long, requires = "all_sources")]
        dir: Option<String>,

        /// Overwrite existing files without asking
        #[arg(long)]
        force: bool,
    },

    /// List known donation sources
    ListSources,

    /// Add a donation source
    AddSource {
        /// Source name
        #[arg(long)]
        name: String,
    },

    /// List known donation types
    ListTypes,

    /// Add a donation type
    AddType {
        /// Type name
        #[arg(long)]
        name: String,

        /// Position in type listings (default: after the last one)
        #[arg(long = "sort-order")]
        sort_order: Option<i64>,
    },

    /// Show ledger entries, newest first
    Show {
        /// Include deleted records and delete rows
        #[arg(long)]
        all: bool,
    },

    /// Print the internal audit log
    Audit {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Backup the database
    Backup {
        /// Destination file
        #[arg(long)]
        file: String,

        /// Compress the backup into a .zip archive
        #[arg(long)]
        compress: bool,

        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}
