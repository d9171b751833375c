use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for cil-tracker
/// CLI application to time CIL work sessions on production lines
#[derive(Parser)]
#[command(
    name = "cil-tracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track CIL (Cleaning, Inspection, Lubrication) sessions per line, leg and machine",
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

    /// Start a new CIL session and print its id
    Start {
        #[arg(long, help = "Production line, e.g. \"Star 1\"")]
        line: String,

        #[arg(long, help = "Leg of the line, e.g. \"Leg 3\"")]
        leg: String,

        #[arg(long, help = "Machine code, e.g. HRM")]
        machine: String,

        #[arg(long, help = "Operator name")]
        name: Option<String>,
    },

    /// Stop an open session
    Stop {
        /// Session id returned by `start`
        id: i64,

        #[arg(long = "abh", value_name = "N", help = "Number of abnormalities detected")]
        abh: Option<i64>,
    },

    /// Show a single session
    Show { id: i64 },

    /// List all sessions, most recent first
    List,

    /// Purge sessions older than the retention window
    Cleanup {
        #[arg(long, value_name = "N", help = "Retention in days (default from config)")]
        days: Option<i64>,
    },

    /// Export completed sessions of a date range
    Export {
        #[arg(long = "from", value_name = "YYYY-MM-DD")]
        from: String,

        #[arg(long = "to", value_name = "YYYY-MM-DD")]
        to: String,

        #[arg(long, value_enum, default_value = "excel")]
        format: ExportFormat,

        #[arg(long = "out", value_name = "DIR", help = "Output directory (default: current)")]
        out: Option<String>,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Print the line catalogue
    Lines,

    /// Run the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

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

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

impl Commands {
    /// Commands that read or write sessions run the retention sweep first.
    pub fn touches_sessions(&self) -> bool {
        matches!(
            self,
            Commands::Start { .. }
                | Commands::Stop { .. }
                | Commands::Show { .. }
                | Commands::List
                | Commands::Export { .. }
        )
    }
}
