//! Migrator CLI
//!
//! Command-line interface for applying SQL migrations to SQLite databases

use clap::{Parser, Subcommand, ValueEnum};
use migrator_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "migrator")]
#[command(about = "Apply versioned SQL migrations to SQLite databases", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(
        long,
        global = true,
        env = "MIGRATOR_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per line
    Json,
}

impl From<LogFormat> for Profile {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Up(commands::up::UpArgs),
    /// Show the current version and pending migrations
    Status(commands::status::StatusArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_format.into());

    let result = match cli.command {
        Commands::Up(args) => commands::up::execute(args),
        Commands::Status(args) => commands::status::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
