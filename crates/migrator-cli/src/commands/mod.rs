pub mod status;
pub mod up;

use clap::Args;
use std::path::PathBuf;

/// Database and migration directory shared by every command
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Path to the SQLite database
    #[arg(long, env = "MIGRATOR_DB")]
    pub db: PathBuf,

    /// Directory holding the *.sql migration files
    #[arg(long, env = "MIGRATOR_DIR", default_value = "migrations")]
    pub dir: PathBuf,
}
