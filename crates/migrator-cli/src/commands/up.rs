//! Apply pending migrations
//!
//! Usage: migrator up --db <PATH> [--dir <DIR>]

use super::TargetArgs;
use clap::Args;
use migrator_core::source::DirSource;
use migrator_store::db::{self, ConnectionOptions};
use migrator_store::Migrator;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct UpArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// How long to wait for a lock held by another connection
    #[arg(long, default_value_t = 5000)]
    pub busy_timeout_ms: u64,

    /// Leave foreign key enforcement off while migrating
    #[arg(long)]
    pub no_foreign_keys: bool,
}

/// Execute up command
pub fn execute(args: UpArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = args.target.db.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut conn = db::open(&args.target.db)?;
    db::configure(
        &conn,
        &ConnectionOptions {
            foreign_keys: !args.no_foreign_keys,
            busy_timeout: Duration::from_millis(args.busy_timeout_ms),
        },
    )?;

    let source = DirSource::new(&args.target.dir);
    let report = Migrator::new(&source).run(&mut conn).map_err(|e| {
        if e.kind().is_apply_phase() {
            eprintln!("All pending migrations were rolled back");
        }
        e
    })?;

    if report.is_noop() {
        println!("✓ Database up to date at version {}", report.to);
    } else {
        for name in &report.applied {
            println!("Applied {}", name);
        }
        println!(
            "✓ Migrated from version {} to {} ({} applied)",
            report.from,
            report.to,
            report.applied.len()
        );
    }

    Ok(())
}
