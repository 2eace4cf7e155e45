//! Migration status command
//!
//! Usage: migrator status --db <PATH> [--dir <DIR>] [--json]

use super::TargetArgs;
use clap::Args;
use migrator_core::source::DirSource;
use migrator_core::MigrationPlan;
use migrator_store::db;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    database: String,
    migrations: String,
    current_version: u32,
    latest_version: u32,
    up_to_date: bool,
    pending: Vec<String>,
}

impl StatusReport {
    fn new(args: &TargetArgs, plan: &MigrationPlan) -> Self {
        Self {
            database: args.db.display().to_string(),
            migrations: args.dir.display().to_string(),
            current_version: plan.current(),
            latest_version: plan.latest(),
            up_to_date: plan.is_up_to_date(),
            pending: plan
                .pending()
                .iter()
                .map(|m| m.name().to_string())
                .collect(),
        }
    }
}

/// Execute status command
pub fn execute(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = db::open_read_only(&args.target.db)?;
    let source = DirSource::new(&args.target.dir);
    let plan = migrator_store::plan(&conn, &source)?;
    let report = StatusReport::new(&args.target, &plan);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Database:        {}", report.database);
    println!("Migrations:      {}", report.migrations);
    println!("Current version: {}", report.current_version);
    println!("Latest version:  {}", report.latest_version);
    if report.up_to_date {
        println!("✓ Up to date");
    } else {
        println!("Pending ({}):", report.pending.len());
        for name in &report.pending {
            println!("  {}", name);
        }
    }

    Ok(())
}
