//! Migration framework
//!
//! Provides:
//! - The transactional runner ([`Migrator`], [`run`], [`run_dir`])
//! - Read-only planning ([`plan`])
//! - The persisted version slot ([`VersionStore`], [`UserVersion`])

mod runner;
mod version;

pub use runner::{plan, run, run_dir, Migrator, RunReport};
pub use version::{UserVersion, VersionStore};
