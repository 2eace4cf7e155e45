//! Migration runner
//!
//! Applies pending migrations in one transaction and advances the stored
//! version in that same transaction.

use crate::errors::{commit, migration_exec, migration_read, transaction_begin, Result};
use crate::migrations::version::{UserVersion, VersionStore};
use migrator_core::discover;
use migrator_core::errors::MigratorError;
use migrator_core::events::{EventSink, RunEvent, TracingSink};
use migrator_core::model::{MigrationFile, Version};
use migrator_core::plan::MigrationPlan;
use migrator_core::source::{DirSource, MigrationSource};
use migrator_core_types::RunId;
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run_id: RunId,
    /// Version found in the database before the run
    pub from: Version,
    /// Version stored after the run
    pub to: Version,
    /// Names of the migrations applied by this run, in order
    pub applied: Vec<String>,
}

impl RunReport {
    /// Whether the database was already up to date
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Configured migration run over one source
///
/// Events go to [`TracingSink`] and the version lives in
/// `PRAGMA user_version` unless overridden.
///
/// # Example
///
/// ```
/// use migrator_core::events::MemorySink;
/// use migrator_core::source::MemorySource;
/// use migrator_store::Migrator;
///
/// let source = MemorySource::new()
///     .with_file("0001.sql", "create table test(id integer)")
///     .with_file("0002.sql", "insert into test values (1)");
/// let sink = MemorySink::new();
///
/// let mut conn = rusqlite::Connection::open_in_memory().unwrap();
/// let report = Migrator::new(&source).with_sink(&sink).run(&mut conn).unwrap();
///
/// assert_eq!(report.to, 2);
/// assert_eq!(report.applied, vec!["0001.sql", "0002.sql"]);
/// ```
pub struct Migrator<'a> {
    source: &'a dyn MigrationSource,
    sink: &'a dyn EventSink,
    versions: &'a dyn VersionStore,
}

impl<'a> Migrator<'a> {
    pub fn new(source: &'a dyn MigrationSource) -> Self {
        Self {
            source,
            sink: &TracingSink,
            versions: &UserVersion,
        }
    }

    /// Send run events to `sink` instead of `tracing`
    pub fn with_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.sink = sink;
        self
    }

    /// Store the version somewhere other than `PRAGMA user_version`
    pub fn with_version_store(mut self, versions: &'a dyn VersionStore) -> Self {
        self.versions = versions;
        self
    }

    /// Discover migrations and validate the stored version, without writing
    ///
    /// # Errors
    ///
    /// - [`MigratorError::Discovery`] / [`MigratorError::DuplicateMigration`] from discovery
    /// - [`MigratorError::NoMigrations`] if the source holds no `.sql` files;
    ///   the version slot is not read in that case
    /// - [`MigratorError::VersionRead`] / [`MigratorError::InvalidVersion`]
    pub fn plan(&self, conn: &Connection) -> Result<MigrationPlan> {
        let set = discover(self.source)?;
        if set.is_empty() {
            return Err(MigratorError::NoMigrations);
        }
        let stored = self.versions.read(conn)?;
        MigrationPlan::new(set, stored)
    }

    /// Apply every pending migration and advance the stored version
    ///
    /// Either all pending migrations and the new version commit together, or
    /// nothing is persisted. Re-running after success is a no-op.
    ///
    /// # Errors
    ///
    /// Every [`MigratorError`] except `Database`. Failures from
    /// `MigrationRead` onward happen inside the transaction, which is rolled
    /// back before this returns.
    pub fn run(&self, conn: &mut Connection) -> Result<RunReport> {
        let run_id = RunId::new();
        let started = Instant::now();

        self.sink.emit(&RunEvent::Started {
            run_id: run_id.clone(),
            source: self.source.describe(),
        });

        self.execute(conn, &run_id, started).map_err(|error| {
            self.sink.emit(&RunEvent::Failed {
                run_id: run_id.clone(),
                error: error.clone(),
                duration_ms: elapsed_ms(started),
            });
            error
        })
    }

    fn execute(
        &self,
        conn: &mut Connection,
        run_id: &RunId,
        started: Instant,
    ) -> Result<RunReport> {
        let plan = self.plan(conn)?;
        let (from, to) = (plan.current(), plan.latest());

        self.sink.emit(&RunEvent::Checked {
            run_id: run_id.clone(),
            current: from,
            latest: to,
        });

        if plan.is_up_to_date() {
            self.sink.emit(&RunEvent::UpToDate {
                run_id: run_id.clone(),
                version: to,
            });
            return Ok(RunReport {
                run_id: run_id.clone(),
                from,
                to,
                applied: Vec::new(),
            });
        }

        // Every early return below drops `tx`, which rolls it back
        let tx = conn.transaction().map_err(transaction_begin)?;

        let mut applied = Vec::with_capacity(plan.pending().len());
        for (version, migration) in (from + 1..).zip(plan.pending()) {
            self.sink.emit(&RunEvent::Applying {
                run_id: run_id.clone(),
                name: migration.name().to_string(),
                version,
            });

            let sql = self.load(migration)?;
            tx.execute_batch(&sql)
                .map_err(|e| migration_exec(migration.name(), e))?;
            applied.push(migration.name().to_string());
        }

        self.versions.write(&tx, to)?;
        self.sink.emit(&RunEvent::VersionWritten {
            run_id: run_id.clone(),
            version: to,
        });

        tx.commit().map_err(commit)?;
        self.sink.emit(&RunEvent::Committed {
            run_id: run_id.clone(),
            from,
            to,
            duration_ms: elapsed_ms(started),
        });

        Ok(RunReport {
            run_id: run_id.clone(),
            from,
            to,
            applied,
        })
    }

    fn load(&self, migration: &MigrationFile) -> Result<String> {
        let bytes = migration
            .load(self.source)
            .map_err(|e| migration_read(migration.name(), e))?;
        String::from_utf8(bytes).map_err(|e| migration_read(migration.name(), e))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Apply all pending migrations from `source`, returning the new version
pub fn run(conn: &mut Connection, source: &dyn MigrationSource) -> Result<Version> {
    Migrator::new(source).run(conn).map(|report| report.to)
}

/// Apply all pending migrations found under the directory `dir`
pub fn run_dir<P: AsRef<Path>>(conn: &mut Connection, dir: P) -> Result<Version> {
    run(conn, &DirSource::new(dir.as_ref()))
}

/// Report the stored version and pending migrations without applying them
pub fn plan(conn: &Connection, source: &dyn MigrationSource) -> Result<MigrationPlan> {
    Migrator::new(source).plan(conn)
}
