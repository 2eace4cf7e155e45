//! Run events and sinks
//!
//! The runner reports progress as [`RunEvent`]s to an injected [`EventSink`]
//! instead of writing to a process-wide logger. [`TracingSink`] forwards them
//! to `tracing`; [`MemorySink`] keeps them for inspection; any
//! `Fn(&RunEvent)` closure is a sink as well.

use crate::errors::MigratorError;
use crate::model::Version;
use crate::{log_op_end, log_op_error, log_op_start, log_op_step};
use migrator_core_types::schema::{
    EVENT_APPLY, EVENT_CHECKED, EVENT_UP_TO_DATE, EVENT_VERSION_WRITE, OP_MIGRATE,
};
use migrator_core_types::RunId;
use std::sync::{Mutex, PoisonError};

/// Something that happened during a single migration run
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// A run began against the described source
    Started { run_id: RunId, source: String },
    /// Discovery, version read and validation succeeded
    Checked {
        run_id: RunId,
        current: Version,
        latest: Version,
    },
    /// Nothing to apply; no transaction was opened
    UpToDate { run_id: RunId, version: Version },
    /// A migration is about to execute; `version` is the version it completes
    Applying {
        run_id: RunId,
        name: String,
        version: Version,
    },
    /// The new version was written inside the transaction
    VersionWritten { run_id: RunId, version: Version },
    /// The transaction committed
    Committed {
        run_id: RunId,
        from: Version,
        to: Version,
        duration_ms: u64,
    },
    /// The run failed; any open transaction was rolled back
    Failed {
        run_id: RunId,
        error: MigratorError,
        duration_ms: u64,
    },
}

impl RunEvent {
    pub fn run_id(&self) -> &RunId {
        match self {
            RunEvent::Started { run_id, .. }
            | RunEvent::Checked { run_id, .. }
            | RunEvent::UpToDate { run_id, .. }
            | RunEvent::Applying { run_id, .. }
            | RunEvent::VersionWritten { run_id, .. }
            | RunEvent::Committed { run_id, .. }
            | RunEvent::Failed { run_id, .. } => run_id,
        }
    }

    /// Short, stable name of the event variant
    pub fn name(&self) -> &'static str {
        match self {
            RunEvent::Started { .. } => "started",
            RunEvent::Checked { .. } => "checked",
            RunEvent::UpToDate { .. } => "up_to_date",
            RunEvent::Applying { .. } => "applying",
            RunEvent::VersionWritten { .. } => "version_written",
            RunEvent::Committed { .. } => "committed",
            RunEvent::Failed { .. } => "failed",
        }
    }
}

/// Receiver of run events
pub trait EventSink {
    fn emit(&self, event: &RunEvent);
}

impl<F> EventSink for F
where
    F: Fn(&RunEvent),
{
    fn emit(&self, event: &RunEvent) {
        self(event)
    }
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &RunEvent) {}
}

/// Sink that forwards events to `tracing` using the canonical schema
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &RunEvent) {
        match event {
            RunEvent::Started { run_id, source } => {
                log_op_start!(OP_MIGRATE, run_id = %run_id, source = %source);
            }
            RunEvent::Checked {
                run_id,
                current,
                latest,
            } => {
                tracing::info!(
                    run_id = %run_id,
                    current_version = *current,
                    latest_version = *latest,
                    "current DB version: {}, latest version: {}",
                    current,
                    latest
                );
                log_op_step!(
                    OP_MIGRATE,
                    EVENT_CHECKED,
                    run_id = %run_id,
                    current_version = *current,
                    latest_version = *latest,
                );
            }
            RunEvent::UpToDate { run_id, version } => {
                tracing::info!(run_id = %run_id, version = *version, "database is up to date");
                log_op_step!(OP_MIGRATE, EVENT_UP_TO_DATE, run_id = %run_id, version = *version);
            }
            RunEvent::Applying {
                run_id,
                name,
                version,
            } => {
                tracing::info!(run_id = %run_id, migration = %name, "running migration {}", name);
                log_op_step!(
                    OP_MIGRATE,
                    EVENT_APPLY,
                    run_id = %run_id,
                    migration = %name,
                    version = *version,
                );
            }
            RunEvent::VersionWritten { run_id, version } => {
                log_op_step!(
                    OP_MIGRATE,
                    EVENT_VERSION_WRITE,
                    run_id = %run_id,
                    version = *version,
                );
            }
            RunEvent::Committed {
                run_id,
                from,
                to,
                duration_ms,
            } => {
                log_op_end!(
                    OP_MIGRATE,
                    duration_ms = *duration_ms,
                    run_id = %run_id,
                    current_version = *from,
                    latest_version = *to,
                );
            }
            RunEvent::Failed {
                run_id,
                error,
                duration_ms,
            } => {
                log_op_error!(
                    OP_MIGRATE,
                    *error,
                    duration_ms = *duration_ms,
                    run_id = %run_id,
                    rolled_back = error.kind().is_apply_phase(),
                );
            }
        }
    }
}

/// Sink that records every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<RunEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Variant names of the recorded events, in order
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(RunEvent::name).collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &RunEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
