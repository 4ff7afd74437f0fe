//! The interaction log facade used by the session and the CLI.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use sylva_rules::Subsystem;

use super::store::write_atomic;
use super::{
    ActivityCounts, InteractionRecord, JsonFileStore, LogState, LogStats, LogStore, SubsystemTag,
    TIMESTAMP_FORMAT,
};
use crate::error::MemoryError;

const EXPORT_NOTE: &str = "SYLVA symbolic interaction memory export";

/// Bounded, persisted history of interactions.
///
/// Every operation reloads the store, so concurrent writers follow
/// last-writer-wins. Read operations never write. `record` never fails:
/// an unreadable store is replaced by a fresh log and save errors are
/// logged and dropped.
pub struct InteractionLog<S: LogStore> {
    store: S,
    max_entries: usize,
}

impl InteractionLog<JsonFileStore> {
    /// Open a JSON log file at `path`.
    pub fn at_path(path: impl AsRef<Path>, max_entries: usize) -> Self {
        Self::open(JsonFileStore::new(path.as_ref()), max_entries)
    }
}

impl<S: LogStore> InteractionLog<S> {
    /// Wrap a store, creating an empty log if nothing is stored yet.
    pub fn open(mut store: S, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        match store.load() {
            Ok(Some(_)) => {}
            Ok(None) => {
                log::debug!("[memory] initializing log at {}", store.location());
                if let Err(e) = store.save(&LogState::fresh(now())) {
                    log::warn!("[memory] could not initialize {}: {}", store.location(), e);
                }
            }
            Err(e) => {
                log::warn!(
                    "[memory] {} is unreadable, it will be replaced on the next write: {}",
                    store.location(),
                    e
                );
            }
        }
        Self { store, max_entries }
    }

    /// Retention bound, at least 1.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Where the store keeps the log.
    pub fn location(&self) -> String {
        self.store.location()
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append an interaction stamped with the current local time.
    pub fn record(
        &mut self,
        user_input: &str,
        response: &str,
        subsystem: Subsystem,
    ) -> InteractionRecord {
        self.record_at(user_input, response, subsystem, now())
    }

    /// Append an interaction stamped with `at`.
    pub fn record_at(
        &mut self,
        user_input: &str,
        response: &str,
        subsystem: Subsystem,
        at: NaiveDateTime,
    ) -> InteractionRecord {
        let mut state = match self.store.load() {
            Ok(Some(state)) => state,
            Ok(None) => LogState::fresh(at),
            Err(e) => {
                log::warn!(
                    "[memory] reinitializing unreadable log {}: {}",
                    self.store.location(),
                    e
                );
                LogState::fresh(at)
            }
        };

        let record = InteractionRecord::new(user_input, response, subsystem, at);
        state.push(record.clone(), self.max_entries);

        if let Err(e) = self.store.save(&state) {
            log::warn!("[memory] interaction not persisted: {}", e);
        }
        record
    }

    /// Up to the last `n` records, oldest first.
    pub fn recent(&self, n: usize) -> Vec<InteractionRecord> {
        self.snapshot().recent(n).to_vec()
    }

    /// Per-subsystem counts; always holds all three subsystems.
    pub fn activity(&self) -> ActivityCounts {
        self.snapshot().subsystem_activity
    }

    /// Number of stored records.
    pub fn interaction_count(&self) -> usize {
        self.snapshot().len()
    }

    /// Summary of the stored log.
    pub fn stats(&self) -> LogStats {
        self.snapshot().stats(self.store.size_bytes())
    }

    /// Subsystem labels per day for the last `days` days.
    pub fn patterns(&self, days: u32) -> BTreeMap<String, Vec<SubsystemTag>> {
        self.patterns_at(days, Local::now().date_naive())
    }

    /// `patterns` with an explicit current date.
    pub fn patterns_at(&self, days: u32, today: NaiveDate) -> BTreeMap<String, Vec<SubsystemTag>> {
        self.snapshot().patterns(days, today)
    }

    /// Replace the log with an empty one.
    pub fn clear(&mut self) -> Result<(), MemoryError> {
        self.store.save(&LogState::cleared(now()))?;
        log::info!("[memory] cleared {}", self.store.location());
        Ok(())
    }

    /// Write the log, with export metadata, to `path`.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<usize, MemoryError> {
        let at = now();
        let state = self.store.load()?.unwrap_or_else(|| LogState::fresh(at));
        let document = ExportDocument {
            export_metadata: ExportMetadata {
                exported_at: at.format(TIMESTAMP_FORMAT).to_string(),
                total_interactions: state.len(),
                subsystem_activity: state.subsystem_activity.clone(),
                export_note: EXPORT_NOTE,
            },
            state: &state,
        };

        let json = serde_json::to_string_pretty(&document)?;
        write_atomic(path.as_ref(), json.as_bytes())?;
        log::info!(
            "[memory] exported {} interactions to {}",
            state.len(),
            path.as_ref().display()
        );
        Ok(state.len())
    }

    /// Current contents, or an empty log if the store is missing or unreadable.
    pub fn snapshot(&self) -> LogState {
        match self.store.load() {
            Ok(Some(state)) => state,
            Ok(None) => LogState::fresh(now()),
            Err(e) => {
                log::warn!("[memory] reading {}: {}", self.store.location(), e);
                LogState::fresh(now())
            }
        }
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    #[serde(flatten)]
    state: &'a LogState,
    export_metadata: ExportMetadata,
}

#[derive(Serialize)]
struct ExportMetadata {
    exported_at: String,
    total_interactions: usize,
    subsystem_activity: ActivityCounts,
    export_note: &'static str,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
