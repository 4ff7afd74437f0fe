//! In-memory log state and the pure operations that keep it consistent.
//!
//! Nothing in here touches the filesystem; persistence lives in
//! [`super::LogStore`].

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use sylva_rules::Subsystem;

use super::{InteractionRecord, SubsystemTag, TIMESTAMP_FORMAT};

/// Version written to new log files.
pub const SCHEMA_VERSION: &str = "2.0";

const DESCRIPTION: &str = "SYLVA interaction memory log with subsystem tracking";

/// Per-subsystem interaction counts. Always holds all three subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ActivityCounts(BTreeMap<Subsystem, u64>);

impl Default for ActivityCounts {
    fn default() -> Self {
        Self(Subsystem::ALL.iter().map(|s| (*s, 0)).collect())
    }
}

impl ActivityCounts {
    /// Count the canonical subsystems among `records`.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a InteractionRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            if let Some(subsystem) = record.subsystem.known() {
                counts.increment(subsystem);
            }
        }
        counts
    }

    /// Count for one subsystem.
    pub fn get(&self, subsystem: Subsystem) -> u64 {
        self.0.get(&subsystem).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, subsystem: Subsystem) {
        *self.0.entry(subsystem).or_default() += 1;
    }

    /// Sum over all subsystems.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Counts in MARROW, ROOT, AURA order.
    pub fn iter(&self) -> impl Iterator<Item = (Subsystem, u64)> + '_ {
        Subsystem::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// First subsystem holding the highest count, or `None` if every count is zero.
    pub fn most_active(&self) -> Option<Subsystem> {
        let mut best: Option<(Subsystem, u64)> = None;
        for (subsystem, count) in self.iter() {
            if count > 0 && best.map_or(true, |(_, max)| count > max) {
                best = Some((subsystem, count));
            }
        }
        best.map(|(s, _)| s)
    }
}

/// Header of the log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMetadata {
    #[serde(default)]
    pub created: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "subsystem_descriptions")]
    pub subsystems: BTreeMap<String, String>,
}

impl LogMetadata {
    fn new(now: NaiveDateTime, description: impl Into<String>) -> Self {
        Self {
            created: now.format(TIMESTAMP_FORMAT).to_string(),
            version: SCHEMA_VERSION.to_string(),
            description: description.into(),
            subsystems: subsystem_descriptions(),
        }
    }
}

impl Default for LogMetadata {
    fn default() -> Self {
        Self {
            created: String::new(),
            version: default_version(),
            description: DESCRIPTION.to_string(),
            subsystems: subsystem_descriptions(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn subsystem_descriptions() -> BTreeMap<String, String> {
    Subsystem::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), s.description().to_string()))
        .collect()
}

/// The complete contents of the log file.
///
/// Stored activity counts are ignored on read and recomputed by
/// [`LogState::recompute_activity`], so a loaded state always satisfies the
/// count invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogState {
    #[serde(default)]
    pub metadata: LogMetadata,

    #[serde(default)]
    pub interactions: Vec<InteractionRecord>,

    #[serde(default, skip_deserializing)]
    pub subsystem_activity: ActivityCounts,
}

/// Aggregate view over the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogStats {
    pub total_interactions: usize,
    pub unique_sessions: usize,
    pub subsystem_activity: ActivityCounts,
    /// `None` when nothing has been logged toward any subsystem.
    pub most_active_subsystem: Option<Subsystem>,
    pub memory_file_size: u64,
    pub created_date: String,
    pub version: String,
}

impl LogState {
    /// A new, empty log created at `now`.
    pub fn fresh(now: NaiveDateTime) -> Self {
        Self {
            metadata: LogMetadata::new(now, DESCRIPTION),
            interactions: Vec::new(),
            subsystem_activity: ActivityCounts::default(),
        }
    }

    /// An empty log that replaces a cleared one.
    pub fn cleared(now: NaiveDateTime) -> Self {
        Self {
            metadata: LogMetadata::new(now, format!("{} (cleared)", DESCRIPTION)),
            ..Self::fresh(now)
        }
    }

    /// Append a record and count it.
    pub fn append_record(&mut self, record: InteractionRecord) {
        if let Some(subsystem) = record.subsystem.known() {
            self.subsystem_activity.increment(subsystem);
        }
        self.interactions.push(record);
    }

    /// Keep only the newest `max_entries` records. Returns true if any were
    /// dropped, in which case activity is recounted from the survivors.
    pub fn truncate(&mut self, max_entries: usize) -> bool {
        if self.interactions.len() <= max_entries {
            return false;
        }
        let excess = self.interactions.len() - max_entries;
        self.interactions.drain(..excess);
        self.recompute_activity();
        true
    }

    /// Rebuild activity counts from the retained records.
    pub fn recompute_activity(&mut self) {
        self.subsystem_activity = ActivityCounts::from_records(&self.interactions);
    }

    /// Append then enforce the retention bound.
    pub fn push(&mut self, record: InteractionRecord, max_entries: usize) {
        self.append_record(record);
        self.truncate(max_entries);
    }

    /// Up to the last `n` records, oldest first.
    pub fn recent(&self, n: usize) -> &[InteractionRecord] {
        let start = self.interactions.len().saturating_sub(n);
        &self.interactions[start..]
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Summary for the `stats` view.
    pub fn stats(&self, memory_file_size: u64) -> LogStats {
        let sessions: HashSet<&str> = self
            .interactions
            .iter()
            .map(|r| r.session_key())
            .collect();

        LogStats {
            total_interactions: self.interactions.len(),
            unique_sessions: sessions.len(),
            subsystem_activity: self.subsystem_activity.clone(),
            most_active_subsystem: if self.interactions.is_empty() {
                None
            } else {
                self.subsystem_activity.most_active()
            },
            memory_file_size,
            created_date: if self.metadata.created.is_empty() {
                "unknown".to_string()
            } else {
                self.metadata.created.clone()
            },
            version: self.metadata.version.clone(),
        }
    }

    /// Subsystem sequence per calendar day (`YYYY-MM-DD`) for records on or
    /// after midnight `days` days before `today`. Unparseable timestamps are skipped.
    pub fn patterns(&self, days: u32, today: NaiveDate) -> BTreeMap<String, Vec<SubsystemTag>> {
        let cutoff = today
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MIN)
            .and_time(NaiveTime::MIN);
        let mut patterns: BTreeMap<String, Vec<SubsystemTag>> = BTreeMap::new();

        for record in &self.interactions {
            let Some(at) = record.recorded_at() else {
                continue;
            };
            if at >= cutoff {
                patterns
                    .entry(at.format("%Y-%m-%d").to_string())
                    .or_default()
                    .push(record.subsystem.clone());
            }
        }

        patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn record(subsystem: Subsystem, d: u32, second: u32) -> InteractionRecord {
        let at = day(d).and_hms_opt(10, 0, second).unwrap();
        InteractionRecord::new(format!("input {}", second), "reply", subsystem, at)
    }

    fn foreign(label: &str) -> InteractionRecord {
        InteractionRecord {
            subsystem: SubsystemTag::Other(label.to_string()),
            ..record(Subsystem::Root, 1, 0)
        }
    }

    #[test]
    fn test_fresh_state() {
        let state = LogState::fresh(day(1).and_hms_opt(9, 0, 0).unwrap());
        assert!(state.is_empty());
        assert_eq!(state.metadata.version, SCHEMA_VERSION);
        assert_eq!(state.metadata.subsystems.len(), 3);
        assert_eq!(state.subsystem_activity, ActivityCounts::default());
    }

    #[test]
    fn test_append_counts_known_subsystems_only() {
        let mut state = LogState::fresh(day(1).and_hms_opt(9, 0, 0).unwrap());
        state.append_record(record(Subsystem::Marrow, 1, 1));
        state.append_record(record(Subsystem::Root, 1, 2));
        state.append_record(record(Subsystem::Marrow, 1, 3));
        state.append_record(foreign("EMBER"));

        assert_eq!(state.subsystem_activity.get(Subsystem::Marrow), 2);
        assert_eq!(state.subsystem_activity.get(Subsystem::Root), 1);
        assert_eq!(state.subsystem_activity.get(Subsystem::Aura), 0);
        assert_eq!(state.len(), 4);
    }

    #[test]
    fn test_truncate_recounts_survivors() {
        let mut state = LogState::fresh(day(1).and_hms_opt(9, 0, 0).unwrap());
        state.push(record(Subsystem::Aura, 1, 0), 3);
        state.push(record(Subsystem::Marrow, 1, 1), 3);
        state.push(record(Subsystem::Marrow, 1, 2), 3);
        state.push(record(Subsystem::Root, 1, 3), 3);

        assert_eq!(state.len(), 3);
        assert_eq!(state.interactions[0].user_input, "input 1");
        assert_eq!(state.subsystem_activity.get(Subsystem::Aura), 0);
        assert_eq!(state.subsystem_activity.get(Subsystem::Marrow), 2);
        assert_eq!(state.subsystem_activity.get(Subsystem::Root), 1);
        assert!(!state.truncate(3));
    }

    #[test]
    fn test_recent_window() {
        let mut state = LogState::fresh(day(1).and_hms_opt(9, 0, 0).unwrap());
        assert!(state.recent(5).is_empty());

        for second in 0..4 {
            state.append_record(record(Subsystem::Root, 1, second));
        }

        let recent = state.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user_input, "input 2");
        assert_eq!(recent[1].user_input, "input 3");
        assert_eq!(state.recent(10).len(), 4);
        assert!(state.recent(0).is_empty());
    }

    #[test]
    fn test_stats_on_empty_log() {
        let state = LogState::fresh(day(1).and_hms_opt(9, 0, 0).unwrap());
        let stats = state.stats(0);

        assert_eq!(stats.total_interactions, 0);
        assert_eq!(stats.unique_sessions, 0);
        assert_eq!(stats.most_active_subsystem, None);
        assert_eq!(stats.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_stats_most_active_and_sessions() {
        let mut state = LogState::fresh(day(1).and_hms_opt(9, 0, 0).unwrap());
        state.append_record(record(Subsystem::Aura, 1, 0));
        state.append_record(record(Subsystem::Root, 2, 0));
        state.append_record(record(Subsystem::Aura, 2, 1));

        let stats = state.stats(128);
        assert_eq!(stats.total_interactions, 3);
        assert_eq!(stats.unique_sessions, 2);
        assert_eq!(stats.most_active_subsystem, Some(Subsystem::Aura));
        assert_eq!(stats.memory_file_size, 128);
    }

    #[test]
    fn test_most_active_tie_takes_first() {
        let mut counts = ActivityCounts::default();
        counts.increment(Subsystem::Aura);
        counts.increment(Subsystem::Root);
        assert_eq!(counts.most_active(), Some(Subsystem::Root));
        assert_eq!(ActivityCounts::default().most_active(), None);
    }

    #[test]
    fn test_stored_activity_is_ignored_on_read() {
        let json = r#"{
            "interactions": [{"subsystem": "AURA"}, {"subsystem": "UNKNOWN"}],
            "subsystem_activity": {"MARROW": 99, "LEGACY": 4}
        }"#;
        let mut state: LogState = serde_json::from_str(json).unwrap();
        state.recompute_activity();

        assert_eq!(state.subsystem_activity.get(Subsystem::Marrow), 0);
        assert_eq!(state.subsystem_activity.get(Subsystem::Aura), 1);
        assert_eq!(state.metadata.version, "1.0");
    }

    #[test]
    fn test_activity_serializes_all_keys() {
        let value = serde_json::to_value(ActivityCounts::default()).unwrap();
        assert_eq!(value, serde_json::json!({"MARROW": 0, "ROOT": 0, "AURA": 0}));
    }

    #[test]
    fn test_patterns_group_by_day() {
        let mut state = LogState::fresh(day(1).and_hms_opt(9, 0, 0).unwrap());
        state.append_record(record(Subsystem::Root, 1, 0));
        state.append_record(record(Subsystem::Marrow, 8, 0));
        state.append_record(record(Subsystem::Aura, 8, 1));
        state.append_record(InteractionRecord {
            timestamp: "not a time".to_string(),
            ..record(Subsystem::Aura, 9, 0)
        });

        let patterns = state.patterns(7, day(10));
        assert_eq!(patterns.len(), 1);
        assert_eq!(
            patterns["2024-05-08"],
            vec![
                SubsystemTag::Known(Subsystem::Marrow),
                SubsystemTag::Known(Subsystem::Aura)
            ]
        );
    }

    #[test]
    fn test_cleared_state_is_marked() {
        let state = LogState::cleared(day(1).and_hms_opt(9, 0, 0).unwrap());
        assert!(state.metadata.description.ends_with("(cleared)"));
        assert!(state.is_empty());
    }
}
