use serde::Serialize;

use crate::domain::{
    entities::system_logs::LogEntry,
    value_objects::{pagination::PageMeta, timeline::TimelineChart},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub info: i64,
    pub warning: i64,
    pub error: i64,
    pub debug: i64,
}

/// Counts over a full filtered set. `total == info + warning + error + debug + other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogStats {
    pub total: i64,
    pub info: i64,
    pub warning: i64,
    pub error: i64,
    pub debug: i64,
    pub other: i64,
}

impl LogStats {
    pub fn from_counts(total: i64, counts: LevelCounts) -> Self {
        let known = counts.info + counts.warning + counts.error + counts.debug;
        let total = total.max(known);
        Self {
            total,
            info: counts.info,
            warning: counts.warning,
            error: counts.error,
            debug: counts.debug,
            other: total - known,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogPage {
    pub entries: Vec<LogEntry>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// A log entry as listed on screen, with its level badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntryView {
    #[serde(flatten)]
    pub entry: LogEntry,
    pub badge_class: &'static str,
}

impl From<LogEntry> for LogEntryView {
    fn from(entry: LogEntry) -> Self {
        Self {
            badge_class: entry.level.badge_class(),
            entry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogListView {
    pub entries: Vec<LogEntryView>,
    #[serde(flatten)]
    pub meta: PageMeta,
    pub stats: LogStats,
    pub chart: TimelineChart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurgeOutcome {
    pub retention_days: i64,
    pub deleted: usize,
}
