use crate::domain::{
    entities::system_logs::LogEntry,
    value_objects::{enums::log_levels::LogLevel, time_windows::TimeWindow},
};

/// Conjunctive filter over system logs. Every `None` field is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilters {
    pub level: Option<LogLevel>,
    /// Case-insensitive substring match on the user name.
    pub user: Option<String>,
    pub category: Option<String>,
    pub window: TimeWindow,
}

impl LogFilters {
    pub fn narrowed_to(&self, window: &TimeWindow) -> Self {
        Self {
            window: self.window.intersect(window),
            ..self.clone()
        }
    }

    /// In-memory twin of the SQL predicate built by the Postgres repository.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(level) = self.level {
            if entry.level != level {
                return false;
            }
        }

        if let Some(user) = self.user.as_deref() {
            let needle = user.to_lowercase();
            if !entry.user.to_lowercase().contains(&needle) {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref() {
            if entry.category.as_deref() != Some(category) {
                return false;
            }
        }

        self.window.contains(entry.timestamp)
    }
}
