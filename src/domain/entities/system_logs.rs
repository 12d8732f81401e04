use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::log_levels::LogLevel,
    infrastructure::postgres::schema::system_logs,
};

pub const SYSTEM_USER: &str = "system";

/// A single application or security event as shown on the admin log screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub user: String,
    pub action: String,
    pub ip_address: Option<String>,
    pub details: String,
    pub stack_trace: Option<String>,
    pub category: Option<String>,
}

/// Raw row. Level stays text here and is coerced into [`LogLevel`] on conversion.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = system_logs)]
pub struct LogRow {
    pub id: Uuid,
    pub logged_at: DateTime<Utc>,
    pub level: String,
    pub username: String,
    pub action: String,
    pub ip_address: Option<String>,
    pub details: String,
    pub stack_trace: Option<String>,
    pub category: Option<String>,
}

impl From<LogRow> for LogEntry {
    fn from(value: LogRow) -> Self {
        let user = if value.username.trim().is_empty() {
            SYSTEM_USER.to_string()
        } else {
            value.username
        };

        Self {
            id: value.id,
            timestamp: value.logged_at,
            level: LogLevel::from_stored(&value.level),
            user,
            action: value.action,
            ip_address: value.ip_address,
            details: value.details,
            stack_trace: value.stack_trace,
            category: value.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(level: &str, username: &str) -> LogRow {
        LogRow {
            id: Uuid::new_v4(),
            logged_at: Utc::now(),
            level: level.to_string(),
            username: username.to_string(),
            action: "Login".to_string(),
            ip_address: None,
            details: String::new(),
            stack_trace: None,
            category: None,
        }
    }

    #[test]
    fn unknown_level_is_coerced_to_info() {
        let entry = LogEntry::from(row("critical", "alice"));
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.user, "alice");
    }

    #[test]
    fn blank_user_becomes_system() {
        let entry = LogEntry::from(row("error", "  "));
        assert_eq!(entry.level, LogLevel::Error);
        assert_eq!(entry.user, SYSTEM_USER);
    }
}
