use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::log_levels::FALLBACK_BADGE_CLASS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Success,
    Warning,
    Error,
    Info,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 4] = [
        ActivityStatus::Success,
        ActivityStatus::Warning,
        ActivityStatus::Error,
        ActivityStatus::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Success => "success",
            ActivityStatus::Warning => "warning",
            ActivityStatus::Error => "error",
            ActivityStatus::Info => "info",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim() {
            "success" => Some(ActivityStatus::Success),
            "warning" => Some(ActivityStatus::Warning),
            "error" => Some(ActivityStatus::Error),
            "info" => Some(ActivityStatus::Info),
            _ => None,
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            ActivityStatus::Success => "bg-success",
            ActivityStatus::Warning => "bg-warning",
            ActivityStatus::Error => "bg-danger",
            ActivityStatus::Info => "bg-info",
        }
    }
}

impl Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn activity_status_badge_class(raw: &str) -> &'static str {
    ActivityStatus::from_str(raw)
        .map(|status| status.badge_class())
        .unwrap_or(FALLBACK_BADGE_CLASS)
}
